//! Turning a scene description into renderable objects.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    Camera, CheckerTexture, DiffuseLight, ImageTexture, Lambertian, Material, RenderResult, Scene,
    Schwarzschild, SolidColor, Sphere, Texture,
};
use orrery_core::{MaterialKind, SceneDesc, SceneError, TextureCache, TextureKind};

/// A built scene together with its camera.
pub struct World {
    pub scene: Scene,
    pub camera: Camera,
}

fn lookup_texture(
    textures: &HashMap<&str, Arc<dyn Texture>>,
    name: &str,
) -> RenderResult<Arc<dyn Texture>> {
    textures
        .get(name)
        .cloned()
        .ok_or_else(|| SceneError::UnknownTexture(name.to_string()).into())
}

/// Build the scene and camera described by `desc`.
///
/// Textures are resolved in declaration order, so a checker can only refer
/// to textures listed before it. Image files are decoded through `cache`.
/// Every geometry and texture problem is reported here, before rendering.
pub fn build_world(desc: &SceneDesc, cache: &mut TextureCache) -> RenderResult<World> {
    let mut textures: HashMap<&str, Arc<dyn Texture>> = HashMap::new();
    for tex in &desc.textures {
        let texture: Arc<dyn Texture> = match &tex.kind {
            TextureKind::Constant { color } => Arc::new(SolidColor::new(*color)),
            TextureKind::Checker { even, odd } => Arc::new(CheckerTexture::new(
                lookup_texture(&textures, even)?,
                lookup_texture(&textures, odd)?,
            )),
            TextureKind::Image { path } => {
                let image = cache.load(path)?;
                if image.channels() == 4 {
                    log::warn!("Texture '{}' has alpha, sampling RGB only", tex.name);
                }
                Arc::new(ImageTexture::new(image))
            }
        };
        textures.insert(tex.name.as_str(), texture);
    }

    let mut materials: HashMap<&str, Arc<dyn Material>> = HashMap::new();
    for mat in &desc.materials {
        let material: Arc<dyn Material> = match &mat.kind {
            MaterialKind::Lambertian { texture } => {
                Arc::new(Lambertian::new(lookup_texture(&textures, texture)?))
            }
            MaterialKind::DiffuseLight { texture } => {
                Arc::new(DiffuseLight::new(lookup_texture(&textures, texture)?))
            }
            MaterialKind::Schwarzschild { strength } => Arc::new(Schwarzschild::new(*strength)),
        };
        materials.insert(mat.name.as_str(), material);
    }

    let mut scene = Scene::new();
    for sphere in &desc.spheres {
        let material = materials
            .get(sphere.material.as_str())
            .cloned()
            .ok_or_else(|| SceneError::UnknownMaterial(sphere.material.clone()))?;
        scene.add(Sphere::new(sphere.center, sphere.radius, material)?);
    }

    let aspect = desc.image.width as f32 / desc.image.height.max(1) as f32;
    let camera = Camera::new()
        .with_position(desc.camera.look_from, desc.camera.look_at, desc.camera.up)
        .with_lens(desc.camera.vfov, aspect);

    log::debug!(
        "Built scene: {} spheres, {} materials, {} textures",
        scene.len(),
        materials.len(),
        textures.len()
    );

    Ok(World { scene, camera })
}
