//! Scene description types.
//!
//! A `SceneDesc` is plain data: spheres refer to materials by name and
//! materials refer to textures by name. The renderer resolves the names
//! when it builds its own scene. Descriptions round-trip through JSON.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or resolving a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown texture '{0}' (textures must be defined before use)")]
    UnknownTexture(String),

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Output image settings stored alongside the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 50,
        }
    }
}

/// Camera placement. The aspect ratio comes from the image settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDesc {
    pub look_from: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Vertical field of view in degrees
    #[serde(default = "default_vfov")]
    pub vfov: f32,
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_vfov() -> f32 {
    90.0
}

/// How a named texture computes its color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureKind {
    Constant { color: Vec3 },
    /// Alternates between two previously defined textures in world space
    Checker { even: String, odd: String },
    /// Nearest-neighbour lookup into a decoded image file
    Image { path: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureDesc {
    pub name: String,
    #[serde(flatten)]
    pub kind: TextureKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    Lambertian { texture: String },
    DiffuseLight { texture: String },
    Schwarzschild { strength: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub name: String,
    #[serde(flatten)]
    pub kind: MaterialKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    pub material: String,
}

/// A complete scene: image settings, camera, and the primitive list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub image: ImageSettings,
    pub camera: CameraDesc,
    #[serde(default)]
    pub textures: Vec<TextureDesc>,
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,
    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
}

const FALLBACK_EVEN: &str = "__fallback_even";
const FALLBACK_ODD: &str = "__fallback_odd";

impl SceneDesc {
    /// Parse a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in scene: an earth-textured planet, a small light above it,
    /// a large light-bending sphere, all inside a star-textured sky sphere.
    pub fn reference() -> Self {
        Self {
            image: ImageSettings::default(),
            camera: CameraDesc {
                look_from: Vec3::new(4.0, 7.0, 3.0),
                look_at: Vec3::new(4.0, 0.0, -1.0),
                up: Vec3::Y,
                vfov: 90.0,
            },
            textures: vec![
                TextureDesc {
                    name: "earth".into(),
                    kind: TextureKind::Image {
                        path: "textures/earthmap.jpg".into(),
                    },
                },
                TextureDesc {
                    name: "stars".into(),
                    kind: TextureKind::Image {
                        path: "textures/starbackground.jpg".into(),
                    },
                },
                TextureDesc {
                    name: "light".into(),
                    kind: TextureKind::Constant {
                        color: Vec3::splat(2.0),
                    },
                },
            ],
            materials: vec![
                MaterialDesc {
                    name: "planet".into(),
                    kind: MaterialKind::Lambertian {
                        texture: "earth".into(),
                    },
                },
                MaterialDesc {
                    name: "lamp".into(),
                    kind: MaterialKind::DiffuseLight {
                        texture: "light".into(),
                    },
                },
                MaterialDesc {
                    name: "black_hole".into(),
                    kind: MaterialKind::Schwarzschild { strength: 0.01 },
                },
                MaterialDesc {
                    name: "sky".into(),
                    kind: MaterialKind::Lambertian {
                        texture: "stars".into(),
                    },
                },
            ],
            spheres: vec![
                SphereDesc {
                    center: Vec3::new(7.0, 0.0, -1.0),
                    radius: 1.0,
                    material: "planet".into(),
                },
                SphereDesc {
                    center: Vec3::new(7.0, 2.5, -1.0),
                    radius: 0.5,
                    material: "lamp".into(),
                },
                SphereDesc {
                    center: Vec3::new(0.0, 0.0, -1.0),
                    radius: 5.5,
                    material: "black_hole".into(),
                },
                SphereDesc {
                    center: Vec3::ZERO,
                    radius: 200.0,
                    material: "sky".into(),
                },
            ],
        }
    }

    /// Replace image textures whose file is unavailable with a checkerboard.
    ///
    /// Returns the names of the replaced textures. `is_available` decides
    /// whether an image path can be loaded.
    pub fn replace_missing_images(&mut self, is_available: impl Fn(&str) -> bool) -> Vec<String> {
        let missing: Vec<String> = self
            .textures
            .iter()
            .filter_map(|tex| match &tex.kind {
                TextureKind::Image { path } if !is_available(path) => Some(tex.name.clone()),
                _ => None,
            })
            .collect();

        if missing.is_empty() {
            return missing;
        }

        // Sub-textures go first so the checkers only reference earlier entries
        self.textures.insert(
            0,
            TextureDesc {
                name: FALLBACK_ODD.into(),
                kind: TextureKind::Constant {
                    color: Vec3::new(0.2, 0.3, 0.1),
                },
            },
        );
        self.textures.insert(
            0,
            TextureDesc {
                name: FALLBACK_EVEN.into(),
                kind: TextureKind::Constant {
                    color: Vec3::splat(0.9),
                },
            },
        );

        for tex in &mut self.textures {
            if missing.contains(&tex.name) {
                tex.kind = TextureKind::Checker {
                    even: FALLBACK_EVEN.into(),
                    odd: FALLBACK_ODD.into(),
                };
            }
        }

        missing
    }

    /// Look up a material description by name.
    pub fn material(&self, name: &str) -> SceneResult<&MaterialDesc> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
    }
}
