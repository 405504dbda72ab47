//! Orrery Core - scene description and texture image data.
//!
//! This crate provides:
//!
//! - **Image data**: decoded 8-bit RGB(A) buffers consumed by image textures
//! - **Texture cache**: path-keyed loading through the `image` crate
//! - **Scene description**: a serde model of spheres, materials and textures,
//!   plus the built-in reference scene
//!
//! # Example
//!
//! ```ignore
//! use orrery_core::{SceneDesc, TextureCache};
//!
//! let desc = SceneDesc::load("scene.json")?;
//! let mut cache = TextureCache::with_base_dir("assets");
//! println!("{} spheres, {} materials", desc.spheres.len(), desc.materials.len());
//! ```

pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    CameraDesc, ImageSettings, MaterialDesc, MaterialKind, SceneDesc, SceneError, SceneResult, SphereDesc,
    TextureDesc, TextureKind,
};
pub use texture::{load_image, ImageData, TextureCache, TextureError, TextureResult};
