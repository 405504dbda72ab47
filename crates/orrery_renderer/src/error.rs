//! Error type shared by scene building and rendering.

use orrery_core::{SceneError, TextureError};
use thiserror::Error;

/// Errors surfaced by the renderer.
///
/// Geometry and texture problems are reported while the scene is built,
/// never in the middle of a render pass.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid geometry: sphere radius must be positive and finite, got {radius}")]
    InvalidGeometry { radius: f32 },

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Render failed on row {row}: {reason}")]
    RenderFailed { row: u32, reason: String },

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(String),

    #[error("Unknown camera move '{0}'")]
    UnknownCameraMove(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
