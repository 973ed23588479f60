//! Error types for the scene
//!
//! None of these are fatal: asset and texture failures are logged and the scene
//! renders without the affected object.

use thiserror::Error;

/// Errors that can occur while building the scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// An asynchronous asset load reported failure
    #[error("Failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    /// Environment source image is not an equirectangular 2D texture
    #[error("Unsupported environment texture: {message}")]
    UnsupportedTexture { message: String },

    /// Pixel access on the environment source failed
    #[error("Texture access error: {0}")]
    TextureAccess(#[from] bevy::image::TextureAccessError),

    /// OBJ text could not be interpreted
    #[error("OBJ parse error on line {line}: {message}")]
    ObjParse { line: usize, message: String },
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
