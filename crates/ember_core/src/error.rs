use thiserror::Error;

/// Errors that can occur while loading assets or settings.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
