use thiserror::Error;

// Everything that can go wrong while building a body or its scene node
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid grid dimensions {width}x{height}: need 1 to 2^25 texels")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("biome list is empty")]
    EmptyBiomeList,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown shader asset `{0}`")]
    UnknownShader(String),

    #[error("scene resource missing: {0}")]
    MissingResource(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
