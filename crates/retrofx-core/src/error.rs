//! Error types for retrofx

use thiserror::Error;

/// The main error type for retrofx operations
#[derive(Debug, Error)]
pub enum RetroError {
    #[error("Texture 0x{0:08x} not loaded")]
    TextureNotFound(u32),

    #[error("Sprite table has no entry {0}")]
    SpriteNotFound(i64),

    #[error("Unknown bullet type: {0}")]
    BulletTypeNotFound(u8),

    #[error("Frameset not found: {0}")]
    FramesetNotFound(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scenario error: {0}")]
    ScenarioError(String),
}

/// Result type alias for retrofx operations
pub type Result<T> = std::result::Result<T, RetroError>;

impl From<toml::de::Error> for RetroError {
    fn from(err: toml::de::Error) -> Self {
        RetroError::TomlParseError(err.to_string())
    }
}
