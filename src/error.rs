// Error types for snapshot normalization and configuration loading

use thiserror::Error;

/// A turn snapshot that cannot be turned into a board model
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("board of {width}x{height} cells is too large")]
    BoardTooLarge { width: i32, height: i32 },

    #[error("snake '{id}' has a segment off the board at ({x}, {y})")]
    OutOfBounds { id: String, x: i32, y: i32 },

    #[error("acting snake '{0}' is not on the board")]
    MissingSnake(String),

    #[error("snake '{0}' has an empty body")]
    EmptyBody(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
