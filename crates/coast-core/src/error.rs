use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("View not found: {0}")]
    ViewNotFound(String),

    #[error("Scroll driver has shut down")]
    DriverClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
