use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarbandError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid rule configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unknown item abbreviation: {0}")]
    UnknownItem(String),

    #[error("Unknown skill abbreviation: {0}")]
    UnknownSkill(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type Result<T> = std::result::Result<T, WarbandError>;
