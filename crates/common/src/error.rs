use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Object ID cannot be empty.")]
    EmptyObjectId,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("invalid origin '{0}': expected an absolute http(s) base URL")]
    InvalidOrigin(String),

    #[error("Base URL not available yet. Please wait a moment.")]
    OriginUnresolved,

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
