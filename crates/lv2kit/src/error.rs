use lv2kit_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Lv2Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid bundle <{uri}>: {reason}")]
    InvalidBundle { uri: String, reason: String },

    #[error("Expected a URI, got {0}")]
    NotAUri(String),
}
