//! Error types shared across the crate

use crate::utils::SUPPORTED_SOURCE_TYPES;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported source type {0}; only {} can be converted", SUPPORTED_SOURCE_TYPES.join(", "))]
    UnsupportedSourceType(String),

    #[error("invalid member path {0:?}; expected LIBRARY/FILE/MEMBER.EXTENSION")]
    InvalidMemberPath(String),

    #[error("conversion list {0:?} not found")]
    ListNotFound(String),

    #[error("conversion list {0:?} already exists")]
    ListExists(String),

    #[error("unknown conversion parameter {0:?}")]
    UnknownParameter(String),

    #[error("invalid value {value:?} for {parameter}; expected one of {expected}")]
    InvalidParameterValue {
        parameter: String,
        value: String,
        expected: String,
    },

    #[error("no object type set for {0}; update the object type before converting")]
    MissingObjectType(String),

    #[error("remote request failed: {0}")]
    Gateway(#[from] reqwest::Error),

    #[error("remote command service returned {status}: {body}")]
    GatewayStatus { status: u16, body: String },

    #[error("malformed gateway response: {0}")]
    GatewayResponse(String),

    #[error("product library {0} is not available on the host")]
    ProductUnavailable(String),

    #[error("settings file error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    StoreFormat(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
