use thiserror::Error;

/// EVM encoding and address errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid function signature: {0}")]
    InvalidSignature(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("ambiguous function name: {0}")]
    AmbiguousFunction(String),

    #[error("argument mismatch: {0}")]
    ArgumentMismatch(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}
