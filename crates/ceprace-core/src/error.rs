use thiserror::Error;

/// Validation errors exposed by `ceprace-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("lookup key cannot be empty")]
    EmptyLookupKey,

    #[error("invalid provider '{value}', expected one of brasilapi, viacep")]
    InvalidProvider { value: String },
}
