// Error taxonomy shared by the fetch boundaries
use thiserror::Error;

/// Why an upstream fetch produced nothing usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("upstream returned no usable records")]
    EmptyResult,
}

/// Rejections raised by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("source '{0}' already exists")]
    DuplicateSource(String),

    #[error("layer '{0}' already exists")]
    DuplicateLayer(String),

    #[error("source '{0}' does not exist")]
    UnknownSource(String),

    #[error("layer '{0}' does not exist")]
    UnknownLayer(String),

    #[error("source '{source_id}' is still used by layer '{layer_id}'")]
    SourceInUse { source_id: String, layer_id: String },
}
