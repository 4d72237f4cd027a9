use serde_json::Value as Json;

#[derive(Debug, thiserror::Error)]
pub enum AsJsonError {
    #[error("Field not found: {0}")]
    FieldNotFound(&'static str),

    #[error("Field has invalid value: {0}")]
    FieldValueInvalid(&'static str),

    #[error("Unsupported format version: {0}")]
    InvalidStandard(u64),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>)
}

/// Versioned JSON representation of a type.
///
/// Every representation is wrapped into an envelope
/// with a `format` field so older records stay readable.
pub trait AsJson {
    fn to_json(&self) -> Result<Json, AsJsonError>;

    fn from_json(json: &Json) -> Result<Self, AsJsonError> where Self: Sized;
}
