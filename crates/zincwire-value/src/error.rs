/// Errors that can occur while encoding values to JSON.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value has no representable JSON form.
    #[error("value has no JSON representation: {0}")]
    UnsupportedType(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
