use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// A native error value. Shared so that forwarding it keeps its identity.
pub type NativeError = Arc<dyn Error + Send + Sync + 'static>;

/// Any failure value handed to `report`, classified at the call boundary.
#[derive(Clone)]
pub enum FailureInput {
    /// A real error object; forwarded to the sink untouched.
    NativeError(NativeError),
    /// Multi-line text: first line is an optional header, the rest is stack text.
    RawString(String),
    /// An already-structured record.
    Structured(Value),
}

impl FailureInput {
    pub fn from_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        FailureInput::NativeError(Arc::new(error))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FailureInput::NativeError(_) => "native_error",
            FailureInput::RawString(_) => "raw_string",
            FailureInput::Structured(_) => "structured",
        }
    }
}

impl fmt::Debug for FailureInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureInput::NativeError(e) => f.debug_tuple("NativeError").field(&e.to_string()).finish(),
            FailureInput::RawString(s) => f.debug_tuple("RawString").field(s).finish(),
            FailureInput::Structured(v) => f.debug_tuple("Structured").field(v).finish(),
        }
    }
}

impl From<String> for FailureInput {
    fn from(value: String) -> Self {
        FailureInput::RawString(value)
    }
}

impl From<&str> for FailureInput {
    fn from(value: &str) -> Self {
        FailureInput::RawString(value.to_string())
    }
}

impl From<Value> for FailureInput {
    fn from(value: Value) -> Self {
        FailureInput::Structured(value)
    }
}

impl From<NativeError> for FailureInput {
    fn from(value: NativeError) -> Self {
        FailureInput::NativeError(value)
    }
}

impl From<anyhow::Error> for FailureInput {
    fn from(value: anyhow::Error) -> Self {
        let boxed: Box<dyn Error + Send + Sync + 'static> = value.into();
        FailureInput::NativeError(Arc::from(boxed))
    }
}
