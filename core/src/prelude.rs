use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which decoded shape a request expects back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Analysis,
    Comparison,
}

/// Prompt plus output schema for one schema-constrained model call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelRequest {
    pub kind: RequestKind,
    pub prompt: String,
    pub schema: Value,
}

/// Precondition failures when building a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("circuit id must not be empty")]
    EmptyCircuitId,
    #[error("circuit name must not be empty")]
    EmptyCircuitName,
    #[error("comparison needs at least one circuit")]
    NoCircuits,
    #[error("unknown circuit: {0}")]
    UnknownCircuit(String),
}

/// Failures talking to the model endpoint.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("model endpoint returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unreadable response envelope: {0}")]
    Envelope(String),
    #[error("gateway unavailable: {0}")]
    Client(String),
}

impl GatewayError {
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, GatewayError::Status { status: 429, .. })
    }
}

/// Failures turning response text into typed results.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),
    #[error("required field missing: {0}")]
    MissingField(String),
    #[error("{field} = {value} outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Everything that can end an analysis fetch.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The single I/O boundary: send a request, get the raw text payload back.
///
/// `Ok(None)` means the model answered without any text.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send(&self, request: &ModelRequest) -> Result<Option<String>, GatewayError>;

    fn model_name(&self) -> &str;
}
