#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("upstream request failed: {0}")]
    UpstreamTransport(String),
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl TriageError {
    /// True for failures of the upstream call or its payload, as opposed to caller mistakes.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            TriageError::UpstreamStatus { .. }
                | TriageError::UpstreamTransport(_)
                | TriageError::MalformedPayload(_)
        )
    }
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
