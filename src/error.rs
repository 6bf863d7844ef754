/// Failures talking to the chat service or the spreadsheet logger.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from an endpoint whose body is not interpreted.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Text shown to the user for any transport failure.
pub fn connection_error_message(detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        "Connection error: Unknown error".to_string()
    } else {
        format!("Connection error: {detail}")
    }
}
