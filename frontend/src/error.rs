/// Everything that can go wrong between the app and the backend.
///
/// Shape mismatches are caught at the request boundary so malformed data
/// never reaches the aggregation logic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("{detail} (status {status})")]
    Api { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::UnexpectedShape(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
