use thiserror::Error;

/// Errors that can occur when talking to the Drive API.
///
/// None of these reach an end caller verbatim; the server logs them and
/// responds with a generic message.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failure to obtain an access token for the service account.
    #[error("auth error: {0}")]
    Auth(String),

    /// Transport-level errors from the HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("unexpected status {status}")]
    UnexpectedStatus {
        /// The HTTP status returned by the API.
        status: reqwest::StatusCode,
        /// The response body, kept for server-side logging.
        body: String,
    },

    /// Errors decoding an API response body.
    #[error("invalid json in {context}")]
    Json {
        /// What was being decoded.
        context: String,
        /// The underlying decode error.
        #[source]
        cause: serde_json::Error,
    },
}
