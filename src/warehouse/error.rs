use thiserror::Error;

/// Failures talking to the statistics warehouse.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The request never produced a response (DNS, TLS, refused, reset).
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success HTTP status.
    #[error("{endpoint} responded with HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    /// The server answered but reported a failure in its payload.
    #[error("{endpoint} rejected the request ({code}): {message}")]
    Rejected {
        endpoint: &'static str,
        code: String,
        message: String,
    },
    /// The payload did not have the expected shape.
    #[error("malformed {endpoint} response: {details}")]
    Malformed {
        endpoint: &'static str,
        details: String,
    },
}
