//! Error types for the contract runner.
//!
//! `ApiError` is the typed parse layer: `NotFound` gets its own variant
//! because the suite asserts on it directly. `TransportError` covers failures
//! below HTTP. `CaseFailure` is what a contract case returns; an
//! `Expectation` failure carries the message supplied at the assertion site
//! together with the expected and observed values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and not 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Connection, TLS, timeout or body-read failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{method} {url}: {source}")]
    Request {
        method: &'static str,
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("{method} {url}: reading body: {source}")]
    Body {
        method: &'static str,
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("no scripted response left for {method} {url}")]
    Exhausted { method: &'static str, url: String },
}

#[derive(Debug, Error)]
pub enum CaseFailure {
    #[error("{message}: expected {expected}, observed {observed}")]
    Expectation {
        message: String,
        expected: String,
        observed: String,
    },

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CaseFailure {
    pub fn expectation(
        message: impl Into<String>,
        expected: impl ToString,
        observed: impl ToString,
    ) -> Self {
        CaseFailure::Expectation {
            message: message.into(),
            expected: expected.to_string(),
            observed: observed.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectation_message_names_both_values() {
        let failure = CaseFailure::expectation("status of GET /posts/999999", 404, 200);
        assert_eq!(
            failure.to_string(),
            "status of GET /posts/999999: expected 404, observed 200"
        );
    }

    #[test]
    fn api_errors_pass_through() {
        let failure = CaseFailure::from(ApiError::NotFound);
        assert_eq!(failure.to_string(), "resource not found");
    }
}
