//! HTTP request descriptors and response snapshots as plain data.
//!
//! `PostsClient` produces `HttpRequest` values; a `Transport` turns each one
//! into exactly one `HttpResponse`. Keeping both sides as owned data lets the
//! contract cases be driven by a scripted transport in unit tests.

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data. `url` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The observable parts of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Parse the body as untyped JSON.
    pub fn json(&self) -> Result<serde_json::Value, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![(
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )],
            body: r#"{"id":1}"#.to_string(),
        }
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(response(200).is_success());
        assert!(response(201).is_success());
        assert!(!response(199).is_success());
        assert!(!response(404).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(200);
        assert_eq!(resp.content_type(), Some("application/json; charset=utf-8"));
        assert_eq!(resp.header("CONTENT-TYPE"), resp.content_type());
        assert!(resp.header("etag").is_none());
    }

    #[test]
    fn json_reports_bad_body() {
        let mut resp = response(200);
        assert_eq!(resp.json().unwrap()["id"], 1);
        resp.body = "not json".to_string();
        assert!(matches!(resp.json(), Err(ApiError::DeserializationError(_))));
    }
}
