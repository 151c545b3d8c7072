//! Per-case client lifecycle.
//!
//! A `ContractSession` is acquired at the start of a case and released when
//! it is dropped, which covers early returns from a failed assertion and
//! unwinding from a panic alike.

use crate::client::PostsClient;
use crate::config::SuiteConfig;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

pub struct ContractSession<T: Transport = UreqTransport> {
    client: PostsClient,
    transport: T,
}

impl ContractSession<UreqTransport> {
    /// Acquire a blocking HTTP client bound to `config.base_url`.
    pub fn open(config: &SuiteConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> ContractSession<T> {
    pub fn with_transport(config: &SuiteConfig, transport: T) -> Self {
        let client = PostsClient::new(&config.base_url);
        tracing::debug!(base_url = client.base_url(), "session opened");
        Self { client, transport }
    }

    pub fn client(&self) -> &PostsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and snapshot the response.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.transport.execute(request)
    }
}

impl<T: Transport> Drop for ContractSession<T> {
    fn drop(&mut self) {
        tracing::debug!(base_url = self.client.base_url(), "session released");
    }
}

/// Run `f` inside a freshly opened session; the session is released on every
/// exit path.
pub fn scoped<R>(config: &SuiteConfig, f: impl FnOnce(&ContractSession) -> R) -> R {
    let session = ContractSession::open(config);
    f(&session)
}
