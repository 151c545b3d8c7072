//! HTTP contract suite for a blog-post REST service.
//!
//! # Overview
//! Each `ContractCase` sends one request (two for delete-then-fetch) to the
//! `/posts` resource and asserts on the status code, content type and body of
//! the response. Cases run sequentially, each inside its own
//! `ContractSession`, and a failure stops only the case it occurs in.
//!
//! # Design
//! - `PostsClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - A `Transport` does the round-trip. `UreqTransport` is the blocking
//!   client used against a live service; `ScriptedTransport` replays canned
//!   responses.
//! - `run_suite` collects a `SuiteReport` with a line per case.

pub mod cases;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod report;
pub mod session;
pub mod transport;
pub mod types;

pub use cases::{ContractCase, INVALID_ID, JSON_CONTENT_TYPE, VALID_ID};
pub use client::PostsClient;
pub use config::{SuiteConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, CaseFailure, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use report::{run_suite, run_suite_with, CaseOutcome, SuiteReport};
pub use session::{scoped, ContractSession};
pub use transport::{ScriptedTransport, Transport, UreqTransport};
pub use types::{CreatePost, Post, UpdatePost};
