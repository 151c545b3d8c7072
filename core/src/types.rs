//! DTOs for the `/posts` resource.
//!
//! Field names follow the service's camelCase JSON. These types are defined
//! independently from the mock server's so that the integration tests catch
//! schema drift between the two.

use serde::{Deserialize, Serialize};

/// A single blog post returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Request payload for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Request payload for updating a post. Only the fields present in the JSON
/// are sent; the service leaves omitted fields unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
