//! The contract cases for the `/posts` resource.
//!
//! Each case sends one request (two for delete-then-fetch) through a
//! `ContractSession` and checks the response snapshot. The first unmet
//! expectation ends the case with a `CaseFailure` naming what was expected
//! and what came back; nothing is retried.

use std::time::Instant;

use serde_json::Value;

use crate::error::CaseFailure;
use crate::http::HttpResponse;
use crate::session::ContractSession;
use crate::transport::Transport;
use crate::types::{CreatePost, UpdatePost};

/// Id of a post the service is expected to hold.
pub const VALID_ID: u64 = 1;

/// Id no post is expected to have.
pub const INVALID_ID: u64 = 999_999;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const UPDATED_BODY: &str = "hello bar";

pub fn create_fixture() -> CreatePost {
    CreatePost {
        user_id: 101,
        title: "foo".to_string(),
        body: "bar".to_string(),
    }
}

pub fn update_fixture() -> UpdatePost {
    UpdatePost {
        body: Some(UPDATED_BODY.to_string()),
        ..UpdatePost::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractCase {
    ListPosts,
    GetPostByValidId,
    GetPostByInvalidId,
    CreatePost,
    UpdatePostByValidId,
    UpdatePostByInvalidId,
    DeletePostByValidId,
    DeletePostByInvalidId,
    ListPostsResponds,
    GetPostContentType,
}

impl ContractCase {
    pub const ALL: [ContractCase; 10] = [
        ContractCase::ListPosts,
        ContractCase::GetPostByValidId,
        ContractCase::GetPostByInvalidId,
        ContractCase::CreatePost,
        ContractCase::UpdatePostByValidId,
        ContractCase::UpdatePostByInvalidId,
        ContractCase::DeletePostByValidId,
        ContractCase::DeletePostByInvalidId,
        ContractCase::ListPostsResponds,
        ContractCase::GetPostContentType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContractCase::ListPosts => "list_posts_returns_posts",
            ContractCase::GetPostByValidId => "get_post_by_valid_id",
            ContractCase::GetPostByInvalidId => "get_post_by_invalid_id_is_not_found",
            ContractCase::CreatePost => "create_post_returns_created_post",
            ContractCase::UpdatePostByValidId => "update_post_by_valid_id",
            ContractCase::UpdatePostByInvalidId => "update_post_by_invalid_id_is_not_found",
            ContractCase::DeletePostByValidId => "delete_post_by_valid_id",
            ContractCase::DeletePostByInvalidId => "delete_post_by_invalid_id_is_not_found",
            ContractCase::ListPostsResponds => "list_posts_responds",
            ContractCase::GetPostContentType => "get_post_returns_json_content_type",
        }
    }

    pub fn run<T: Transport>(self, session: &ContractSession<T>) -> Result<(), CaseFailure> {
        match self {
            ContractCase::ListPosts => list_posts(session),
            ContractCase::GetPostByValidId => get_post_by_valid_id(session),
            ContractCase::GetPostByInvalidId => get_post_by_invalid_id(session),
            ContractCase::CreatePost => create_post(session),
            ContractCase::UpdatePostByValidId => update_post_by_valid_id(session),
            ContractCase::UpdatePostByInvalidId => update_post_by_invalid_id(session),
            ContractCase::DeletePostByValidId => delete_post_by_valid_id(session),
            ContractCase::DeletePostByInvalidId => delete_post_by_invalid_id(session),
            ContractCase::ListPostsResponds => list_posts_responds(session),
            ContractCase::GetPostContentType => get_post_content_type(session),
        }
    }
}

impl std::fmt::Display for ContractCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn list_posts<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_list_posts())?;
    expect_success(&response, "GET /posts should succeed")?;
    expect_status(&response, 200, "status of GET /posts")?;
    if response.body.is_empty() {
        return Err(CaseFailure::expectation(
            "the response does not contain any posts",
            "non-empty body",
            "empty body",
        ));
    }
    Ok(())
}

fn get_post_by_valid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_get_post(VALID_ID))?;
    expect_status(&response, 200, "status of GET /posts/1")?;
    expect_success(&response, "GET /posts/1 should succeed")?;

    let post = expect_json(&response, "GET /posts/1 should return a JSON post")?;
    let user_id = &post["userId"];
    if user_id.is_null() {
        return Err(CaseFailure::expectation(
            "userId should not be null",
            "non-null userId",
            user_id,
        ));
    }
    if post["id"].as_u64() != Some(VALID_ID) {
        return Err(CaseFailure::expectation(
            "returned id should match the requested id",
            VALID_ID,
            &post["id"],
        ));
    }
    Ok(())
}

fn get_post_by_invalid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_get_post(INVALID_ID))?;
    expect_status(&response, 404, "expected status code 404 for non-existent post")
}

fn create_post<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let input = create_fixture();
    let response = session.send(&session.client().build_create_post(&input)?)?;
    expect_status(&response, 201, "expected status code 201 for resource creation")?;

    let post = expect_json(&response, "POST /posts should return the created post as JSON")?;
    expect_field(&post, "title", input.title.as_str(), "the title of the created post is not correct")?;
    expect_field(&post, "body", input.body.as_str(), "the body of the created post is not correct")?;
    expect_field(&post, "userId", input.user_id, "the userId of the created post is not correct")?;
    if post["id"].is_null() {
        return Err(CaseFailure::expectation(
            "the response does not contain an id for the created post",
            "an id field",
            &post["id"],
        ));
    }
    Ok(())
}

fn update_post_by_valid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let request = session.client().build_update_post(VALID_ID, &update_fixture())?;
    let response = session.send(&request)?;
    expect_success(&response, "PUT /posts/1 should succeed")?;
    expect_status(&response, 200, "status of PUT /posts/1")?;
    let post = expect_json(&response, "PUT /posts/1 should return the updated post as JSON")?;
    expect_field(
        &post,
        "body",
        UPDATED_BODY,
        "the post body was not updated correctly",
    )
}

fn update_post_by_invalid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let request = session.client().build_update_post(INVALID_ID, &update_fixture())?;
    let response = session.send(&request)?;
    expect_status(&response, 404, "expected status code 404 for updating a non-existent post")
}

fn delete_post_by_valid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_delete_post(VALID_ID))?;
    expect_success(&response, "DELETE /posts/1 should succeed")?;
    expect_status(&response, 200, "status of DELETE /posts/1")?;

    let follow_up = session.send(&session.client().build_get_post(VALID_ID))?;
    expect_status(&follow_up, 404, "the post was not deleted successfully")
}

fn delete_post_by_invalid_id<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_delete_post(INVALID_ID))?;
    expect_status(&response, 404, "expected status code 404 for deleting a non-existent post")
}

fn list_posts_responds<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let started = Instant::now();
    let response = session.send(&session.client().build_list_posts())?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(elapsed_ms, status = response.status, "GET /posts answered");
    expect_success(&response, "GET /posts should respond successfully")
}

fn get_post_content_type<T: Transport>(session: &ContractSession<T>) -> Result<(), CaseFailure> {
    let response = session.send(&session.client().build_get_post(VALID_ID))?;
    match response.content_type() {
        Some(JSON_CONTENT_TYPE) => Ok(()),
        observed => Err(CaseFailure::expectation(
            "expected content type to be JSON",
            JSON_CONTENT_TYPE,
            observed.unwrap_or("<no content-type>"),
        )),
    }
}

fn expect_status(response: &HttpResponse, expected: u16, message: &str) -> Result<(), CaseFailure> {
    if response.status == expected {
        Ok(())
    } else {
        Err(CaseFailure::expectation(message, expected, response.status))
    }
}

fn expect_success(response: &HttpResponse, message: &str) -> Result<(), CaseFailure> {
    if response.is_success() {
        Ok(())
    } else {
        Err(CaseFailure::expectation(
            message,
            "a 2xx status",
            response.status,
        ))
    }
}

fn expect_json(response: &HttpResponse, message: &str) -> Result<Value, CaseFailure> {
    response
        .json()
        .map_err(|_| CaseFailure::expectation(message, "a JSON body", &response.body))
}

fn expect_field(
    object: &Value,
    key: &str,
    expected: impl Into<Value>,
    message: &str,
) -> Result<(), CaseFailure> {
    let expected = expected.into();
    let observed = &object[key];
    if *observed == expected {
        Ok(())
    } else {
        Err(CaseFailure::expectation(
            format!("{message} ({key})"),
            expected,
            observed,
        ))
    }
}
