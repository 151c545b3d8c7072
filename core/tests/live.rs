//! The contract cases against the public service.
//!
//! These need network access and are ignored by default; run them with
//! `cargo test -p posts-contract --test live -- --ignored`.

mod common;

use posts_contract::{scoped, ContractCase, HttpMethod, HttpRequest, SuiteConfig};

fn run(case: ContractCase) {
    common::init_test_logging();
    let result = scoped(&SuiteConfig::default(), |session| case.run(session));
    if let Err(err) = result {
        panic!("{case}: {err}");
    }
}

#[test]
#[ignore = "requires network access"]
fn get_all_posts_returns_list_of_posts() {
    run(ContractCase::ListPosts);
}

#[test]
#[ignore = "requires network access"]
fn get_post_by_id_returns_post_when_id_is_valid() {
    run(ContractCase::GetPostByValidId);
}

#[test]
#[ignore = "requires network access"]
fn get_post_by_id_returns_not_found_when_id_is_invalid() {
    run(ContractCase::GetPostByInvalidId);
}

#[test]
#[ignore = "requires network access"]
fn create_post_returns_created_post() {
    run(ContractCase::CreatePost);
}

#[test]
#[ignore = "requires network access"]
fn update_post_returns_updated_post_when_id_is_valid() {
    run(ContractCase::UpdatePostByValidId);
}

#[test]
#[ignore = "requires network access"]
fn update_post_returns_not_found_when_id_is_invalid() {
    run(ContractCase::UpdatePostByInvalidId);
}

#[test]
#[ignore = "requires network access"]
fn delete_post_returns_ok_when_id_is_valid() {
    run(ContractCase::DeletePostByValidId);
}

#[test]
#[ignore = "requires network access"]
fn delete_post_returns_not_found_when_id_is_invalid() {
    run(ContractCase::DeletePostByInvalidId);
}

#[test]
#[ignore = "requires network access"]
fn get_all_posts_responds() {
    run(ContractCase::ListPostsResponds);
}

#[test]
#[ignore = "requires network access"]
fn get_post_returns_json_content_type() {
    run(ContractCase::GetPostContentType);
}

/// Kept as a record of the expectation; the public service accepts empty
/// fields and answers 201.
#[test]
#[ignore = "the service does not validate empty fields, so this never sees a 400"]
fn create_post_returns_bad_request_when_data_is_invalid() {
    common::init_test_logging();
    let config = SuiteConfig::default();
    let status = scoped(&config, |session| {
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/posts", session.client().base_url()),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(serde_json::json!({"title": "", "body": "", "userId": ""}).to_string()),
        };
        session.send(&request).map(|resp| resp.status)
    })
    .unwrap();
    assert_eq!(status, 400, "expected status code 400 for bad request with invalid data");
}
