//! Integration tests for task status validation.
//!
//! These tests serve the schema document from wiremock and check how the
//! validator and the descriptor builder react to it.

use porch_client::{ActionDescriptor, ClientError, StatusValidator, validate_status};
use porch_core::ValidationError;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHEMA_PATH: &str = "/api/v1/openapi.json";

fn openapi_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {"title": "Pipeline Orchestration (POrch)", "version": "2.0.0"},
        "paths": {},
        "components": {
            "schemas": {
                "TaskStateEnum": {
                    "type": "string",
                    "enum": ["PENDING", "CLAIMED", "RUNNING", "DONE", "FAILED", "CANCELLED"],
                    "title": "TaskStateEnum"
                }
            }
        }
    })
}

async fn schema_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SCHEMA_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_status_is_canonicalized() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(openapi_document())).await;

    let status = validate_status("Failed", &server.uri(), true).await.unwrap();
    assert_eq!(status, "FAILED");

    let status = validate_status("pending", &server.uri(), true).await.unwrap();
    assert_eq!(status, "PENDING");
}

#[tokio::test]
async fn test_invalid_status_lists_sorted_values() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(openapi_document())).await;

    let err = validate_status("Swimming", &server.uri(), true)
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(ValidationError::InvalidStatus { ref status, ref valid }) => {
            assert_eq!(status, "Swimming");
            assert_eq!(
                valid,
                &["CANCELLED", "CLAIMED", "DONE", "FAILED", "PENDING", "RUNNING"]
            );
        }
        other => panic!("Expected invalid status error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Task status 'Swimming' is not valid. \
         Valid statuses: CANCELLED, CLAIMED, DONE, FAILED, PENDING, RUNNING"
    );
}

#[tokio::test]
async fn test_schema_not_found() {
    let server =
        schema_server(ResponseTemplate::new(404).set_body_json(json!({"Error": "Not found"}))).await;

    let err = validate_status("DONE", &server.uri(), true).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.to_string(),
        format!(
            "Failed to get OpenAPI Schema. Status code 404 \"Not Found\" received from {}{}",
            server.uri(),
            SCHEMA_PATH
        )
    );
}

#[tokio::test]
async fn test_schema_without_enum() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(json!({
        "openapi": "3.1.0",
        "info": {"title": "Pipeline", "version": "0.1.0"}
    })))
    .await;

    let err = validate_status("DONE", &server.uri(), true).await.unwrap_err();
    assert!(err.is_schema());
    assert!(err.to_string().starts_with(&format!(
        "Failed to get enumeration of valid statuses from {}{}",
        server.uri(),
        SCHEMA_PATH
    )));
}

#[tokio::test]
async fn test_schema_with_empty_enum() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(json!({
        "components": {"schemas": {"TaskStateEnum": {"enum": []}}}
    })))
    .await;

    let err = validate_status("DONE", &server.uri(), true).await.unwrap_err();
    assert!(matches!(err, ClientError::Schema { cause: None, .. }));
}

#[tokio::test]
async fn test_schema_not_json() {
    let server = schema_server(ResponseTemplate::new(200).set_body_string("<html></html>")).await;

    let err = validate_status("DONE", &server.uri(), true).await.unwrap_err();
    assert!(matches!(err, ClientError::Schema { cause: Some(_), .. }));
}

#[tokio::test]
async fn test_schema_fetched_on_every_validation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SCHEMA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(openapi_document()))
        .expect(2)
        .mount(&server)
        .await;

    let validator = StatusValidator::new(true).unwrap();
    validator.validate("DONE", &server.uri()).await.unwrap();
    validator.validate("RUNNING", &server.uri()).await.unwrap();
}

#[tokio::test]
async fn test_descriptor_with_status() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(openapi_document())).await;

    let descriptor = ActionDescriptor::builder()
        .base_url(server.uri())
        .action("update_task")
        .task_input(json!({"id_run": 5}))
        .task_status("Failed")
        .build()
        .await
        .unwrap();

    assert_eq!(descriptor.task_status(), Some("FAILED"));
    assert_eq!(descriptor.task_input(), Some(&json!({"id_run": 5})));
}

#[tokio::test]
async fn test_descriptor_with_invalid_status() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(openapi_document())).await;

    let err = ActionDescriptor::builder()
        .base_url(server.uri())
        .action("update_task")
        .task_json(r#"{"id_run": 5}"#)
        .task_status("Swimming")
        .build()
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_descriptor_checks_action_before_fetching_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SCHEMA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(openapi_document()))
        .expect(0)
        .mount(&server)
        .await;

    let err = ActionDescriptor::builder()
        .base_url(server.uri())
        .action("list_tools")
        .task_status("DONE")
        .build()
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_build_with_shared_validator() {
    let server = schema_server(ResponseTemplate::new(200).set_body_json(openapi_document())).await;
    let validator = StatusValidator::new(true).unwrap();

    let descriptor = ActionDescriptor::builder()
        .base_url(server.uri())
        .action("update_task")
        .task_status("cancelled")
        .build_with(&validator)
        .await
        .unwrap();
    assert_eq!(descriptor.task_status(), Some("CANCELLED"));
}
