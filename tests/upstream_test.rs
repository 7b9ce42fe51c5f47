//! Integration tests for the HTTP upstream clients, against a mock platform.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inference_gateway::upstream::{EndpointClient, ObjectStore, TransformJobClient};
use inference_gateway::{
    Error, Gateway, HttpObjectStore, HttpPlatformClient, InvocationEvent, PayloadSource,
    RetryPolicy,
};

#[tokio::test]
async fn test_invoke_posts_payload_to_endpoint_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/endpoints/iris-classifier/invocations"))
        .and(header("Content-Type", "text/csv"))
        .and(body_string("5.1,3.5,1.4,0.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"species": "setosa"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpPlatformClient::new(&server.uri(), 5);
    let raw = client
        .invoke("iris-classifier", b"5.1,3.5,1.4,0.2", "text/csv")
        .await
        .unwrap();

    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&raw).unwrap(),
        json!({"species": "setosa"})
    );
}

#[tokio::test]
async fn test_invoke_error_status_is_invocation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/endpoints/iris-classifier/invocations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let client = HttpPlatformClient::new(&server.uri(), 5);
    let err = client
        .invoke("iris-classifier", b"5.1", "text/csv")
        .await
        .unwrap_err();

    match err {
        Error::UpstreamInvocationFailed(detail) => {
            assert!(detail.contains("500"));
            assert!(detail.contains("model crashed"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_invoke_connection_refused_is_unavailable() {
    // Grab a free port and release it so the request has nothing to connect to.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpPlatformClient::new(&format!("http://{}", addr), 5);
    let err = client
        .invoke("iris-classifier", b"5.1", "text/csv")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_get_object_fetches_bucket_key_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training-inputs/content-type.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text/csv"))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpObjectStore::new(&server.uri(), 5);
    let body = store
        .get_object("training-inputs", "content-type.txt")
        .await
        .unwrap();

    assert_eq!(body, b"text/csv".to_vec());
}

#[tokio::test]
async fn test_get_object_missing_is_invocation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training-inputs/absent.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such key"))
        .mount(&server)
        .await;

    let store = HttpObjectStore::new(&server.uri(), 5);
    let err = store
        .get_object("training-inputs", "absent.txt")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UpstreamInvocationFailed(_)));
}

#[tokio::test]
async fn test_describe_job_parses_description() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transform-jobs/nightly-scoring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
        .mount(&server)
        .await;

    let client = HttpPlatformClient::new(&server.uri(), 5);
    let description = client.describe_job("nightly-scoring").await.unwrap();

    assert_eq!(description.status, "InProgress");
    assert_eq!(description.failure_reason, None);
}

#[tokio::test]
async fn test_describe_job_reads_failure_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transform-jobs/nightly-scoring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "failure_reason": "input key not found"
        })))
        .mount(&server)
        .await;

    let client = HttpPlatformClient::new(&server.uri(), 5);
    let description = client.describe_job("nightly-scoring").await.unwrap();

    assert_eq!(description.status, "Failed");
    assert_eq!(
        description.failure_reason.as_deref(),
        Some("input key not found")
    );
}

#[tokio::test]
async fn test_describe_job_invalid_json_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transform-jobs/nightly-scoring"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpPlatformClient::new(&server.uri(), 5);
    let err = client.describe_job("nightly-scoring").await.unwrap_err();

    assert!(matches!(err, Error::SerializationError(_)));
}

#[tokio::test]
async fn test_gateway_invokes_endpoint_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/endpoints/iris-classifier/invocations"))
        .and(header("Content-Type", "text/csv"))
        .and(body_string("5.1,3.5,1.4,0.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"species": "setosa"})))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Arc::new(HttpPlatformClient::new(&server.uri(), 5));
    let gateway = Gateway::new(
        "iris-classifier".to_string(),
        PayloadSource::Request {
            content_type: "text/csv".to_string(),
        },
        RetryPolicy::none(),
        platform.clone(),
        Arc::new(HttpObjectStore::new(&server.uri(), 5)),
        platform,
    );

    let response = gateway
        .invoke(InvocationEvent {
            body: Some(r#"{"data": "5.1,3.5,1.4,0.2"}"#.to_string()),
        })
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"species": "setosa"}));
}

#[tokio::test]
async fn test_gateway_blob_metadata_mode_over_http() {
    let platform_server = MockServer::start().await;
    let storage_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/training-inputs/content-type.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text/csv"))
        .expect(1)
        .mount(&storage_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/endpoints/iris-classifier/invocations"))
        .and(header("Content-Type", "text/csv"))
        .and(body_string("5.1,3.5,1.4,0.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predictions": [0.97]})))
        .expect(1)
        .mount(&platform_server)
        .await;

    let platform = Arc::new(HttpPlatformClient::new(&platform_server.uri(), 5));
    let gateway = Gateway::new(
        "iris-classifier".to_string(),
        PayloadSource::BlobMetadata {
            bucket: "training-inputs".to_string(),
            key: "content-type.txt".to_string(),
            input_data: "5.1,3.5,1.4,0.2".to_string(),
        },
        RetryPolicy::none(),
        platform.clone(),
        Arc::new(HttpObjectStore::new(&storage_server.uri(), 5)),
        platform,
    );

    let response = gateway.invoke(InvocationEvent { body: None }).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"predictions": [0.97]}));
}
