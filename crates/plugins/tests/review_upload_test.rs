//! Direct multipart upload of review images against a mock server.

use extensions::testing::RecordingClient;
use extensions::{
    BearerToken, ClientContext, ClientError, ClientOptions, Headers, Plugin, StoreConfig,
    TransportError, PUBLISHABLE_KEY_HEADER,
};
use plugins::reviews::{ImageFile, UploadImageFilesInput};
use plugins::ReviewsPlugin;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPLOAD_ROUTE: &str = "/store/reviews/files/images/upload";

fn context(base_url: &str, client: Arc<RecordingClient>) -> ClientContext {
    let options = ClientOptions::new()
        .with_auth(BearerToken::new("customer-jwt"))
        .with_store_config(
            StoreConfig::new()
                .with_base_url(base_url)
                .with_publishable_key("pk_live"),
        );
    ClientContext::new(client, options)
}

fn photo() -> UploadImageFilesInput {
    UploadImageFilesInput {
        files: vec![ImageFile {
            file_name: "shoe.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }],
    }
}

#[tokio::test]
async fn test_upload_sends_multipart_with_publishable_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_ROUTE))
        .and(header(PUBLISHABLE_KEY_HEADER, "pk_live"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"files\""))
        .and(body_string_contains("filename=\"shoe.png\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": "file_1", "url": "https://cdn.test/shoe.png" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base_client = Arc::new(RecordingClient::new());
    let ctx = context(&server.uri(), base_client.clone());

    let uploaded = ReviewsPlugin::default()
        .endpoints(&ctx)
        .upload_image_files(photo(), None)
        .await
        .unwrap();

    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].url, "https://cdn.test/shoe.png");
    assert!(base_client.requests().is_empty());

    // Auth headers are not attached to the direct upload.
    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upload_publishable_key_overrides_caller_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_ROUTE))
        .and(header(PUBLISHABLE_KEY_HEADER, "pk_live"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri(), Arc::new(RecordingClient::new()));
    let caller = Headers::new()
        .with("X-Publishable-Api-Key", "pk_spoofed")
        .with("X-Trace", "abc");

    let uploaded = ReviewsPlugin::default()
        .endpoints(&ctx)
        .upload_image_files(photo(), Some(caller))
        .await
        .unwrap();

    assert!(uploaded.is_empty());
}

#[tokio::test]
async fn test_upload_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_ROUTE))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let ctx = context(&server.uri(), Arc::new(RecordingClient::new()));

    let err = ReviewsPlugin::default()
        .endpoints(&ctx)
        .upload_image_files(photo(), None)
        .await
        .unwrap_err();

    match err {
        ClientError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 413);
            assert_eq!(body, "too large");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_uses_shared_http_client_and_trims_base_url_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&format!("{}/", server.uri()), Arc::new(RecordingClient::new()));

    ReviewsPlugin::with_http_client(reqwest::Client::new())
        .endpoints(&ctx)
        .upload_image_files(photo(), None)
        .await
        .unwrap();
}
