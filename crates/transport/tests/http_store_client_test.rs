//! Integration tests for `HttpStoreClient` against a mock storefront API.

use extensions::{Headers, RequestSpec, StoreClient, TransportError};
use serde_json::{json, Map, Value};
use transport::{HttpStoreClient, TransportConfig, REQUEST_ID_HEADER};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpStoreClient {
    let config = TransportConfig::new(server.uri()).with_publishable_key("pk_test");
    HttpStoreClient::new(&config).expect("client builds")
}

fn query(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("query must be an object"),
    }
}

#[tokio::test]
async fn test_get_sends_query_and_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/wishlists"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .and(header("x-publishable-api-key", "pk_test"))
        .and(header("accept", "application/json"))
        .and(header_exists(REQUEST_ID_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get().with_query(query(json!({ "limit": 10, "offset": 0 })));
    let body = client_for(&server).fetch("/store/wishlists", spec).await.unwrap();

    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_array_query_parameters_are_bracketed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/products/reviews"))
        .and(query_param("product_ids[]", "prod_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::get().with_query(query(json!({ "product_ids": ["prod_1"] })));
    client_for(&server).fetch("/store/products/reviews", spec).await.unwrap();
}

#[tokio::test]
async fn test_post_sends_json_body_and_call_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/store/wishlists"))
        .and(header("authorization", "Bearer t"))
        .and(body_json(json!({ "sales_channel_id": "sc_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "wl_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::post()
        .with_body(json!({ "sales_channel_id": "sc_1" }))
        .with_headers(Headers::new().with("Authorization", "Bearer t"));
    let body = client_for(&server).fetch("/store/wishlists", spec).await.unwrap();

    assert_eq!(body["id"], "wl_1");
}

#[tokio::test]
async fn test_call_headers_override_publishable_key() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/store/reviews/rev_1"))
        .and(header("x-publishable-api-key", "pk_override"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "rev_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::delete()
        .with_headers(Headers::new().with("x-publishable-api-key", "pk_override"));
    client_for(&server).fetch("/store/reviews/rev_1", spec).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let keys: Vec<_> = received[0]
        .headers
        .get_all("x-publishable-api-key")
        .iter()
        .collect();
    assert_eq!(keys, vec!["pk_override"]);
}

#[tokio::test]
async fn test_non_success_status_is_reported_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/wishlists/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("{\"message\":\"Wishlist not found\"}"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch("/store/wishlists/missing", RequestSpec::get())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Status {
            status: 404,
            body: "{\"message\":\"Wishlist not found\"}".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/store/wishlists/wl_1/transfer"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = client_for(&server)
        .fetch("/store/wishlists/wl_1/transfer", RequestSpec::post())
        .await
        .unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/econt/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch("/store/econt/cities", RequestSpec::get())
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = HttpStoreClient::new(&TransportConfig::new(uri)).unwrap();
    let err = client.fetch("/store/paypal/client-token", RequestSpec::post()).await.unwrap_err();

    assert!(matches!(err, TransportError::Network { .. }));
}
