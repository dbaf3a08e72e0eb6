use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use pricewatch::external::http_client::TrackerApiClient;
use pricewatch::external::tracker_api::{
    ApiError, AuthApi, NotificationApi, ProductApi, SettingsApi,
};
use pricewatch::models::{
    CreateProductRequest, LoginRequest, UpdateProductRequest, User, UserSettings,
    PLACEHOLDER_IMAGE,
};
use pricewatch::services::session::{AuthState, Session};
use pricewatch::store::session_storage::{TOKEN_KEY, USER_KEY};
use pricewatch::store::{FileSessionStorage, MemorySessionStorage, SessionStorage};

fn user() -> User {
    User {
        email: "ada@example.com".to_string(),
        full_name: Some("Ada Lovelace".to_string()),
    }
}

fn signed_in_client(server: &MockServer) -> TrackerApiClient {
    let session = Session::new(Arc::new(MemorySessionStorage::new()));
    session.establish("tok-123", &user()).unwrap();
    TrackerApiClient::with_base_url(&server.base_url(), Duration::from_secs(5), session).unwrap()
}

fn product_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "url": "https://shop.example.com/item",
        "current_price": 120.0,
        "target_price": 100.0,
        "image": PLACEHOLDER_IMAGE,
        "last_checked": "2024-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products/")
                .header("authorization", "Bearer tok-123");
            then.status(200).json_body(json!([product_json(1, "Kettle")]));
        })
        .await;

    let products = signed_in_client(&server).get_products().await.unwrap();

    mock.assert_async().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Kettle");
    assert!(products[0].last_checked.is_some());
}

#[tokio::test]
async fn test_unauthorized_expires_stored_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/");
            then.status(401).json_body(json!({"detail": "Could not validate credentials"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileSessionStorage::new(dir.path().join("session.json")));
    let session = Session::new(storage.clone());
    session.establish("tok-123", &user()).unwrap();
    let client =
        TrackerApiClient::with_base_url(&server.base_url(), Duration::from_secs(5), session.clone())
            .unwrap();

    let result = client.get_products().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(session.state(), AuthState::Anonymous { login_required: true });
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(400)
                .json_body(json!({"detail": "Incorrect email or password"}));
        })
        .await;

    let session = Session::new(Arc::new(MemorySessionStorage::new()));
    let client =
        TrackerApiClient::with_base_url(&server.base_url(), Duration::from_secs(5), session)
            .unwrap();

    let result = client
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;

    match result {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.access_token)),
    }
}

#[tokio::test]
async fn test_unauthorized_login_without_token_keeps_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .json_body(json!({"detail": "Incorrect email or password"}));
        })
        .await;

    let session = Session::new(Arc::new(MemorySessionStorage::new()));
    session.restore();
    let client =
        TrackerApiClient::with_base_url(&server.base_url(), Duration::from_secs(5), session.clone())
            .unwrap();

    let result = client
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;

    match result {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.access_token)),
    }
    assert_eq!(session.state(), AuthState::Anonymous { login_required: false });
}

#[tokio::test]
async fn test_error_without_body_uses_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/5");
            then.status(500);
        })
        .await;

    let result = signed_in_client(&server).get_product(5).await;

    match result {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP error! status: 500");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_null_body_is_empty_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/");
            then.status(200).body("null");
        })
        .await;

    let result = signed_in_client(&server).get_products().await;

    assert!(matches!(result, Err(ApiError::EmptyResponse)));
}

#[tokio::test]
async fn test_product_endpoints() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/products/")
                .json_body_partial(r#"{"name": "Kettle", "target_price": 40.0}"#);
            then.status(201).json_body(product_json(11, "Kettle"));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/products/11");
            then.status(200).json_body(product_json(11, "Steel kettle"));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/products/11");
            then.status(204);
        })
        .await;
    let history = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/11/price-history");
            then.status(200).json_body(json!([
                {"date": "2024-03-01", "price": 55.0},
                {"date": "2024-03-02", "price": 52.5}
            ]));
        })
        .await;

    let client = signed_in_client(&server);

    let created = client
        .create_product(&CreateProductRequest {
            name: "Kettle".to_string(),
            url: "https://shop.example.com/item".to_string(),
            current_price: 0.0,
            target_price: 40.0,
            image: PLACEHOLDER_IMAGE.to_string(),
        })
        .await
        .unwrap();
    let updated = client
        .update_product(
            created.id,
            &UpdateProductRequest {
                name: "Steel kettle".to_string(),
                current_price: 120.0,
                target_price: 100.0,
                image: PLACEHOLDER_IMAGE.to_string(),
            },
        )
        .await
        .unwrap();
    let points = client.get_price_history(created.id).await.unwrap();
    client.delete_product(created.id).await.unwrap();

    create.assert_async().await;
    update.assert_async().await;
    history.assert_async().await;
    delete.assert_async().await;
    assert_eq!(updated.name, "Steel kettle");
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].price, 52.5);
}

#[tokio::test]
async fn test_notification_and_settings_endpoints() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/notifications/");
            then.status(200).json_body(json!([
                {"id": 3, "message": "Kettle dropped below €40.00", "product_id": 11, "read": false}
            ]));
        })
        .await;
    let mark_read = server
        .mock_async(|when, then| {
            when.method(PUT).path("/notifications/3/read");
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/settings");
            then.status(200).json_body(json!({
                "email_notifications": false,
                "currency": "USD",
                "theme": "dark"
            }));
        })
        .await;
    let save = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/user/settings")
                .json_body_partial(r#"{"check_interval_hours": 6, "theme": "dark"}"#);
            then.status(200).json_body(json!({
                "email_notifications": false,
                "check_interval_hours": 6,
                "currency": "USD",
                "theme": "dark"
            }));
        })
        .await;

    let client = signed_in_client(&server);

    let notifications = client.get_notifications().await.unwrap();
    client.mark_notification_read(notifications[0].id).await.unwrap();

    let mut settings: UserSettings = client.get_settings().await.unwrap();
    assert!(!settings.email_notifications);
    assert_eq!(settings.check_interval_hours, 1);
    settings.apply("check_interval_hours", "6").unwrap();
    let saved = client.update_settings(&settings).await.unwrap();

    mark_read.assert_async().await;
    save.assert_async().await;
    assert!(!notifications[0].read);
    assert_eq!(saved.check_interval_hours, 6);
    assert_eq!(saved.extra.get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("OK");
        })
        .await;

    let body = signed_in_client(&server).health_check().await.unwrap();

    assert_eq!(body, "OK");
}
