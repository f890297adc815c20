//! 스텁 백엔드(mockito)를 상대로 한 데이터 접근/세션 발급 통합 테스트.

use std::time::Duration;

use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use shopdesk_backend::{
    AuthError, AuthFailureBus, BackendClient, BackendError, Credentials, ListQuery, SessionIssuer,
};
use shopdesk_core::{BackendConfig, ProductInput, Role};

fn client_for(url: &str) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_login_with_valid_credentials_returns_backend_token_and_role() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/auth/login")
        .match_header("cache-control", "no-store")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJsonString(
            r#"{"identifier": "vendor@shop.io", "password": "hunter22"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "success": true,
                "data": {
                    "accessToken": "backend-issued-123",
                    "user": {
                        "_id": "u-42",
                        "email": "vendor@shop.io",
                        "username": "vendor42",
                        "firstName": "Ana",
                        "lastName": "Lee",
                        "role": "VENDOR",
                        "isEmailVerified": true
                    }
                }
            }"#,
        )
        .create_async()
        .await;

    let issuer = SessionIssuer::new(client_for(&server.url()), chrono::Duration::days(30));
    let session = issuer
        .login(&Credentials::new("vendor@shop.io", "hunter22"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(session.access_token, "backend-issued-123");
    assert_eq!(session.role(), Role::Vendor);
    assert_eq!(session.user.user_id, "u-42");
    assert!(session.user.email_verified);
}

#[tokio::test]
async fn test_login_with_invalid_credentials_returns_generic_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(401)
        .with_body(r#"{"success": false, "message": "No user vendor@shop.io in tenant 7", "stack": "at AuthService.login (auth.ts:42)"}"#)
        .create_async()
        .await;

    let issuer = SessionIssuer::new(client_for(&server.url()), chrono::Duration::days(1));
    let err = issuer
        .login(&Credentials::new("nobody", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::InvalidCredentials("Invalid email/username or password".to_string())
    );
    assert!(!err.to_string().contains("tenant"));
    assert!(!err.to_string().contains("auth.ts"));
}

#[tokio::test]
async fn test_login_with_unparseable_rejection_uses_generic_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(400)
        .with_body("<html>Bad Request</html>")
        .create_async()
        .await;

    let issuer = SessionIssuer::new(client_for(&server.url()), chrono::Duration::days(1));
    let err = issuer.login(&Credentials::new("a", "b")).await.unwrap_err();

    assert_eq!(
        err,
        AuthError::InvalidCredentials("Invalid email/username or password".to_string())
    );
}

#[tokio::test]
async fn test_login_with_backend_server_error_is_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success": false, "message": "MongoServerError: connection refused to db-prod-3:27017"}"#,
        )
        .create_async()
        .await;

    let issuer = SessionIssuer::new(client_for(&server.url()), chrono::Duration::days(1));
    let err = issuer.login(&Credentials::new("a", "b")).await.unwrap_err();

    assert_eq!(err, AuthError::BackendUnavailable);
    assert!(!err.to_string().contains("db-prod-3"));
}

#[tokio::test]
async fn test_login_accepts_lowercase_role() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success": true, "data": {
                "accessToken": "tok-admin",
                "user": {"_id": "u-1", "email": "ops@shop.io", "username": "ops", "role": "admin"}
            }}"#,
        )
        .create_async()
        .await;

    let issuer = SessionIssuer::new(client_for(&server.url()), chrono::Duration::days(1));
    let session = issuer
        .login(&Credentials::new("ops@shop.io", "pw"))
        .await
        .unwrap();

    assert_eq!(session.role(), Role::Admin);
}

#[tokio::test]
async fn test_login_with_unreachable_backend_fails_cleanly() {
    let issuer = SessionIssuer::new(client_for("http://127.0.0.1:9"), chrono::Duration::days(1));
    let err = issuer.login(&Credentials::new("a", "b")).await.unwrap_err();
    assert_eq!(err, AuthError::BackendUnavailable);
}

#[tokio::test]
async fn test_list_products_attaches_bearer_and_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/products")
        .match_header("authorization", "Bearer tok-1")
        .match_header("cache-control", "no-store")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("search".into(), "linen".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"items": [
                {"_id": "p1", "name": "Linen Shirt", "price": 39.9},
                {"_id": "p2", "name": "Linen Pants", "price": "59.00", "stock": 4}
            ], "total": 12, "page": 2, "limit": 10}}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server.url());
    let page = client
        .products()
        .list(&ListQuery::page(2, 10).with_search("linen"), Some("tok-1"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 2);
    assert_eq!(page.total, 12);
    assert_eq!(page.items[1].price, dec!(59.00));
    assert_eq!(page.items[1].stock, 4);
}

#[tokio::test]
async fn test_users_list_uses_getusers_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/users/getusers")
        .with_status(200)
        .with_body(r#"[{"_id": "u1", "email": "c@shop.io", "username": "c1", "role": "CUSTOMER"}]"#)
        .create_async()
        .await;

    let users = client_for(&server.url())
        .users()
        .list(&ListQuery::default(), Some("admin-token"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(users.items[0].profile.role, Role::Customer);
}

#[tokio::test]
async fn test_create_and_delete_product() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/v1/products")
        .match_body(Matcher::Json(serde_json::json!({"name": "Cap", "price": "19.5"})))
        .with_status(201)
        .with_body(r#"{"success": true, "data": {"_id": "p9", "name": "Cap", "price": 19.5}}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v1/products/p9")
        .with_status(200)
        .with_body(r#"{"success": true, "message": "Product deleted"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let input = ProductInput {
        name: Some("Cap".to_string()),
        price: Some(dec!(19.5)),
        ..Default::default()
    };
    let product = client.products().create(&input, Some("t")).await.unwrap();
    assert_eq!(product.id, "p9");

    client.products().delete("p9", Some("t")).await.unwrap();

    create.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_backend_error_is_structured_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/api/v1/categories/c1")
        .with_status(409)
        .with_body(r#"{"success": false, "message": "Slug already exists"}"#)
        .create_async()
        .await;

    let err = client_for(&server.url())
        .categories()
        .update("c1", &Default::default(), Some("t"))
        .await
        .unwrap_err();

    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Slug already exists");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_unauthorized_calls_broadcast_once() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/api/v1/(categories|brands)$".to_string()))
        .with_status(401)
        .with_body(r#"{"message": "jwt expired"}"#)
        .expect(2)
        .create_async()
        .await;

    let bus = AuthFailureBus::new(8, Duration::from_secs(5));
    let mut events = bus.subscribe();
    let client = client_for(&server.url()).with_auth_failure_bus(bus.clone());

    let query = ListQuery::default();
    let categories_api = client.categories();
    let brands_api = client.brands();
    let (categories, brands) = tokio::join!(
        categories_api.list(&query, Some("stale-token")),
        brands_api.list(&query, Some("stale-token")),
    );

    assert!(categories.unwrap_err().is_auth_error());
    assert!(brands.unwrap_err().is_auth_error());

    let first = events.recv().await.unwrap();
    assert_eq!(first.status, 401);
    assert_eq!(first.reason, "jwt expired");
    assert!(events.try_recv().is_err(), "second failure must be suppressed");
}
