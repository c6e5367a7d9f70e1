//! Router tests for request paths that are decided before the database is
//! touched: authentication, validation, cookies and CORS.

mod support;

use axum::http::{Method, StatusCode, header};
use serde_json::json;
use uuid::Uuid;

use support::{body_json, empty_request, json_request, lazy_app, send, token_for};

#[tokio::test]
async fn test_welcome() {
    let app = lazy_app();
    let response = send(&app, empty_request("GET", "/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = lazy_app();

    for (method, uri) in [
        ("GET", "/api/user/me"),
        ("GET", "/api/user/my-issues?page=1"),
        ("GET", "/api/user/statistics"),
        ("GET", "/api/issue/6f1c5b8e-4a37-4b9e-9d3c-0a9f5d2f4e11"),
        ("DELETE", "/api/issue/6f1c5b8e-4a37-4b9e-9d3c-0a9f5d2f4e11"),
    ] {
        let response = send(&app, empty_request(method, uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No token provided");
    }
}

#[tokio::test]
async fn test_invalid_token_is_forbidden() {
    let app = lazy_app();
    let response = send(&app, empty_request("GET", "/api/user/me", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Forbidden");
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/user/my-issues?page=0")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();

    // Authenticated, so the request reaches validation
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_page_number() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    for page in ["0", "-2", "abc"] {
        let uri = format!("/api/user/my-issues?page={}", page);
        let response = send(&app, empty_request("GET", &uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid page number");
    }
}

#[tokio::test]
async fn test_unknown_filter_value() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let response = send(
        &app,
        empty_request("GET", "/api/user/my-issues?status=done", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid status: done");
}

#[tokio::test]
async fn test_malformed_issue_id() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let response = send(&app, empty_request("GET", "/api/issue/12345", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid issue id");
}

#[tokio::test]
async fn test_create_issue_validation() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/issue",
            Some(&token),
            json!({"title": "", "description": "Steps to reproduce"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Title must not be empty");

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/issue",
            Some(&token),
            json!({"title": "Crash", "description": "On save", "severity": "critical"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_patch_issue_validation_runs_before_lookup() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());
    let uri = format!("/api/issue/{}", Uuid::new_v4());

    let response = send(
        &app,
        json_request("PATCH", &uri, Some(&token), json!({"description": "   "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Description must not be empty"
    );
}

#[tokio::test]
async fn test_register_validation() {
    let app = lazy_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/user/register",
            None,
            json!({
                "username": "ada",
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "password": "weak"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Password must be at least 8 characters long"
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request_envelope() {
    let app = lazy_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/user/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = lazy_app();
    let response = send(&app, empty_request("POST", "/api/user/logout", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_chat_requires_message() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let response = send(
        &app,
        json_request("POST", "/api/ai/chat", Some(&token), json!({"message": "  "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Message is required");
}

#[tokio::test]
async fn test_chat_without_ai_service() {
    let app = lazy_app();
    let token = token_for(Uuid::new_v4());

    let response = send(
        &app,
        json_request("POST", "/api/ai/chat", Some(&token), json!({"message": "hi"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "AI service is not configured"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_credentials() {
    let app = lazy_app();

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/issue")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
