mod common;

use axum::http::{Method, StatusCode};
use common::http::{app, register, send};
use serde_json::json;

#[tokio::test]
async fn protected_routes_reject_malformed_tokens() {
    let app = app();

    let cases = [
        (Method::GET, "/admin/quiz/list"),
        (Method::GET, "/admin/user/details"),
        (Method::GET, "/admin/quiz/1"),
        (Method::POST, "/admin/quiz/1/session/start"),
        (Method::GET, "/admin/quiz/trash"),
    ];

    for token in [None, Some(""), Some("abc"), Some("12x")] {
        for (method, uri) in cases.clone() {
            let (status, body) = send(&app, method, uri, token, None).await;
            assert_eq!(
                status,
                StatusCode::UNAUTHORIZED,
                "expected UNAUTHORIZED for {uri} with {token:?}",
            );
            assert!(body["error"].is_string());
        }
    }
}

#[tokio::test]
async fn unknown_token_is_forbidden() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/admin/user/details", Some("123456"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn valid_token_is_accepted_until_logout() {
    let app = app();
    let token = register(&app, "hayden@example.com").await;

    let (status, _) = send(&app, Method::GET, "/admin/user/details", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/admin/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/admin/user/details", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn player_routes_need_no_token() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/player/join",
        None,
        Some(json!({ "sessionId": 1, "name": "alice" })),
    )
    .await;
    // No such session, but the request got past authentication.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
