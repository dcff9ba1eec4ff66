mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn bootstrap_super_user_can_log_in_and_seed() {
    let (app, _state) = common::test_app();

    let body = json!({ "userName": "sysadmin", "password": "sysadmin" });
    let (status, resp) =
        common::send(&app, common::request("POST", "/auth/login", None, Some(&body))).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", resp);
    assert_eq!(resp["data"]["role"], "supusr");
    let token = resp["data"]["token"].as_str().unwrap().to_string();

    // The issued token passes the superuser gate.
    let (status, resp) = common::get(&app, "/admin/seed?count=2", Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "seed failed: {}", resp);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _state) = common::test_app();

    let body = json!({ "userName": "sysadmin", "password": "nope" });
    let (status, resp) =
        common::send(&app, common::request("POST", "/auth/login", None, Some(&body))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Login failed");
}

#[tokio::test]
async fn unknown_user_gets_the_same_failure() {
    let (app, _state) = common::test_app();

    let body = json!({ "userName": "nobody", "password": "whatever" });
    let (status, resp) =
        common::send(&app, common::request("POST", "/auth/login", None, Some(&body))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Login failed");
}

#[tokio::test]
async fn seeded_user_can_log_in_but_cannot_delete() {
    let (app, state) = common::test_app();
    let supusr = common::token_for(&state, "root", "supusr");

    common::get(&app, "/admin/seedusers?countUsr=2&countSupUsr=1", Some(&supusr)).await;

    let body = json!({ "userName": "usr1", "password": "usr1" });
    let (status, resp) =
        common::send(&app, common::request("POST", "/auth/login", None, Some(&body))).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", resp);
    assert_eq!(resp["data"]["role"], "usr");
    let token = resp["data"]["token"].as_str().unwrap().to_string();

    let (status, _resp) = common::get(&app, "/friends/read?seeded=false", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let path = format!("/friends/deleteitem/{}", uuid::Uuid::new_v4());
    let (status, _resp) =
        common::send(&app, common::request("DELETE", &path, Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
