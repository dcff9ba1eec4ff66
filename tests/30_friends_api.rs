mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

async fn create_friend(
    app: &axum::Router,
    token: &str,
    first: &str,
    last: &str,
) -> serde_json::Value {
    let body = json!({ "firstName": first, "lastName": last });
    let (status, body) =
        common::send(app, common::request("POST", "/friends/createitem", Some(token), Some(&body)))
            .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn create_then_read_item() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let created = create_friend(&app, &token, "Rex", "Berg").await;
    let id = created["friendId"].as_str().unwrap().to_string();

    let (status, body) = common::get(&app, &format!("/friends/readitem?id={}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], "Rex");
    // flat defaults to false on item reads
    assert!(body["data"]["pets"].is_array());
}

#[tokio::test]
async fn read_item_unknown_id_is_not_found() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let path = format!("/friends/readitem?id={}", Uuid::new_v4());
    let (status, body) = common::get(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does not exist"));
}

#[tokio::test]
async fn read_item_malformed_id_is_a_client_error() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let (status, body) = common::get(&app, "/friends/readitem?id=not-a-guid", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("id:"));
}

#[tokio::test]
async fn filter_is_normalized_before_reaching_the_service() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    create_friend(&app, &token, "Rex", "Andersson").await;
    create_friend(&app, &token, "Anna", "Berg").await;

    // " Rex " must normalize to "rex" and match case-insensitively.
    let (status, body) = common::get(
        &app,
        "/friends/read?seeded=false&filter=%20Rex%20",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dbItemsCount"], 1);
    assert_eq!(body["data"]["pageItems"][0]["firstName"], "Rex");
}

#[tokio::test]
async fn unparseable_paging_params_fail_instead_of_defaulting() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let (status, body) = common::get(&app, "/friends/read?pageNr=abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.starts_with("pageNr:"));
    assert!(msg.contains("invalid digit"));

    let (status, body) = common::get(&app, "/friends/read?seeded=maybe", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("seeded:"));
}

#[tokio::test]
async fn update_with_mismatched_ids_is_rejected() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let created = create_friend(&app, &token, "Rex", "Berg").await;
    let other = create_friend(&app, &token, "Anna", "Holm").await;

    // Path id and body id both exist but disagree.
    let path = format!("/friends/updateitem/{}", created["friendId"].as_str().unwrap());
    let body = json!({
        "friendId": other["friendId"],
        "firstName": "Rex",
        "lastName": "Berg"
    });
    let (status, resp) =
        common::send(&app, common::request("PUT", &path, Some(&token), Some(&body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("Id mismatch"));
}

#[tokio::test]
async fn update_changes_the_item() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let created = create_friend(&app, &token, "Rex", "Berg").await;
    let id = created["friendId"].as_str().unwrap().to_string();

    let path = format!("/friends/updateitem/{}", id);
    let body = json!({ "friendId": id, "firstName": "Rexine", "lastName": "Berg" });
    let (status, resp) =
        common::send(&app, common::request("PUT", &path, Some(&token), Some(&body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["firstName"], "Rexine");
}

#[tokio::test]
async fn delete_removes_the_item() {
    let (app, state) = common::test_app();
    let usr = common::token_for(&state, "anna", "usr");
    let supusr = common::token_for(&state, "root", "supusr");

    let created = create_friend(&app, &usr, "Rex", "Berg").await;
    let id = created["friendId"].as_str().unwrap().to_string();

    let path = format!("/friends/deleteitem/{}", id);
    let (status, _resp) = common::send(&app, common::request("DELETE", &path, Some(&supusr), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _resp) = common::get(&app, &format!("/friends/readitem?id={}", id), Some(&usr)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_item_dto_wraps_the_item_in_cu_shape() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let created = create_friend(&app, &token, "Rex", "Berg").await;
    let id = created["friendId"].as_str().unwrap().to_string();

    let (status, body) =
        common::get(&app, &format!("/friends/readitemdto?id={}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["friendId"].as_str().unwrap(), id);
    assert!(body["data"]["petsId"].is_array());
    assert!(body["data"]["quotesId"].is_array());
}

#[tokio::test]
async fn pets_and_quotes_link_back_to_friends() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let friend = create_friend(&app, &token, "Anna", "Berg").await;
    let friend_id = friend["friendId"].clone();

    let pet = json!({
        "friendId": friend_id,
        "kind": "Dog",
        "mood": "Happy",
        "name": "Rex"
    });
    let (status, pet_resp) =
        common::send(&app, common::request("POST", "/pets/createitem", Some(&token), Some(&pet)))
            .await;
    assert_eq!(status, StatusCode::OK, "pet create failed: {}", pet_resp);
    let pet_id = pet_resp["data"]["petId"].as_str().unwrap().to_string();

    let quote = json!({
        "quote": "Woof.",
        "author": "Rex",
        "friendsId": [friend_id]
    });
    let (status, _quote_resp) =
        common::send(&app, common::request("POST", "/quotes/createitem", Some(&token), Some(&quote)))
            .await;
    assert_eq!(status, StatusCode::OK);

    // Non-flat pet read embeds the owner.
    let (status, body) =
        common::get(&app, &format!("/pets/readitem?id={}", pet_id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["friend"]["friendId"], friend["friendId"]);

    // Non-flat friend read embeds both collections.
    let path = format!(
        "/friends/readitem?id={}&flat=false",
        friend["friendId"].as_str().unwrap()
    );
    let (status, body) = common::get(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pets"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["quotes"].as_array().unwrap().len(), 1);

    // Pet create against an unknown friend fails with the service message.
    let orphan = json!({
        "friendId": Uuid::new_v4(),
        "kind": "Cat",
        "mood": "Grumpy",
        "name": "Stray"
    });
    let (status, body) =
        common::send(&app, common::request("POST", "/pets/createitem", Some(&token), Some(&orphan)))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not create."));
}
