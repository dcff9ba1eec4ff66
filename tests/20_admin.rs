mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn seed_requires_count() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "root", "supusr");

    let (status, body) = common::get(&app, "/admin/seed", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "count is required");
}

#[tokio::test]
async fn seed_with_unparseable_count_reports_the_detail() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "root", "supusr");

    let (status, body) = common::get(&app, "/admin/seed?count=five", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("count:"));
}

#[tokio::test]
async fn seed_then_remove_seed_round_trips() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "root", "supusr");

    let (status, body) = common::get(&app, "/admin/seed?count=8", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["friends"]["nrSeededItems"], 8);

    let (status, body) = common::get(&app, "/admin/removeseed", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["friends"]["nrSeededItems"], 0);
    assert_eq!(body["data"]["pets"]["nrSeededItems"], 0);
    assert_eq!(body["data"]["quotes"]["nrSeededItems"], 0);
}

#[tokio::test]
async fn remove_seed_and_seed_users_are_super_user_only() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "anna", "usr");

    let (status, _body) = common::get(&app, "/admin/removeseed", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = common::get(&app, "/admin/seedusers", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seed_users_reports_counts_and_defaults() {
    let (app, state) = common::test_app();
    let token = common::token_for(&state, "root", "supusr");

    let (status, body) =
        common::get(&app, "/admin/seedusers?countUsr=3&countSupUsr=1", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nrSeededUsers"], 3);
    assert_eq!(body["data"]["nrSeededSuperUsers"], 1);

    let (status, body) = common::get(&app, "/admin/seedusers", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nrSeededUsers"], 32);
    assert_eq!(body["data"]["nrSeededSuperUsers"], 2);
}

#[tokio::test]
async fn seeded_data_is_visible_through_read() {
    let (app, state) = common::test_app();
    let supusr = common::token_for(&state, "root", "supusr");
    let usr = common::token_for(&state, "anna", "usr");

    common::get(&app, "/admin/seed?count=5", Some(&supusr)).await;

    let (status, body) = common::get(&app, "/friends/read?seeded=true&pageSize=3", Some(&usr)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dbItemsCount"], 5);
    assert_eq!(body["data"]["pageItems"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["pageCount"], 2);
}
