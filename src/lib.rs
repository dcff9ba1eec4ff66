use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

#[cfg(test)]
pub mod testing;

use config::AppConfig;
use services::{FriendsService, LoginService};

/// Everything a request handler needs, built once at startup and shared by
/// handle. The configuration is immutable after construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub friends: Arc<dyn FriendsService>,
    pub logins: Arc<dyn LoginService>,
}

pub fn app(state: AppState) -> Router {
    use handlers::{admin, friends, info, login, pets, quotes};

    // Read, item reads, create and update are open to usr and supusr.
    let user_routes = Router::new()
        .route("/friends/read", get(friends::read))
        .route("/friends/readitem", get(friends::read_item))
        .route("/friends/readitemdto", get(friends::read_item_dto))
        .route("/friends/createitem", post(friends::create_item))
        .route("/friends/updateitem/:id", put(friends::update_item))
        .route("/pets/read", get(pets::read))
        .route("/pets/readitem", get(pets::read_item))
        .route("/pets/readitemdto", get(pets::read_item_dto))
        .route("/pets/createitem", post(pets::create_item))
        .route("/pets/updateitem/:id", put(pets::update_item))
        .route("/quotes/read", get(quotes::read))
        .route("/quotes/readitem", get(quotes::read_item))
        .route("/quotes/readitemdto", get(quotes::read_item_dto))
        .route("/quotes/createitem", post(quotes::create_item))
        .route("/quotes/updateitem/:id", put(quotes::update_item))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user,
        ));

    // Deletes and the whole admin surface are superuser-only.
    let super_user_routes = Router::new()
        .route("/friends/deleteitem/:id", delete(friends::delete_item))
        .route("/pets/deleteitem/:id", delete(pets::delete_item))
        .route("/quotes/deleteitem/:id", delete(quotes::delete_item))
        .route("/admin/seed", get(admin::seed))
        .route("/admin/removeseed", get(admin::remove_seed))
        .route("/admin/seedusers", get(admin::seed_users))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_super_user,
        ));

    Router::new()
        // Public
        .route("/", get(info::root))
        .route("/health", get(info::health))
        .route("/auth/login", post(login::login))
        // Gated
        .merge(user_routes)
        .merge(super_user_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
