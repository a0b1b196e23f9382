//! Auth Router

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::GatewayRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_session;
use crate::presentation::validator::{
    check_password_length, check_username_exists, check_username_free, read_credentials,
};

/// Routes mounted under `/api/auth`
///
/// Validator layers run bottom-up: the last `.route_layer` sees the request
/// first. They only wrap the POST handler, so other methods still get 405.
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: GatewayRepository,
{
    Router::new()
        .route(
            "/register",
            post(handlers::register::<R>)
                .route_layer(from_fn(check_password_length))
                .route_layer(from_fn_with_state(
                    state.clone(),
                    check_username_free::<R>,
                ))
                .route_layer(from_fn(read_credentials)),
        )
        .route(
            "/login",
            post(handlers::login::<R>)
                .route_layer(from_fn(check_password_length))
                .route_layer(from_fn_with_state(
                    state.clone(),
                    check_username_exists::<R>,
                ))
                .route_layer(from_fn(read_credentials)),
        )
        .route("/logout", get(handlers::logout::<R>))
        .route("/session", get(handlers::session_status::<R>))
        .with_state(state)
}

/// Routes mounted under `/api/users`, all behind [`require_session`]
pub fn users_router<R>(state: AuthAppState<R>) -> Router
where
    R: GatewayRepository,
{
    Router::new()
        .route("/", get(handlers::list_users::<R>))
        .route_layer(from_fn_with_state(state.clone(), require_session::<R>))
        .with_state(state)
}

/// Both routers at their public paths
pub fn gateway_router<R>(repo: R, config: AuthConfig) -> Router
where
    R: GatewayRepository,
{
    let state = AuthAppState::new(repo, config);

    Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .nest("/api/users", users_router(state))
}
