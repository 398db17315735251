//! Router for the demo page and its state-changing endpoints

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::csrf_guard;
use super::pages;
use super::state::AppState;

/// Create the router for all endpoints, with HTTP tracing
///
/// - `GET /` renders the page
/// - `POST /login`, `POST /logout`, `POST /username` are wrapped by [`csrf_guard`]
pub fn csrf_newbie_router(state: AppState) -> Router {
    csrf_newbie_router_no_trace(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`csrf_newbie_router`] but without the HTTP tracing middleware.
pub fn csrf_newbie_router_no_trace(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/login", post(pages::login))
        .route("/logout", post(pages::logout))
        .route("/username", post(pages::change_username))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            csrf_guard,
        ));

    Router::new()
        .route("/", get(pages::index))
        .merge(guarded)
        .with_state(state)
}
