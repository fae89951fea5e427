use crate::config::Mode;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, get_service, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Everything is mounted under the configured base path: the JSON API at
/// `/api`, the client at the root.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/logs", get(handlers::list_logs))
        .route("/logs/:date", get(handlers::get_log).put(handlers::put_log))
        .route("/weights", get(handlers::get_weights))
        .route("/plan", get(handlers::get_plan))
        .route("/days/:date", get(handlers::get_day))
        .route("/session", get(handlers::start_session))
        .route("/session/events", post(handlers::session_event));

    let client = match (config.mode, &config.client_dist) {
        (Mode::Production, Some(dist)) => get_service(ServeFile::new(dist.join("index.html"))),
        _ => get(handlers::index),
    };

    let site = Router::new().nest("/api", api).route("/", client.clone());
    let site = match (config.mode, &config.client_dist) {
        (Mode::Production, Some(dist)) => site.fallback_service(
            ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html"))),
        ),
        // Unknown client paths render the page so client-side routes survive a reload.
        (Mode::Production, None) => site.fallback(handlers::index),
        (Mode::Development, _) => site,
    };

    let mut app = if config.base_path.is_empty() {
        site
    } else {
        // The nested root only answers the bare prefix.
        Router::new()
            .route(&format!("{}/", config.base_path), client)
            .nest(&config.base_path, site)
    };

    if config.mode == Mode::Development {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::PUT, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
