pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod sessions;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionRegistry>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState {
        db: Arc::new(db),
        sessions: Arc::new(SessionRegistry::new()),
    };

    let app = build_router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full application router over the given state.
pub fn build_router(state: AppState) -> Router {
    // Build router with protected routes
    let protected_routes = Router::new()
        // Deck routes
        .route("/api/decks", get(routes::decks::list))
        .route("/api/decks", post(routes::decks::create))
        .route("/api/decks/{deck_id}", get(routes::decks::get))
        .route("/api/decks/{deck_id}", delete(routes::decks::remove))
        .route("/api/decks/{deck_id}/stats", get(routes::decks::stats))
        .route("/api/decks/{deck_id}/import", post(routes::decks::import))
        // Card routes
        .route("/api/decks/{deck_id}/cards", post(routes::decks::add_card))
        .route(
            "/api/decks/{deck_id}/cards/{card_id}",
            put(routes::decks::update_card),
        )
        .route(
            "/api/decks/{deck_id}/cards/{card_id}",
            delete(routes::decks::delete_card),
        )
        // Study routes
        .route("/api/decks/{deck_id}/study", post(routes::study::start))
        .route("/api/decks/{deck_id}/study", get(routes::study::view))
        .route("/api/decks/{deck_id}/study", delete(routes::study::abandon))
        .route(
            "/api/decks/{deck_id}/study/answer",
            post(routes::study::answer),
        )
        .route(
            "/api/decks/{deck_id}/study/retype",
            post(routes::study::retype),
        )
        .route(
            "/api/decks/{deck_id}/study/advance",
            post(routes::study::advance),
        )
        .route(
            "/api/decks/{deck_id}/study/reset",
            post(routes::study::reset),
        )
        // Test routes
        .route("/api/decks/{deck_id}/test", post(routes::test_mode::start))
        .route("/api/decks/{deck_id}/test", get(routes::test_mode::view))
        .route(
            "/api/decks/{deck_id}/test",
            delete(routes::test_mode::abandon),
        )
        .route(
            "/api/decks/{deck_id}/test/answer",
            post(routes::test_mode::answer),
        )
        .route(
            "/api/decks/{deck_id}/test/advance",
            post(routes::test_mode::advance),
        )
        .route(
            "/api/decks/{deck_id}/test/submit",
            post(routes::test_mode::submit),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
