use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use roster_api::api::handlers::members;
use roster_api::infrastructure::{database, seed};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Get database URL
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::warn!("DATABASE_URL not set, using default");
        "sqlite:roster.db?mode=rwc".to_string()
    });

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = database::init_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    database::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database connected successfully");

    // Optionally load the demo roster
    if seed_enabled() {
        seed::seed_demo_data(&pool)
            .await
            .expect("Failed to seed demo data");
    }

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(members::health_check))
        // Member search routes
        .route("/v1/members", get(members::search_members_v1))
        .route("/v2/members", get(members::search_members_v2))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(pool);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}

fn seed_enabled() -> bool {
    std::env::var("SEED_DEMO_DATA")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
        .unwrap_or(false)
}
