use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kaapav::{api, config, db, infrastructure::AppState, seed};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaapav=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Select the backing store: SQLite when DATABASE_URL is set, otherwise
    // the in-memory store preloaded with the demo fixtures
    let state = match config.database_url.as_deref() {
        Some(url) => {
            let db = db::init_db(url)
                .await
                .expect("Failed to initialize database");
            let state = AppState::with_database(db, &config);

            if std::env::var("SEED_DEMO").is_ok() {
                tracing::info!("Seeding demo data...");
                match seed::seed_demo_data(&state).await {
                    Ok(()) => tracing::info!("Demo data seeded successfully."),
                    Err(e) => tracing::error!("Failed to seed data: {}", e),
                }
            }

            state
        }
        None => {
            let state = AppState::in_memory(&config);
            if let Err(e) = seed::seed_demo_data(&state).await {
                tracing::error!("Failed to seed data: {}", e);
            }
            state
        }
    };

    // Build API router
    let api_router = api::api_router(state);

    // Swagger UI
    use kaapav::api_docs::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    let cors = if config.cors_allowed_origins.is_empty() {
        // The original deployment serves browser clients from anywhere
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let mut cors_allowed_origins = Vec::new();
        for origin in &config.cors_allowed_origins {
            match origin.parse::<axum::http::HeaderValue>() {
                Ok(v) => cors_allowed_origins.push(v),
                Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
            }
        }
        CorsLayer::new()
            .allow_origin(cors_allowed_origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("KAAPAV server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
