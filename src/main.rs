use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use helping_hands_server::config::Config;
use helping_hands_server::db;
use helping_hands_server::routes::create_routes;
use helping_hands_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "helping_hands_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = db::connect(&config)
        .await
        .expect("Failed to open database");

    tracing::info!("Successfully connected to database");

    let app = create_routes(AppState::new(pool, config.session_ttl), &config);

    tracing::info!("Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
