use std::net::SocketAddr;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use tessera_server::config::Config;
use tessera_server::routes::create_routes;
use tessera_server::state::AppState;
use tessera_server::storage::Database;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();

    let db = Database::open(&config.database_path)
        .await
        .expect("Failed to open database");

    tracing::info!("Database ready");

    let state = AppState::new(db, &config);
    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
