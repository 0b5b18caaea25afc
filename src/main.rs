use axum::Router;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use unihub_server::auth::LocalIdentity;
use unihub_server::config::Config;
use unihub_server::handlers::AppState;
use unihub_server::repository::Repository;
use unihub_server::routes::create_routes;
use unihub_server::store::JsonFileStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let store = JsonFileStore::new(&config.data_dir).expect("Failed to prepare data directory");
    tracing::info!("Collections stored under {}", config.data_dir.display());

    let state = AppState {
        repository: Arc::new(Repository::new(Arc::new(store))),
        identity: Arc::new(LocalIdentity::new()),
    };

    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
