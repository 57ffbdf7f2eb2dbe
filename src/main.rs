use std::net::SocketAddr;
use std::sync::Arc;

use job_portal_backend::{
    config::{get_config, init_config, StorageBackend},
    database::{pool::create_pool, MemoryStore},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool().await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to Postgres and applied migrations");
            AppState::new(pool)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::with_store(Arc::new(MemoryStore::new()))
        }
    };

    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; job description generation will fail");
    }

    let app = routes::app(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
