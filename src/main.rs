use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use seo_page_analyzer::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seo_page_analyzer=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        fetch_timeout = ?config.fetch_timeout,
        analyze_timeout = ?config.analyze_timeout,
        "starting server on {}",
        server_addr
    );

    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
