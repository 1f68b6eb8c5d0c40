use std::{net::SocketAddr, sync::Arc};

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tubefetch::{
    common::{banner, logger, types::AnyResult},
    configs::Config,
    server::AppState,
    transport,
};

#[tokio::main]
async fn main() -> AnyResult<()> {
    let config = Config::load()?;
    logger::init(&config);

    let address: SocketAddr = config.server.address().parse()?;
    banner::print_banner(
        &banner::BuildInfo::default(),
        &address.to_string(),
        &config.transcoder.ffmpeg_path,
    );

    let shared_state = Arc::new(AppState::new(config)?);

    let app = transport::http_server::router(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("tubefetch listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
