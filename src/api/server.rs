use crate::api::routes;
use crate::app::App;
use crate::errors::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Starts and runs the HTTP server until it fails
///
/// # Arguments
/// * `app` - Crew and tools shared by every request
/// * `port` - Port number to listen on for incoming HTTP connections
pub async fn launch_server(app: Arc<App>, port: u16) -> Result<()> {
    let router = routes::app(app);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
