/**
 * Canvelot Server Entry Point
 *
 * Loads configuration from the environment, initializes tracing, builds
 * the application, and serves it. Configuration problems and startup
 * failures end the process with the error printed; there is no degraded
 * mode.
 */

use canvelot::config::ServerConfig;
use canvelot::server::create_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "canvelot=debug,tower_http=info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ServerConfig::from_env()?;
    let port = config.port;

    let app = create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
