use dotenvy::dotenv;
use image_service::config::ImageConfig;
use image_service::startup::Application;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing("image-service", "info");

    let config = ImageConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let max_part_numbers = config.upstream.max_part_numbers;
    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start server: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    info!("Server running on http://localhost:{}", app.port());
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  GET  /capabilities - Server capabilities");
    info!(
        "  POST /fetch-images - Fetch images by part numbers (max {})",
        max_part_numbers
    );

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
