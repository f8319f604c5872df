use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use weatherly::{OpenWeatherClient, WeatherService, WeatherlyConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    // first argument wins over WEATHERLY_CONFIG
    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("WEATHERLY_CONFIG"))
        .map(PathBuf::from);

    let config = WeatherlyConfig::load_from_path(config_path)?;
    let _telemetry = telemetry::init_telemetry(&config.logging)?;

    info!("Weatherly v{} starting", weatherly::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        timezone = %config.server.display_timezone,
        "Configuration loaded"
    );

    let timezone = config.server.timezone()?;
    let client = OpenWeatherClient::new(config.provider.clone())
        .context("Failed to initialize OpenWeatherMap client")?;
    let service = WeatherService::new(Arc::new(client), timezone);

    let app = web::build_app(&config.server, service);
    web::run(&config.server, app).await?;

    Ok(())
}
