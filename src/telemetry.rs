//! Tracing subscriber setup
//!
//! Console output is pretty or JSON. When `logging.otlp_endpoint` is set,
//! spans are also exported over OTLP/HTTP.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const SERVICE_NAME: &str = "weatherly";

/// Shuts down the tracer provider on drop so buffered spans are flushed
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("otlp", &self.provider.is_some())
            .finish()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {e:?}");
            }
        }
    }
}

/// Default filter when `RUST_LOG` is unset
fn default_filter(level: &str) -> String {
    format!("{SERVICE_NAME}={level},tower_http={level}")
}

fn build_provider(endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .with_context(|| format!("Failed to create OTLP exporter for {endpoint}"))?;

    let resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, crate::VERSION))
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Install the global tracing subscriber.
///
/// Keep the returned guard alive for the lifetime of the process.
pub fn init_telemetry(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.level)))
        .context("Invalid log filter")?;

    let (json_layer, pretty_layer) = if config.format == "json" {
        (Some(fmt::layer().json().with_current_span(true)), None)
    } else {
        (None, Some(fmt::layer().with_target(true)))
    };

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(build_provider)
        .transpose()?;
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(otel_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(
        format = %config.format,
        otlp = config.otlp_endpoint.as_deref().unwrap_or("disabled"),
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}
