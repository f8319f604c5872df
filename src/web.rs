//! HTTP server assembly and lifecycle

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, request::Parts};
use axum_server::Handle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api;
use crate::config::ServerConfig;
use crate::service::WeatherService;
use crate::{Result, WeatherlyError};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Build the application router: `/api` routes, CORS, request tracing and
/// the optional static frontend.
pub fn build_app(config: &ServerConfig, service: WeatherService) -> Router {
    let mut app = Router::new().nest("/api", api::router(service));

    if let Some(dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let exact = config.allowed_origins.clone();
    let patterns = config.allowed_origin_patterns.clone();
    layer.allow_origin(AllowOrigin::predicate(
        move |origin: &HeaderValue, _: &Parts| {
            origin
                .to_str()
                .is_ok_and(|origin| origin_allowed(origin, &exact, &patterns))
        },
    ))
}

fn origin_allowed(origin: &str, exact: &[String], patterns: &[String]) -> bool {
    exact.iter().any(|o| o == origin) || patterns.iter().any(|p| wildcard_match(p, origin))
}

/// Match `value` against a pattern where `*` stands for any run of characters
fn wildcard_match(pattern: &str, value: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return false;
    };
    let Some(mut rest) = value.strip_prefix(first) else {
        return false;
    };

    let mut parts: Vec<&str> = parts.collect();
    let Some(last) = parts.pop() else {
        // no wildcard at all
        return rest.is_empty();
    };

    for part in parts {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

async fn resolve_addr(config: &ServerConfig) -> Result<SocketAddr> {
    tokio::net::lookup_host((config.host.as_str(), config.port))
        .await?
        .next()
        .ok_or_else(|| {
            WeatherlyError::config(format!(
                "Cannot resolve listen address {}:{}",
                config.host, config.port
            ))
        })
}

/// Serve `app` until Ctrl+C or SIGTERM, then drain connections
pub async fn run(config: &ServerConfig, app: Router) -> Result<()> {
    let addr = resolve_addr(config).await?;
    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    match &config.tls {
        #[cfg(feature = "tls")]
        Some(tls) => {
            let rustls =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await?;
            info!("Web server running at https://{addr}");
            axum_server::bind_rustls(addr, rustls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        #[cfg(not(feature = "tls"))]
        Some(_) => {
            return Err(WeatherlyError::config(
                "server.tls is set but weatherly was built without the `tls` feature",
            ));
        }
        None => {
            info!("Web server running at http://{addr}");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutting down, waiting up to {SHUTDOWN_GRACE:?} for connections to close");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://weather-*.vercel.app", "https://weather-abc123.vercel.app", true)]
    #[case("https://weather-*.vercel.app", "https://weather-.vercel.app", true)]
    #[case("https://weather-*.vercel.app", "https://weather-x.vercel.app.evil.com", false)]
    #[case("https://weather-*.vercel.app", "http://weather-x.vercel.app", false)]
    #[case("https://*.example.com", "https://a.b.example.com", true)]
    #[case("https://app.example.com", "https://app.example.com", true)]
    #[case("https://app.example.com", "https://app.example.com.evil", false)]
    #[case("https://*-*.example.com", "https://a-b.example.com", true)]
    #[case("https://*-*.example.com", "https://ab.example.com", false)]
    fn test_wildcard_match(#[case] pattern: &str, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(wildcard_match(pattern, value), expected);
    }

    #[test]
    fn test_origin_allowed_exact_or_pattern() {
        let exact = vec!["http://localhost:3000".to_string()];
        let patterns = vec!["https://weather-app-*.vercel.app".to_string()];

        assert!(origin_allowed("http://localhost:3000", &exact, &patterns));
        assert!(origin_allowed("https://weather-app-pr42.vercel.app", &exact, &patterns));
        assert!(!origin_allowed("http://localhost:8080", &exact, &patterns));
    }

    #[tokio::test]
    async fn test_resolve_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8123,
            ..ServerConfig::default()
        };
        assert_eq!(resolve_addr(&config).await.unwrap().to_string(), "127.0.0.1:8123");
    }

    #[tokio::test]
    async fn test_resolve_addr_localhost() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 8124,
            ..ServerConfig::default()
        };
        let addr = resolve_addr(&config).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8124);
    }
}
