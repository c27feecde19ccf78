use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing: environment-based filtering, structured JSON in
/// production, pretty console output everywhere else.
pub fn init_observability(service_name: &str, service_version: &str, log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let is_production = std::env::var("ENVIRONMENT")
        .map(|env| env == "production")
        .unwrap_or(false);

    let result = if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    // A second init (tests, embedded use) is not an error worth dying for.
    if result.is_ok() {
        tracing::info!(
            service.name = service_name,
            service.version = service_version,
            "Observability initialized"
        );
    }
}
