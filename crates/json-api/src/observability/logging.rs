//! Tracing subscriber: formatter, filter and optional OTLP bridge.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Dependencies that are chatty at `info` and below.
const QUIETED: [&str; 6] = ["h2", "hyper", "tower", "tonic", "opentelemetry", "sqlx"];

fn default_directives(level: &str) -> String {
    QUIETED
        .iter()
        .fold(level.to_owned(), |directives, target| {
            format!("{directives},{target}=warn")
        })
}

fn formatter(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    }
}

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.logging.level)));

    let otel = tracer_provider.map(|provider| {
        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer(config.observability.service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(formatter(config.logging.format))
        .with(otel)
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_are_held_at_warn() {
        let directives = default_directives("debug");

        assert!(directives.starts_with("debug,"), "{directives}");
        assert!(directives.contains("sqlx=warn"), "{directives}");
        assert!(directives.contains("hyper=warn"), "{directives}");
    }

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }
}
