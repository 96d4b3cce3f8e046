//! Logging and tracing settings

use std::time::Duration;

use clap::{Args, ValueEnum};

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One line per event for terminals.
    Compact,

    /// One JSON object per event, including the active span chain.
    Json,
}

/// Log output.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` does not parse as a directive
    #[arg(short, long = "log-level", env = "RUST_LOG", default_value = "info")]
    pub level: String,

    /// Log format (compact, json)
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub format: LogFormat,
}

/// Trace export and request timing.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export spans over OTLP
    #[arg(long = "otel-enabled", env = "OTEL_ENABLED", default_value_t = false)]
    pub export_traces: bool,

    /// Continue traces started by callers (`traceparent`). Only honoured when
    /// export is on.
    #[arg(
        long = "otel-parent-propagation-enabled",
        env = "OTEL_PARENT_PROPAGATION_ENABLED",
        default_value_t = false
    )]
    pub continue_remote_traces: bool,

    /// OTLP gRPC collector
    #[arg(
        long = "otel-exporter-otlp-endpoint",
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub collector_endpoint: String,

    /// Seconds before a span batch export is abandoned
    #[arg(long = "otel-export-timeout", env = "OTEL_EXPORT_TIMEOUT", default_value_t = 3)]
    pub export_timeout_secs: u64,

    /// `service.name` resource attribute
    #[arg(long = "otel-service-name", env = "OTEL_SERVICE_NAME", default_value = "driftworks-json")]
    pub service_name: String,

    /// `deployment.environment.name` resource attribute
    #[arg(long = "environment", env = "DRIFTWORKS_ENV", default_value = "development")]
    pub environment: String,

    /// Share of root traces kept, clamped to 0..=1
    #[arg(long = "otel-trace-sample-ratio", env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub sample_ratio: f64,

    /// Requests slower than this are logged as `request.slow`
    #[arg(
        long = "slow-request-threshold-ms",
        env = "SLOW_REQUEST_THRESHOLD_MS",
        default_value_t = 1_000
    )]
    pub slow_request_ms: u64,
}

impl ObservabilityConfig {
    /// Sampling ratio forced into the range the sampler accepts.
    #[must_use]
    pub fn clamped_sample_ratio(&self) -> f64 {
        self.sample_ratio.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    /// Whether incoming trace headers become the parent of request spans.
    #[must_use]
    pub fn propagates_parent(&self) -> bool {
        self.export_traces && self.continue_remote_traces
    }
}
