//! OpenTelemetry observability configuration and initialization
//!
//! The dispatcher reports everything through the `tracing` crate: a span per
//! dispatched request, debug events for rejected envelopes, warnings for
//! failed notifications. This module wires those spans and events to a
//! subscriber, and optionally exports them (and the dispatcher metrics) to an
//! OTLP collector.
//!
//! # Usage Pattern
//!
//! Initialize observability once at application startup, before building a
//! dispatcher. The OTLP exporters run on the Tokio runtime, so call it from
//! inside one when traces or metrics are enabled:
//!
//! ```rust,no_run
//! use jrd_core::ObservabilityConfig;
//!
//! let config = ObservabilityConfig::new("my-service")
//!     .with_endpoint("http://localhost:4317")
//!     .with_log_level("debug");
//!
//! jrd_core::init_observability(config).expect("Failed to init observability");
//!
//! // ... run your application ...
//!
//! jrd_core::shutdown_observability();
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint
//! - `RUST_LOG`: Log level filter (e.g., "info", "jrd_dispatch=debug")

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error type returned by observability initialization
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Observability configuration
///
/// Traces, metrics and local logs can be enabled or disabled independently.
///
/// # Defaults
///
/// - Service name: "jrd"
/// - Service version: Current crate version
/// - OTLP endpoint: From `OTEL_EXPORTER_OTLP_ENDPOINT` env var, or "http://localhost:4317"
/// - All pillars enabled
/// - Log level: From `RUST_LOG` env var, or "info"
///
/// # Examples
///
/// ```rust
/// use jrd_core::ObservabilityConfig;
///
/// let custom = ObservabilityConfig::new("rpc-gateway")
///     .with_endpoint("http://collector:4317")
///     .with_log_level("debug")
///     .with_version("1.2.3")
///     .with_metrics(false);
/// assert!(!custom.enable_metrics);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to all exported telemetry
    pub service_name: String,

    /// Service version attached to all exported telemetry
    pub service_version: String,

    /// OTLP (OpenTelemetry Protocol) gRPC endpoint
    pub otlp_endpoint: String,

    /// Export spans to the collector
    pub enable_traces: bool,

    /// Export metrics to the collector
    pub enable_metrics: bool,

    /// Write structured JSON logs to stdout
    pub enable_logs: bool,

    /// Log level filter, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "jrd".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: true,
            enable_metrics: true,
            enable_logs: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with a custom service name
    ///
    /// All other settings use defaults. Use builder methods to customize.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint (e.g., "http://collector:4317")
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the log level filter: "error", "warn", "info", "debug", "trace"
    /// or any `EnvFilter` directive
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable metrics export
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Enable or disable local structured logs
    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                    self.service_name.clone(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                    self.service_version.clone(),
                ),
            ])
            .build()
    }
}

/// Initialize observability with the given configuration
///
/// 1. **Tracer provider**: OTLP span export, if traces are enabled
/// 2. **Meter provider**: OTLP metric export every 30s, if metrics are enabled
/// 3. **Tracing subscriber**: `EnvFilter`, optional JSON log layer, optional
///    OpenTelemetry layer
///
/// A global subscriber can only be installed once per process; a second call
/// returns an error instead of panicking.
///
/// # Errors
///
/// - The OTLP exporters could not be built
/// - The log level is not a valid filter directive
/// - A global subscriber was already installed
pub fn init_observability(config: ObservabilityConfig) -> Result<(), InitError> {
    let tracer = if config.enable_traces {
        Some(init_tracer(&config)?)
    } else {
        None
    };

    if config.enable_metrics {
        init_metrics(&config)?;
    }

    init_tracing_subscriber(&config, tracer)?;

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        logs = config.enable_logs,
        "Observability initialized"
    );

    Ok(())
}

/// Initialize the tracer provider and return a tracer
///
/// Spans are batched and sent over OTLP/gRPC. The tracer is returned before
/// the provider is registered globally because the tracing subscriber needs it
/// to build the OpenTelemetry layer.
fn init_tracer(config: &ObservabilityConfig) -> Result<opentelemetry_sdk::trace::Tracer, InitError> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build();

    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider);

    Ok(tracer)
}

/// Initialize the meter provider used by `DispatchMetrics`
///
/// Metrics are aggregated and exported every 30 seconds.
fn init_metrics(config: &ObservabilityConfig) -> Result<(), InitError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(Duration::from_secs(30))
        .build();

    let provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build();

    global::set_meter_provider(provider);
    Ok(())
}

/// Install the global tracing subscriber
///
/// Layers, each optional except the filter:
/// - **OpenTelemetry layer** (traces enabled): converts spans to OTLP spans
/// - **EnvFilter**: `RUST_LOG`, falling back to `config.log_level`
/// - **fmt layer** (logs enabled): JSON lines with target, thread id and line
fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<opentelemetry_sdk::trace::Tracer>,
) -> Result<(), InitError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let fmt_layer = config.enable_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .json()
    });

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Mark the end of the observability lifecycle
///
/// OpenTelemetry SDK 0.30 providers flush and shut down when dropped, so this
/// only records the shutdown. Safe to call more than once.
pub fn shutdown_observability() {
    tracing::info!("Shutting down observability");
}
