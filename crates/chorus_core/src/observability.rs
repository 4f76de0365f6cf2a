//! OpenTelemetry metrics initialization.

#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global};
#[cfg(feature = "metrics")]
use opentelemetry_otlp::{MetricExporter as OtlpExporter, WithExportConfig};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
};
#[cfg(feature = "metrics")]
use opentelemetry_stdout::MetricExporter as StdoutExporter;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;
#[cfg(feature = "metrics")]
use std::time::Duration;
use tracing::{debug, info, instrument};
#[cfg(feature = "metrics")]
use tracing::warn;

/// Provider registered globally, kept so shutdown can flush it.
#[cfg(feature = "metrics")]
static METER_PROVIDER: OnceLock<SdkMeterProvider> = OnceLock::new();

/// Initialize OpenTelemetry metrics with OTLP or stdout export.
///
/// Reads `OTEL_EXPORTER`:
/// - "otlp" -> OTLP over HTTP to `OTEL_EXPORTER_OTLP_ENDPOINT` (default: http://localhost:4318)
/// - "stdout" or unset -> stdout exporter
///
/// When the `metrics` feature is disabled, this function returns `Ok(())` immediately.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or metrics were already
/// initialized in this process.
#[instrument(skip_all, fields(service_name))]
pub fn init_observability(
    service_name: &'static str,
    export_interval_secs: u64,
) -> Result<(), String> {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = export_interval_secs;
        info!(
            service_name = service_name,
            "Metrics feature disabled - skipping metrics initialization"
        );
        Ok(())
    }

    #[cfg(feature = "metrics")]
    {
        info!(
            service_name = service_name,
            export_interval_secs = export_interval_secs,
            "Initializing OpenTelemetry metrics"
        );

        let resource = Resource::builder_empty()
            .with_attributes([KeyValue::new("service.name", service_name)])
            .build();
        let interval = Duration::from_secs(export_interval_secs);

        let exporter_type = std::env::var("OTEL_EXPORTER").unwrap_or_else(|_| "stdout".to_string());
        info!(exporter_type = %exporter_type, "Selecting metrics exporter");

        let meter_provider = match exporter_type.as_str() {
            "otlp" => {
                let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4318".to_string());
                info!(endpoint = %endpoint, "Using OTLP metrics exporter");

                let exporter = OtlpExporter::builder()
                    .with_http()
                    .with_endpoint(&endpoint)
                    .with_timeout(Duration::from_secs(10))
                    .build()
                    .map_err(|e| {
                        let msg = format!("Failed to create OTLP exporter: {}", e);
                        warn!(%msg, "OTLP exporter creation failed");
                        msg
                    })?;

                SdkMeterProvider::builder()
                    .with_resource(resource)
                    .with_reader(PeriodicReader::builder(exporter).with_interval(interval).build())
                    .build()
            }
            _ => {
                info!("Using stdout metrics exporter");
                let exporter = StdoutExporter::default();

                SdkMeterProvider::builder()
                    .with_resource(resource)
                    .with_reader(PeriodicReader::builder(exporter).with_interval(interval).build())
                    .build()
            }
        };

        if METER_PROVIDER.set(meter_provider.clone()).is_err() {
            return Err("Metrics already initialized".to_string());
        }
        global::set_meter_provider(meter_provider);
        debug!("Meter provider registered globally");
        Ok(())
    }
}

/// Flush pending metrics and shut the meter provider down.
///
/// A no-op when metrics were never initialized or the `metrics` feature is
/// disabled.
///
/// # Errors
///
/// Returns an error if the provider fails to flush or was already shut down.
#[instrument]
pub fn shutdown_observability() -> Result<(), String> {
    #[cfg(not(feature = "metrics"))]
    {
        debug!("Metrics feature disabled - nothing to shut down");
        Ok(())
    }

    #[cfg(feature = "metrics")]
    {
        let Some(provider) = METER_PROVIDER.get() else {
            debug!("Metrics never initialized - nothing to shut down");
            return Ok(());
        };
        info!("Shutting down OpenTelemetry metrics provider");
        provider
            .shutdown()
            .map_err(|e| format!("Failed to shut down meter provider: {}", e))?;
        debug!("Metrics shutdown complete");
        Ok(())
    }
}
