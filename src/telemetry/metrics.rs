/*
 * Copyright 2026 Docmock Team
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::config::TelemetryConfig;
use tracing::info;

#[cfg(feature = "otel")]
use crate::telemetry::attributes;
#[cfg(feature = "otel")]
use crate::telemetry::tracer::{service_resource, signal_endpoint, ExportProtocol};
#[cfg(feature = "otel")]
use opentelemetry::metrics::{Counter, Histogram};
#[cfg(feature = "otel")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otel")]
use std::sync::OnceLock;
#[cfg(feature = "otel")]
use tracing::{error, warn};

#[cfg(feature = "otel")]
static METER_PROVIDER: OnceLock<opentelemetry_sdk::metrics::SdkMeterProvider> = OnceLock::new();

#[cfg(feature = "otel")]
struct Instruments {
    requests: Counter<u64>,
    latency: Histogram<f64>,
    lookups: Counter<u64>,
}

// Bound to whatever meter provider is global on first use, so requests
// must not be recorded before `init_metrics` runs.
#[cfg(feature = "otel")]
static INSTRUMENTS: OnceLock<Instruments> = OnceLock::new();

#[cfg(feature = "otel")]
fn instruments() -> &'static Instruments {
    INSTRUMENTS.get_or_init(|| {
        let meter = opentelemetry::global::meter("docmock");
        Instruments {
            requests: meter
                .u64_counter("http_server_request_count_total")
                .with_description("Total number of HTTP requests")
                .build(),
            latency: meter
                .f64_histogram("http_server_request_duration_seconds")
                .with_description("HTTP request duration")
                .with_unit("s")
                .build(),
            lookups: meter
                .u64_counter("mock_lookup_count_total")
                .with_description("Mock lookups by outcome")
                .build(),
        }
    })
}

#[cfg(feature = "otel")]
pub async fn init_metrics(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enabled {
        info!("Metrics export is disabled");
        return Ok(());
    }

    let timeout = std::time::Duration::from_secs(config.timeout_seconds);
    let exporter = match ExportProtocol::from_config(config) {
        ExportProtocol::Grpc => opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(&config.endpoint)
            .with_timeout(timeout)
            .build(),
        ExportProtocol::Http => opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "metrics"))
            .with_timeout(timeout)
            .build(),
    }
    .map_err(|e| {
        error!("Failed to build OpenTelemetry metric exporter: {}", e);
        anyhow::anyhow!("OpenTelemetry metric exporter build failed: {}", e)
    })?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(std::time::Duration::from_secs(10))
        .build();

    let meter_provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(service_resource(config))
        .build();

    opentelemetry::global::set_meter_provider(meter_provider.clone());
    let _ = METER_PROVIDER.set(meter_provider);

    info!("OpenTelemetry metrics initialized with a 10s export interval");
    Ok(())
}

#[cfg(not(feature = "otel"))]
pub async fn init_metrics(config: &TelemetryConfig) -> anyhow::Result<()> {
    if config.enabled {
        info!("Metrics export unavailable, the otel feature is not compiled in");
    }
    Ok(())
}

pub fn shutdown_metrics() {
    #[cfg(feature = "otel")]
    if let Some(provider) = METER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            warn!("Failed to shut down meter provider: {}", e);
        }
    }
}

/// Counts a finished request. `route` is the route template, not the raw
/// path, to keep cardinality bounded.
#[cfg(feature = "otel")]
pub fn record_request(method: &str, route: &str, status: u16) {
    let attributes = [
        attributes::kv::http_method(method),
        attributes::kv::http_route(route),
        attributes::kv::http_response_status_code(status),
    ];

    if crate::telemetry::is_debug_enabled() {
        tracing::debug!(?attributes, "[TELEMETRY DEBUG] Recording request counter");
    }

    instruments().requests.add(1, &attributes);
}

#[cfg(not(feature = "otel"))]
pub fn record_request(method: &str, route: &str, status: u16) {
    tracing::debug!(method, route, status, "Request recorded");
}

#[cfg(feature = "otel")]
pub fn record_latency(method: &str, route: &str, duration: std::time::Duration) {
    let attributes = [
        attributes::kv::http_method(method),
        attributes::kv::http_route(route),
    ];
    instruments()
        .latency
        .record(duration.as_secs_f64(), &attributes);
}

#[cfg(not(feature = "otel"))]
pub fn record_latency(method: &str, route: &str, duration: std::time::Duration) {
    tracing::debug!(
        method,
        route,
        duration_ms = duration.as_millis() as u64,
        "Request latency"
    );
}

/// Counts a mock lookup by outcome (`hit`, `miss`, `inactive`, `preflight`).
#[cfg(feature = "otel")]
pub fn record_lookup(outcome: &str, document: Option<&str>) {
    let mut attributes = vec![attributes::kv::mock_outcome(outcome)];
    if let Some(document) = document {
        attributes.push(attributes::kv::mock_document(document));
    }
    instruments().lookups.add(1, &attributes);
}

#[cfg(not(feature = "otel"))]
pub fn record_lookup(outcome: &str, document: Option<&str>) {
    tracing::debug!(outcome, document, "Mock lookup");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_init_metrics_disabled() {
        let config = TelemetryConfig::default();
        assert!(init_metrics(&config).await.is_ok());
    }

    #[test]
    fn test_recording_without_provider() {
        record_request("GET", "/api/mock", 200);
        record_request("POST", "/api/mock", 404);
        record_latency("GET", "/api/mock", Duration::from_millis(3));
        record_lookup("hit", Some("Ping API"));
        record_lookup("inactive", None);
        shutdown_metrics();
    }
}
