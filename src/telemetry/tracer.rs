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
use crate::telemetry::attributes;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use anyhow::Context;
use futures::future::LocalBoxFuture;
use std::future::ready;
use std::rc::Rc;
use std::task::{Context as TaskContext, Poll};
use tracing::{info, Instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[cfg(feature = "otel")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otel")]
use std::sync::OnceLock;
#[cfg(feature = "otel")]
use tracing::{error, warn};

#[cfg(feature = "otel")]
struct OtelProviders {
    tracer: opentelemetry_sdk::trace::SdkTracerProvider,
    logger: opentelemetry_sdk::logs::SdkLoggerProvider,
}

#[cfg(feature = "otel")]
static PROVIDERS: OnceLock<OtelProviders> = OnceLock::new();

/// Adapts actix-web's `HeaderMap` to `opentelemetry::propagation::Extractor`
/// so `traceparent`/`tracestate` can be read from incoming requests.
#[cfg(feature = "otel")]
struct ActixHeaderExtractor<'a>(&'a actix_web::http::header::HeaderMap);

#[cfg(feature = "otel")]
impl opentelemetry::propagation::Extractor for ActixHeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

#[cfg(feature = "otel")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportProtocol {
    Grpc,
    Http,
}

#[cfg(feature = "otel")]
impl ExportProtocol {
    pub(crate) fn from_config(config: &TelemetryConfig) -> Self {
        match config.protocol.to_lowercase().as_str() {
            "http" => ExportProtocol::Http,
            "grpc" => ExportProtocol::Grpc,
            other => {
                warn!("Unknown protocol '{}', defaulting to gRPC", other);
                ExportProtocol::Grpc
            }
        }
    }
}

/// OTLP/HTTP wants one path per signal; gRPC uses the bare endpoint.
#[cfg(feature = "otel")]
pub(crate) fn signal_endpoint(endpoint: &str, signal: &str) -> String {
    let suffix = format!("v1/{}", signal);
    if endpoint.contains(&suffix) {
        endpoint.to_string()
    } else if endpoint.ends_with('/') {
        format!("{}{}", endpoint, suffix)
    } else {
        format!("{}/{}", endpoint, suffix)
    }
}

#[cfg(feature = "otel")]
pub(crate) fn service_resource(config: &TelemetryConfig) -> opentelemetry_sdk::Resource {
    use opentelemetry::KeyValue;

    opentelemetry_sdk::Resource::builder()
        .with_attributes(vec![
            KeyValue::new("service.name", config.service_name.clone()),
            KeyValue::new("service.version", config.service_version.clone()),
        ])
        .build()
}

fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn init_local_logging(config: &TelemetryConfig) -> anyhow::Result<()> {
    let subscriber = Registry::default().with(env_filter(config));

    let installed = if config.log_format == "json" {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.context("Failed to install the local tracing subscriber")
}

#[cfg(feature = "otel")]
pub async fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    use opentelemetry::trace::TracerProvider as _;

    if tracing::dispatcher::has_been_set() {
        info!("A tracing subscriber is already set, skipping initialization");
        return Ok(());
    }

    if !config.enabled {
        init_local_logging(config)?;
        info!("Trace export is disabled, logging locally");
        return Ok(());
    }

    if crate::telemetry::is_debug_enabled() {
        eprintln!(
            "[TELEMETRY DEBUG] endpoint={} protocol={} sampling_rate={}",
            config.endpoint, config.protocol, config.sampling_rate
        );
    }

    let protocol = ExportProtocol::from_config(config);
    let timeout = std::time::Duration::from_secs(config.timeout_seconds);

    let span_exporter = match protocol {
        ExportProtocol::Grpc => opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&config.endpoint)
            .with_timeout(timeout)
            .build(),
        ExportProtocol::Http => opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "traces"))
            .with_timeout(timeout)
            .build(),
    }
    .map_err(|e| {
        error!("Failed to build OpenTelemetry span exporter: {}", e);
        anyhow::anyhow!("OpenTelemetry span exporter build failed: {}", e)
    })?;

    let log_exporter = match protocol {
        ExportProtocol::Grpc => opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_endpoint(&config.endpoint)
            .with_timeout(timeout)
            .build(),
        ExportProtocol::Http => opentelemetry_otlp::LogExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "logs"))
            .with_timeout(timeout)
            .build(),
    }
    .map_err(|e| {
        error!("Failed to build OpenTelemetry log exporter: {}", e);
        anyhow::anyhow!("OpenTelemetry log exporter build failed: {}", e)
    })?;

    let resource = service_resource(config);

    let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .with_sampler(opentelemetry_sdk::trace::Sampler::ParentBased(Box::new(
            opentelemetry_sdk::trace::Sampler::TraceIdRatioBased(config.sampling_rate),
        )))
        .build();

    let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(tracer_provider.clone());
    opentelemetry::global::set_text_map_propagator(
        opentelemetry_sdk::propagation::TraceContextPropagator::new(),
    );

    let tracer = tracer_provider.tracer("docmock");
    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let otel_log_layer =
        opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge::new(&logger_provider);

    let subscriber = Registry::default()
        .with(env_filter(config))
        .with(telemetry_layer)
        .with(otel_log_layer);

    let installed = if config.log_format == "json" {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.context("Failed to install the OpenTelemetry tracing subscriber")?;

    let _ = PROVIDERS.set(OtelProviders {
        tracer: tracer_provider,
        logger: logger_provider,
    });

    info!(
        endpoint = %config.endpoint,
        protocol = ?protocol,
        "OpenTelemetry tracing initialized"
    );
    Ok(())
}

#[cfg(not(feature = "otel"))]
pub async fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    if tracing::dispatcher::has_been_set() {
        info!("A tracing subscriber is already set, skipping initialization");
        return Ok(());
    }

    init_local_logging(config)?;

    if config.enabled {
        tracing::warn!("Telemetry export requested but the otel feature is not compiled in");
    }
    Ok(())
}

/// Flushes pending spans and logs. A no-op when export was never set up.
pub fn shutdown_tracing() {
    #[cfg(feature = "otel")]
    if let Some(providers) = PROVIDERS.get() {
        if let Err(e) = providers.tracer.shutdown() {
            warn!("Failed to shut down tracer provider: {}", e);
        }
        if let Err(e) = providers.logger.shutdown() {
            warn!("Failed to shut down logger provider: {}", e);
        }
    }
}

pub fn tracing_middleware() -> TracingMiddleware {
    TracingMiddleware
}

pub struct TracingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TracingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = TracingMiddlewareService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TracingMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct TracingMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TracingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let span = tracing::info_span!(
            "http.request",
            http.method = %req.method(),
            http.target = %req.path(),
            http.response.status_code = tracing::field::Empty,
            otel.kind = "server",
        );

        #[cfg(feature = "otel")]
        {
            use opentelemetry::propagation::TextMapPropagator;
            use tracing_opentelemetry::OpenTelemetrySpanExt;

            let propagator = opentelemetry_sdk::propagation::TraceContextPropagator::new();
            let parent_cx = propagator.extract(&ActixHeaderExtractor(req.headers()));
            let _ = span.set_parent(parent_cx);
        }

        Box::pin(async move {
            let response = service.call(req).instrument(span.clone()).await?;
            let status = response.status().as_u16();

            span.record(attributes::http::RESPONSE_STATUS_CODE, status);
            span.in_scope(|| log_status(status));

            Ok(response)
        })
    }
}

fn log_status(status: u16) {
    match status {
        200..=299 => tracing::info!(status, "Request successful"),
        300..=399 => tracing::info!(status, "Redirection"),
        400..=499 => tracing::warn!(status, "Client error"),
        _ if status >= 500 => tracing::error!(status, "Server error"),
        _ => tracing::info!(status, "Informational response"),
    }
}
