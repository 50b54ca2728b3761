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

use crate::catalog::MockResponse;
use crate::server::app::AppState;
use crate::server::openapi::HealthResponse;
use crate::telemetry::metrics::{record_latency, record_lookup, record_request};
use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use std::time::Instant;
use tracing::{debug, info};

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_handler(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: data.config.telemetry.service_name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        active_document: data.catalog.registry.active_id(),
    })
}

/// Serves every method under the mock prefix from the active document.
pub async fn mock_handler(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let prefix = data.config.mock.prefix.as_str();
    let method = req.method().as_str().to_string();
    let path = mock_path(req.path(), prefix);

    debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching mock request"
    );

    let response = data.catalog.dispatcher.handle(&method, &path);
    let status = response.status;
    let outcome = response.outcome;

    record_lookup(outcome, response.header(&data.config.mock.source_header));
    let http_response = to_http_response(response);

    let latency = start_time.elapsed();
    record_request(&method, prefix, status);
    record_latency(&method, prefix, latency);

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status,
        outcome = outcome,
        latency_ms = latency.as_secs_f64() * 1000.0,
        "Mock request completed"
    );

    http_response
}

/// The request path below `prefix`, percent-decoded. Undecodable input is
/// used as-is.
fn mock_path(request_path: &str, prefix: &str) -> String {
    let tail = request_path.strip_prefix(prefix).unwrap_or(request_path);
    urlencoding::decode(tail)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| tail.to_string())
}

fn to_http_response(response: MockResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    );

    for (name, value) in response.headers {
        builder.insert_header((name, value));
    }

    match response.body {
        Some(body) => builder.body(body),
        None => builder.finish(),
    }
}
