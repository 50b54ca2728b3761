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

use crate::catalog::Catalog;
use crate::config::Config;
use crate::server::admin;
use crate::server::handlers::{health_handler, mock_handler};
use crate::server::openapi::{ApiDoc, ErrorResponse};
use crate::telemetry::tracer::tracing_middleware;
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use anyhow::Context;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

impl AppState {
    /// Builds the catalog and loads the configured seed documents into it.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let catalog = Catalog::new(config.mock.source_header.clone());
        catalog
            .admin
            .seed(
                config.documents.clone(),
                config.mock.active_document.as_deref(),
            )
            .context("Failed to load seed documents")?;

        Ok(Self { config, catalog })
    }
}

/// Registers every route on an app. Shared by the server and the tests.
pub fn routes(state: web::Data<AppState>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    let openapi = ApiDoc::openapi();

    move |cfg: &mut web::ServiceConfig| {
        let json_config = web::JsonConfig::default()
            .limit(state.config.server.max_request_size)
            .error_handler(|err, _req| {
                let body = ErrorResponse {
                    error: err.to_string(),
                };
                InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
            });

        cfg.app_data(state.clone())
            .app_data(json_config)
            .service(web::resource("/health").route(web::get().to(health_handler)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            );

        if state.config.mock.admin_enabled {
            cfg.configure(admin::configure);
        }

        cfg.service(
            web::scope(&state.config.mock.prefix).default_service(web::to(mock_handler)),
        );
    }
}

pub async fn run_server(state: web::Data<AppState>) -> anyhow::Result<Server> {
    let server_config = state.config.server.clone();
    let addr = format!("{}:{}", server_config.host, server_config.port);

    info!("Starting server on {}", addr);
    info!("Server workers: {}", server_config.workers);
    info!("Max request size: {} bytes", server_config.max_request_size);
    info!(
        prefix = %state.config.mock.prefix,
        admin = state.config.mock.admin_enabled,
        "Mock namespace mounted"
    );

    let app_routes = routes(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(tracing_middleware())
            .configure(app_routes.clone())
    })
    .workers(server_config.workers)
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run();

    Ok(server)
}
