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

//! Management routes under `/admin`.
//!
//! Document ids are source URLs, so clients send them percent-encoded as a
//! single path segment.

use crate::catalog::{CatalogError, Document, EndpointDefinition, ImportRequest};
use crate::server::app::AppState;
use crate::server::openapi::{
    ActivationResponse, ActiveDocumentResponse, DocumentSummary, ErrorResponse, MockResponseUpdate,
};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::DocumentNotFound(_) | CatalogError::EndpointNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CatalogError::InvalidSourceUrl(_) | CatalogError::UnsupportedMethod(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/documents")
                    .route(web::get().to(list_documents))
                    .route(web::post().to(import_document)),
            )
            .service(
                web::resource("/documents/{id}")
                    .route(web::get().to(get_document))
                    .route(web::delete().to(delete_document)),
            )
            .service(
                web::resource("/documents/{id}/endpoints/{endpoint_id}/response")
                    .route(web::put().to(update_mock_response))
                    .route(web::delete().to(reset_mock_response)),
            )
            .service(
                web::resource("/active")
                    .route(web::get().to(get_active))
                    .route(web::put().to(activate_document))
                    .route(web::delete().to(deactivate)),
            )
            .service(web::resource("/active/{id}").route(web::put().to(activate_by_id))),
    );
}

// actix leaves `%2F` encoded in path segments; ids need the real slashes.
fn decode_id(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|id| id.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn endpoint_of(doc: Document, endpoint_id: &str) -> Result<EndpointDefinition, CatalogError> {
    let document = doc.id.clone();
    doc.endpoints
        .into_iter()
        .find(|ep| ep.id == endpoint_id)
        .ok_or_else(|| CatalogError::EndpointNotFound {
            document,
            endpoint: endpoint_id.to_string(),
        })
}

#[utoipa::path(
    get,
    path = "/admin/documents",
    tag = "Admin",
    responses(
        (status = 200, description = "All stored documents", body = [DocumentSummary])
    )
)]
pub async fn list_documents(data: web::Data<AppState>) -> HttpResponse {
    let active_id = data.catalog.registry.active_id();
    let summaries: Vec<DocumentSummary> = data
        .catalog
        .admin
        .store()
        .list()
        .into_iter()
        .map(|doc| DocumentSummary {
            active: active_id.as_deref() == Some(doc.id.as_str()),
            endpoint_count: doc.endpoints.len(),
            id: doc.id,
            title: doc.title,
            source_url: doc.source_url,
        })
        .collect();

    HttpResponse::Ok().json(summaries)
}

pub async fn import_document(
    data: web::Data<AppState>,
    request: web::Json<ImportRequest>,
) -> Result<HttpResponse, CatalogError> {
    let doc = data.catalog.admin.import(request.into_inner())?;
    Ok(HttpResponse::Created().json(doc))
}

#[utoipa::path(
    get,
    path = "/admin/documents/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Percent-encoded document id")),
    responses(
        (status = 200, description = "The stored document"),
        (status = 404, description = "Unknown document", body = ErrorResponse)
    )
)]
pub async fn get_document(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let id = decode_id(&path);
    let doc = data
        .catalog
        .admin
        .store()
        .get(&id)
        .ok_or(CatalogError::DocumentNotFound(id))?;
    Ok(HttpResponse::Ok().json(doc))
}

#[utoipa::path(
    delete,
    path = "/admin/documents/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Percent-encoded document id")),
    responses(
        (status = 204, description = "Document removed; deactivated first if it was active"),
        (status = 404, description = "Unknown document", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    data.catalog.admin.remove(&decode_id(&path))?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    put,
    path = "/admin/documents/{id}/endpoints/{endpoint_id}/response",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Percent-encoded document id"),
        ("endpoint_id" = String, Path, description = "Endpoint id")
    ),
    request_body = MockResponseUpdate,
    responses(
        (status = 200, description = "The updated endpoint"),
        (status = 404, description = "Unknown document or endpoint", body = ErrorResponse)
    )
)]
pub async fn update_mock_response(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    update: web::Json<MockResponseUpdate>,
) -> Result<HttpResponse, CatalogError> {
    let (id, endpoint_id) = path.into_inner();
    let id = decode_id(&id);
    let doc = data.catalog.admin.update_mock_response(
        &id,
        &endpoint_id,
        update.into_inner().mock_response,
    )?;
    Ok(HttpResponse::Ok().json(endpoint_of(doc, &endpoint_id)?))
}

#[utoipa::path(
    delete,
    path = "/admin/documents/{id}/endpoints/{endpoint_id}/response",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Percent-encoded document id"),
        ("endpoint_id" = String, Path, description = "Endpoint id")
    ),
    responses(
        (status = 200, description = "The endpoint with its mock response reset to the default"),
        (status = 404, description = "Unknown document or endpoint", body = ErrorResponse)
    )
)]
pub async fn reset_mock_response(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CatalogError> {
    let (id, endpoint_id) = path.into_inner();
    let doc = data
        .catalog
        .admin
        .reset_mock_response(&decode_id(&id), &endpoint_id)?;
    Ok(HttpResponse::Ok().json(endpoint_of(doc, &endpoint_id)?))
}

#[utoipa::path(
    get,
    path = "/admin/active",
    tag = "Admin",
    responses(
        (status = 200, description = "The active document, if any", body = ActiveDocumentResponse)
    )
)]
pub async fn get_active(data: web::Data<AppState>) -> HttpResponse {
    let active = data.catalog.admin.active();
    HttpResponse::Ok().json(ActiveDocumentResponse {
        active_doc_id: active.as_ref().map(|doc| doc.id.clone()),
        title: active.as_ref().map(|doc| doc.title.clone()),
    })
}

pub async fn activate_document(
    data: web::Data<AppState>,
    doc: web::Json<Option<Document>>,
) -> HttpResponse {
    let result = data.catalog.admin.activate_document(doc.into_inner());
    HttpResponse::Ok().json(result)
}

#[utoipa::path(
    put,
    path = "/admin/active/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Percent-encoded document id")),
    responses(
        (status = 200, description = "Activation succeeded", body = ActivationResponse),
        (status = 404, description = "Unknown document; the active document is unchanged", body = ActivationResponse)
    )
)]
pub async fn activate_by_id(data: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = decode_id(&path);
    let result = data.catalog.admin.activate_by_id(Some(&id));
    if result.success {
        HttpResponse::Ok().json(result)
    } else {
        HttpResponse::NotFound().json(result)
    }
}

#[utoipa::path(
    delete,
    path = "/admin/active",
    tag = "Admin",
    responses(
        (status = 200, description = "Mock server deactivated", body = ActivationResponse)
    )
)]
pub async fn deactivate(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.catalog.admin.activate_document(None))
}
