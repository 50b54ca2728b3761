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

use serde::{Deserialize, Serialize};
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docmock API",
        description = "Mock server that answers with responses taken from imported API documentation",
        version = "0.1.0",
        license(name = "Apache-2.0")
    ),
    paths(
        super::handlers::health_handler,
        mock_handler_path,
        super::admin::list_documents,
        import_document_path,
        super::admin::get_document,
        super::admin::delete_document,
        super::admin::update_mock_response,
        super::admin::reset_mock_response,
        super::admin::get_active,
        activate_document_path,
        super::admin::activate_by_id,
        super::admin::deactivate
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MockNotFoundResponse,
            DocumentSummary,
            ActiveDocumentResponse,
            ActivationResponse,
            MockResponseUpdate
        )
    ),
    tags(
        (name = "System", description = "System endpoints"),
        (name = "Mock", description = "Responses served from the active document"),
        (name = "Admin", description = "Document management and activation")
    )
)]
pub struct ApiDoc;

// The mock namespace is a catch-all scope, so it is documented here rather
// than on the handler.
#[utoipa::path(
    get,
    path = "/api/mock/{path}",
    tag = "Mock",
    params(
        ("path" = String, Path, description = "Endpoint path as written in the active document")
    ),
    responses(
        (status = 200, description = "Stored mock response of the matching endpoint"),
        (status = 204, description = "OPTIONS preflight; the Allow header lists the methods"),
        (status = 404, description = "No active document, or no matching endpoint", body = MockNotFoundResponse)
    )
)]
#[allow(dead_code)]
pub fn mock_handler_path() {}

#[utoipa::path(
    post,
    path = "/admin/documents",
    tag = "Admin",
    request_body(
        content = String,
        content_type = "application/json",
        description = "Parser output: `{sourceUrl, title, endpoints: [{method, path, description, exampleResponses}]}`"
    ),
    responses(
        (status = 201, description = "Document imported, or replaced when the source URL was already known"),
        (status = 400, description = "Invalid source URL or malformed body", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub fn import_document_path() {}

#[utoipa::path(
    put,
    path = "/admin/active",
    tag = "Admin",
    request_body(
        content = String,
        content_type = "application/json",
        description = "A full document to activate, or `null` to deactivate"
    ),
    responses(
        (status = 200, description = "Activation result", body = ActivationResponse)
    )
)]
#[allow(dead_code)]
pub fn activate_document_path() {}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "docmock")]
    pub service: String,
    #[schema(example = "2026-01-01T00:00:00Z")]
    pub timestamp: String,
    /// Id of the active document, if any.
    #[schema(example = "https://docs.example.com/ping")]
    pub active_document: Option<String>,
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[schema(example = "document 'https://docs.example.com/ping' not found")]
    pub error: String,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockNotFoundResponse {
    #[schema(example = "Mock endpoint not found for GET /missing")]
    pub error: String,
    pub message: String,
    pub active_document: Option<String>,
    #[schema(example = "GET")]
    pub requested_method: String,
    #[schema(example = "/missing")]
    pub requested_path: String,
    pub available_endpoints_in_active_document: Option<Vec<String>>,
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    #[schema(example = "https://docs.example.com/ping")]
    pub id: String,
    #[schema(example = "Ping API")]
    pub title: String,
    pub source_url: Option<String>,
    pub endpoint_count: usize,
    pub active: bool,
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDocumentResponse {
    pub active_doc_id: Option<String>,
    pub title: Option<String>,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResponse {
    pub success: bool,
    #[schema(example = "Mock server now active for \"Ping API\".")]
    pub message: String,
    pub active_doc_id: Option<String>,
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockResponseUpdate {
    #[schema(example = "{\"ok\":false}")]
    pub mock_response: String,
}
