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

//! Turns the documentation parser's output into a [`Document`].
//!
//! The parser itself (page fetch plus language-model extraction) runs
//! outside this crate; what arrives here is its structured result.

use crate::catalog::error::CatalogError;
use crate::catalog::model::{
    new_endpoint_id, Document, EndpointDefinition, ExampleResponse, HttpMethod,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub source_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub endpoints: Vec<ParsedEndpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEndpoint {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example_responses: Vec<ExampleResponse>,
}

pub fn build_document(request: ImportRequest) -> Result<Document, CatalogError> {
    let source_url = request.source_url.trim().to_string();
    let url = parse_source_url(&source_url)?;

    let title = match request.title.trim() {
        "" => derive_title(&url),
        title => title.to_string(),
    };

    let endpoints: Vec<EndpointDefinition> = request
        .endpoints
        .into_iter()
        .map(|parsed| build_endpoint(&source_url, parsed))
        .collect();

    let doc = Document {
        id: source_url.clone(),
        title,
        source_url: Some(source_url),
        endpoints,
        imported_at: Utc::now(),
    };

    for signature in doc.duplicate_signatures() {
        warn!(
            document = %doc.id,
            endpoint = %signature,
            "Duplicate endpoint in import, only the first one will be served"
        );
    }

    info!(
        document = %doc.id,
        title = %doc.title,
        endpoints = doc.endpoints.len(),
        "Document imported"
    );

    Ok(doc)
}

fn parse_source_url(source_url: &str) -> Result<Url, CatalogError> {
    let url = Url::parse(source_url)
        .map_err(|_| CatalogError::InvalidSourceUrl(source_url.to_string()))?;

    let is_web = matches!(url.scheme(), "http" | "https") && url.host().is_some();
    if is_web {
        Ok(url)
    } else {
        Err(CatalogError::InvalidSourceUrl(source_url.to_string()))
    }
}

/// Title fallback: last path segment, decoded, with `+` and `-` as spaces.
pub fn derive_title(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("");

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    let title = decoded.replace(['+', '-'], " ");
    let title = title.trim();

    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

fn build_endpoint(source_url: &str, parsed: ParsedEndpoint) -> EndpointDefinition {
    let path = normalize_endpoint_path(&parsed.path);
    let default_response =
        select_default_response(source_url, parsed.method, &path, &parsed.example_responses);

    EndpointDefinition {
        id: new_endpoint_id(),
        method: parsed.method,
        path,
        description: parsed.description,
        mock_response: default_response.clone(),
        default_response,
        example_responses: parsed.example_responses,
    }
}

pub fn normalize_endpoint_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// First 2xx example, else the first example, else an empty body.
fn select_default_response(
    source_url: &str,
    method: HttpMethod,
    path: &str,
    examples: &[ExampleResponse],
) -> String {
    if let Some(success) = examples.iter().find(|r| r.is_success()) {
        return success.body.clone();
    }

    match examples.first() {
        Some(first) => {
            warn!(
                document = %source_url,
                method = %method,
                path = %path,
                status = first.status_code,
                "No 2xx example response, using the first example as default"
            );
            first.body.clone()
        }
        None => {
            warn!(
                document = %source_url,
                method = %method,
                path = %path,
                "No example responses, default response will be empty"
            );
            String::new()
        }
    }
}
