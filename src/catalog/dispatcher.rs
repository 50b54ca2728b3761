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

use crate::catalog::content::{MockBody, APPLICATION_JSON};
use crate::catalog::error::LookupError;
use crate::catalog::model::{Document, EndpointDefinition};
use crate::catalog::registry::ActiveRegistry;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_ALLOW: &str = "GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS";

#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    /// `hit`, `miss`, `inactive` or `preflight`, for logs and metrics.
    pub outcome: &'static str,
}

impl MockResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotFoundBody<'a> {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_document: Option<&'a str>,
    requested_method: &'a str,
    requested_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_endpoints_in_active_document: Option<&'a [String]>,
}

/// Resolves mock requests against whatever document is active at the time
/// of the call.
#[derive(Clone)]
pub struct MockDispatcher {
    registry: Arc<ActiveRegistry>,
    source_header: String,
}

impl MockDispatcher {
    pub fn new(registry: Arc<ActiveRegistry>, source_header: impl Into<String>) -> Self {
        Self {
            registry,
            source_header: source_header.into(),
        }
    }

    pub fn handle(&self, method: &str, path: &str) -> MockResponse {
        let method = method.trim().to_ascii_uppercase();
        let path = normalize_path(path);
        let active = self.registry.get_active();

        if method == "OPTIONS" {
            if let Some(response) = self.preflight(active.as_deref(), &path) {
                return response;
            }
        }

        match self.lookup(active, &method, &path) {
            Ok((doc, endpoint)) => self.serve(&doc, endpoint, &method),
            Err(err) => self.not_found(&err, &method, &path),
        }
    }

    fn lookup(
        &self,
        active: Option<Arc<Document>>,
        method: &str,
        path: &str,
    ) -> Result<(Arc<Document>, EndpointDefinition), LookupError> {
        let doc = active.ok_or(LookupError::NoActiveDocument)?;

        match doc.find_endpoint(method, path) {
            Some(endpoint) => {
                let endpoint = endpoint.clone();
                Ok((doc, endpoint))
            }
            None => Err(LookupError::EndpointNotFound {
                method: method.to_string(),
                path: path.to_string(),
                document: doc.title.clone(),
                available: doc.endpoint_signatures(),
            }),
        }
    }

    fn serve(&self, doc: &Document, endpoint: EndpointDefinition, method: &str) -> MockResponse {
        let body = MockBody::classify(&endpoint.mock_response);
        let content_type = body.content_type();

        debug!(
            endpoint_id = %endpoint.id,
            signature = %endpoint.signature(),
            content_type = content_type,
            "Serving mock response"
        );

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), content_type.to_string());
        headers.insert(self.source_header.clone(), encode_title(&doc.title));

        let body = if method == "HEAD" {
            None
        } else {
            Some(body.into_body())
        };

        MockResponse {
            status: 200,
            headers,
            body,
            outcome: "hit",
        }
    }

    /// `None` means an explicit OPTIONS endpoint exists and normal matching
    /// applies.
    fn preflight(&self, active: Option<&Document>, path: &str) -> Option<MockResponse> {
        let mut headers = HashMap::new();

        let allow = match active {
            Some(doc) => {
                if doc.find_endpoint("OPTIONS", path).is_some() {
                    return None;
                }
                headers.insert(self.source_header.clone(), encode_title(&doc.title));

                let mut methods = doc.methods_for_path(path);
                if methods.is_empty() {
                    DEFAULT_ALLOW.to_string()
                } else {
                    methods.insert("OPTIONS");
                    methods.into_iter().collect::<Vec<_>>().join(", ")
                }
            }
            None => DEFAULT_ALLOW.to_string(),
        };

        headers.insert("Allow".to_string(), allow);

        Some(MockResponse {
            status: 204,
            headers,
            body: None,
            outcome: "preflight",
        })
    }

    fn not_found(&self, err: &LookupError, method: &str, path: &str) -> MockResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), APPLICATION_JSON.to_string());

        let body = match err {
            LookupError::NoActiveDocument => NotFoundBody {
                error: err.to_string(),
                message: "Activate a document through the admin API to enable its mock endpoints."
                    .to_string(),
                active_document: None,
                requested_method: method,
                requested_path: path,
                available_endpoints_in_active_document: None,
            },
            LookupError::EndpointNotFound {
                document,
                available,
                ..
            } => {
                headers.insert(self.source_header.clone(), encode_title(document));
                NotFoundBody {
                    error: err.to_string(),
                    message: format!(
                        "The active document \"{}\" does not have a mock defined for this method and path.",
                        document
                    ),
                    active_document: Some(document.as_str()),
                    requested_method: method,
                    requested_path: path,
                    available_endpoints_in_active_document: Some(available.as_slice()),
                }
            }
        };

        let body = match serde_json::to_string(&body) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize not-found body");
                format!("{{\"error\":{:?}}}", err.to_string())
            }
        };

        MockResponse {
            status: 404,
            headers,
            body: Some(body),
            outcome: err.outcome(),
        }
    }
}

/// The empty path is the root; a missing leading slash is added.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn encode_title(title: &str) -> String {
    urlencoding::encode(title).into_owned()
}
