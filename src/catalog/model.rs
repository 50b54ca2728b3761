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

use crate::catalog::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Case-insensitive comparison against a raw request method.
    pub fn matches(&self, method: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(method)
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.matches(s.trim()))
            .ok_or_else(|| CatalogError::UnsupportedMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleResponse {
    pub status_code: u16,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExampleResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EndpointRepr")]
pub struct EndpointDefinition {
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub default_response: String,
    pub mock_response: String,
    pub example_responses: Vec<ExampleResponse>,
}

impl EndpointDefinition {
    pub fn new(method: HttpMethod, path: impl Into<String>, default_response: impl Into<String>) -> Self {
        let default_response = default_response.into();
        Self {
            id: new_endpoint_id(),
            method,
            path: path.into(),
            description: None,
            mock_response: default_response.clone(),
            default_response,
            example_responses: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method.matches(method) && same_path(&self.path, path)
    }

    /// `"METHOD path"`, as listed in not-found hints.
    pub fn signature(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

// Wire shape accepted on input: `id` and `mockResponse` may be omitted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointRepr {
    #[serde(default = "new_endpoint_id")]
    id: String,
    method: HttpMethod,
    path: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default_response: String,
    #[serde(default)]
    mock_response: Option<String>,
    #[serde(default)]
    example_responses: Vec<ExampleResponse>,
}

impl From<EndpointRepr> for EndpointDefinition {
    fn from(repr: EndpointRepr) -> Self {
        let mock_response = repr
            .mock_response
            .unwrap_or_else(|| repr.default_response.clone());
        Self {
            id: repr.id,
            method: repr.method,
            path: repr.path,
            description: repr.description,
            default_response: repr.default_response,
            mock_response,
            example_responses: repr.example_responses,
        }
    }
}

// Full Unicode case folding, not just ASCII: decoded request paths may carry
// any character.
fn same_path(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

pub fn new_endpoint_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointDefinition>,
    #[serde(default = "Utc::now")]
    pub imported_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source_url: None,
            endpoints: Vec::new(),
            imported_at: Utc::now(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointDefinition) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// First endpoint, in document order, whose method and path both match
    /// ignoring case.
    pub fn find_endpoint(&self, method: &str, path: &str) -> Option<&EndpointDefinition> {
        self.endpoints.iter().find(|ep| ep.matches(method, path))
    }

    pub fn endpoint_mut(&mut self, endpoint_id: &str) -> Option<&mut EndpointDefinition> {
        self.endpoints.iter_mut().find(|ep| ep.id == endpoint_id)
    }

    /// Distinct methods registered for `path`, in sorted order.
    pub fn methods_for_path(&self, path: &str) -> BTreeSet<&'static str> {
        self.endpoints
            .iter()
            .filter(|ep| same_path(&ep.path, path))
            .map(|ep| ep.method.as_str())
            .collect()
    }

    pub fn endpoint_signatures(&self) -> Vec<String> {
        self.endpoints.iter().map(EndpointDefinition::signature).collect()
    }

    /// `(method, path)` pairs that appear more than once. Lookup serves the
    /// first of each.
    pub fn duplicate_signatures(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for ep in &self.endpoints {
            let key = (ep.method, ep.path.to_lowercase());
            if !seen.insert(key) {
                duplicates.push(ep.signature());
            }
        }
        duplicates
    }
}
