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

use thiserror::Error;

/// Failures of admin-side operations on stored documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("document '{0}' not found")]
    DocumentNotFound(String),

    #[error("endpoint '{endpoint}' not found in document '{document}'")]
    EndpointNotFound { document: String, endpoint: String },

    #[error("invalid source URL '{0}': must be an http:// or https:// URL")]
    InvalidSourceUrl(String),

    #[error("unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),
}

/// Why a mock request could not be served. Both cases end up as a 404.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No mock server is currently active.")]
    NoActiveDocument,

    #[error("Mock endpoint not found for {method} {path}")]
    EndpointNotFound {
        method: String,
        path: String,
        document: String,
        available: Vec<String>,
    },
}

impl LookupError {
    pub fn outcome(&self) -> &'static str {
        match self {
            LookupError::NoActiveDocument => "inactive",
            LookupError::EndpointNotFound { .. } => "miss",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_messages() {
        let err = CatalogError::EndpointNotFound {
            document: "d1".to_string(),
            endpoint: "e9".to_string(),
        };
        assert_eq!(err.to_string(), "endpoint 'e9' not found in document 'd1'");
        assert_eq!(
            CatalogError::DocumentNotFound("d2".to_string()).to_string(),
            "document 'd2' not found"
        );
    }

    #[test]
    fn test_lookup_error_outcome() {
        assert_eq!(LookupError::NoActiveDocument.outcome(), "inactive");
        let miss = LookupError::EndpointNotFound {
            method: "GET".to_string(),
            path: "/x".to_string(),
            document: "T".to_string(),
            available: vec![],
        };
        assert_eq!(miss.outcome(), "miss");
        assert_eq!(miss.to_string(), "Mock endpoint not found for GET /x");
    }
}
