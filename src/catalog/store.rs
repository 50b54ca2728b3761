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
use crate::catalog::model::{Document, EndpointDefinition};
use dashmap::DashMap;
use std::sync::Arc;

/// Every imported document, keyed by document id. Process memory only.
#[derive(Clone, Default)]
pub struct DocumentStore {
    documents: Arc<DashMap<String, Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `doc`, replacing any document with the same id wholesale.
    pub fn upsert(&self, doc: Document) -> Option<Document> {
        self.documents.insert(doc.id.clone(), doc)
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.get(id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: &str) -> Option<Document> {
        self.documents.remove(id).map(|(_, doc)| doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Oldest import first.
    pub fn list(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| {
            a.imported_at
                .cmp(&b.imported_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        docs
    }

    pub fn update_mock_response(
        &self,
        doc_id: &str,
        endpoint_id: &str,
        body: String,
    ) -> Result<Document, CatalogError> {
        self.edit_endpoint(doc_id, endpoint_id, |ep| ep.mock_response = body)
    }

    pub fn reset_mock_response(&self, doc_id: &str, endpoint_id: &str) -> Result<Document, CatalogError> {
        self.edit_endpoint(doc_id, endpoint_id, |ep| {
            ep.mock_response = ep.default_response.clone()
        })
    }

    fn edit_endpoint<F>(&self, doc_id: &str, endpoint_id: &str, edit: F) -> Result<Document, CatalogError>
    where
        F: FnOnce(&mut EndpointDefinition),
    {
        let mut entry = self
            .documents
            .get_mut(doc_id)
            .ok_or_else(|| CatalogError::DocumentNotFound(doc_id.to_string()))?;

        let endpoint = entry
            .endpoint_mut(endpoint_id)
            .ok_or_else(|| CatalogError::EndpointNotFound {
                document: doc_id.to_string(),
                endpoint: endpoint_id.to_string(),
            })?;
        edit(endpoint);

        Ok(entry.value().clone())
    }
}
