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
use crate::catalog::importer::{build_document, ImportRequest};
use crate::catalog::model::Document;
use crate::catalog::registry::ActiveRegistry;
use crate::catalog::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResult {
    pub success: bool,
    pub message: String,
    pub active_doc_id: Option<String>,
}

/// Operations the management surface performs on documents and on the
/// active slot.
#[derive(Clone)]
pub struct MockAdmin {
    store: DocumentStore,
    registry: Arc<ActiveRegistry>,
}

impl MockAdmin {
    pub fn new(store: DocumentStore, registry: Arc<ActiveRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn active(&self) -> Option<Arc<Document>> {
        self.registry.get_active()
    }

    pub fn activate_document(&self, doc: Option<Document>) -> ActivationResult {
        match doc {
            Some(doc) => {
                let id = doc.id.clone();
                let message = format!("Mock server now active for \"{}\".", doc.title);
                info!(document = %id, title = %doc.title, "Activating document");
                self.registry.set_active(Some(doc));
                ActivationResult {
                    success: true,
                    message,
                    active_doc_id: Some(id),
                }
            }
            None => {
                info!("Deactivating mock server");
                self.registry.set_active(None);
                ActivationResult {
                    success: true,
                    message: "Mock server is now deactivated.".to_string(),
                    active_doc_id: None,
                }
            }
        }
    }

    /// Activates a stored document. An unknown id leaves the active slot as
    /// it was and reports `success: false`.
    pub fn activate_by_id(&self, id: Option<&str>) -> ActivationResult {
        let Some(id) = id else {
            return self.activate_document(None);
        };

        match self.store.get(id) {
            Some(doc) => self.activate_document(Some(doc)),
            None => {
                warn!(document = %id, "Activation requested for unknown document");
                ActivationResult {
                    success: false,
                    message: CatalogError::DocumentNotFound(id.to_string()).to_string(),
                    active_doc_id: self.registry.active_id(),
                }
            }
        }
    }

    pub fn import(&self, request: ImportRequest) -> Result<Document, CatalogError> {
        let doc = build_document(request)?;
        if self.store.upsert(doc.clone()).is_some() {
            info!(document = %doc.id, "Re-import replaced an existing document");
        }
        self.refresh_if_active(&doc.id);
        Ok(doc)
    }

    pub fn update_mock_response(
        &self,
        doc_id: &str,
        endpoint_id: &str,
        body: String,
    ) -> Result<Document, CatalogError> {
        let doc = self.store.update_mock_response(doc_id, endpoint_id, body)?;
        info!(document = %doc_id, endpoint = %endpoint_id, "Mock response updated");
        self.refresh_if_active(doc_id);
        Ok(doc)
    }

    pub fn reset_mock_response(&self, doc_id: &str, endpoint_id: &str) -> Result<Document, CatalogError> {
        let doc = self.store.reset_mock_response(doc_id, endpoint_id)?;
        info!(document = %doc_id, endpoint = %endpoint_id, "Mock response reset to default");
        self.refresh_if_active(doc_id);
        Ok(doc)
    }

    pub fn remove(&self, doc_id: &str) -> Result<Document, CatalogError> {
        let doc = self
            .store
            .remove(doc_id)
            .ok_or_else(|| CatalogError::DocumentNotFound(doc_id.to_string()))?;
        if self.registry.replace_if_active(doc_id, || None) {
            info!(document = %doc_id, "Removed document was active; mock server deactivated");
        }
        info!(document = %doc_id, "Document removed");
        Ok(doc)
    }

    /// Loads configured documents and applies the configured activation.
    pub fn seed(&self, documents: Vec<Document>, active: Option<&str>) -> anyhow::Result<()> {
        let count = documents.len();
        for doc in documents {
            let id = doc.id.clone();
            if let Some(previous) = self.store.upsert(doc.clone()) {
                let lost = lost_edits(&previous, &doc);
                if lost > 0 {
                    warn!(document = %id, endpoints = lost, "Seeding discarded edited mock responses");
                }
            }
            self.refresh_if_active(&id);
        }
        info!(documents = count, "Seed documents loaded");

        if let Some(id) = active {
            if let Some(current) = self.registry.active_id().filter(|current| current != id) {
                warn!(previous = %current, document = %id, "Seeded activation replaces the active document");
            }
            let result = self.activate_by_id(Some(id));
            if !result.success {
                anyhow::bail!("Cannot activate seed document: {}", result.message);
            }
        }

        Ok(())
    }

    // The copy is read from the store inside the swap, so the latest write
    // wins even when edits race.
    fn refresh_if_active(&self, doc_id: &str) {
        self.registry.replace_if_active(doc_id, || self.store.get(doc_id));
    }
}

/// Endpoints of `previous` carrying an edited mock response that `next` does
/// not keep. Endpoints are paired by id, then by method and path.
fn lost_edits(previous: &Document, next: &Document) -> usize {
    previous
        .endpoints
        .iter()
        .filter(|ep| ep.mock_response != ep.default_response)
        .filter(|ep| {
            let kept = next
                .endpoints
                .iter()
                .find(|candidate| candidate.id == ep.id)
                .or_else(|| next.find_endpoint(ep.method.as_str(), &ep.path));
            kept.map_or(true, |kept| kept.mock_response != ep.mock_response)
        })
        .count()
}
