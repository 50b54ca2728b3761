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

use crate::catalog::model::Document;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holds the one document whose mocks are being served.
///
/// Writers replace the whole document with a single pointer swap, so readers
/// never see a half-updated document and never take a lock.
#[derive(Default)]
pub struct ActiveRegistry {
    slot: ArcSwapOption<Document>,
}

impl ActiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, doc: Option<Document>) {
        self.slot.store(doc.map(Arc::new));
    }

    /// Swaps in `next()` only while `doc_id` still holds the slot. A
    /// concurrent activation or deactivation wins over this call. `next` may
    /// run more than once when writers race. Returns whether a swap happened.
    pub fn replace_if_active<F>(&self, doc_id: &str, mut next: F) -> bool
    where
        F: FnMut() -> Option<Document>,
    {
        let mut replaced = false;
        self.slot.rcu(|current| match current {
            Some(doc) if doc.id == doc_id => {
                replaced = true;
                next().map(Arc::new)
            }
            _ => {
                replaced = false;
                current.clone()
            }
        });
        replaced
    }

    pub fn get_active(&self) -> Option<Arc<Document>> {
        self.slot.load_full()
    }

    pub fn active_id(&self) -> Option<String> {
        self.slot.load_full().map(|doc| doc.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{EndpointDefinition, HttpMethod};
    use std::thread;

    #[test]
    fn test_starts_empty() {
        let registry = ActiveRegistry::new();
        assert!(registry.get_active().is_none());
        assert!(registry.active_id().is_none());
    }

    #[test]
    fn test_set_replaces_previous() {
        let registry = ActiveRegistry::new();

        registry.set_active(Some(Document::new("d1", "One")));
        registry.set_active(Some(Document::new("d2", "Two")));

        assert_eq!(registry.active_id().as_deref(), Some("d2"));
    }

    #[test]
    fn test_set_none_deactivates() {
        let registry = ActiveRegistry::new();
        registry.set_active(Some(Document::new("d1", "One")));
        registry.set_active(None);

        assert!(registry.get_active().is_none());
    }

    #[test]
    fn test_set_same_document_twice_is_idempotent() {
        let registry = ActiveRegistry::new();
        let doc = Document::new("d1", "One");

        registry.set_active(Some(doc.clone()));
        registry.set_active(Some(doc.clone()));

        assert_eq!(*registry.get_active().unwrap(), doc);
    }

    #[test]
    fn test_replace_if_active() {
        let registry = ActiveRegistry::new();
        assert!(!registry.replace_if_active("d1", || Some(Document::new("d1", "New"))));
        assert!(registry.get_active().is_none());

        registry.set_active(Some(Document::new("d2", "Two")));
        assert!(!registry.replace_if_active("d1", || Some(Document::new("d1", "New"))));
        assert_eq!(registry.active_id().as_deref(), Some("d2"));

        assert!(registry.replace_if_active("d2", || Some(Document::new("d2", "Renamed"))));
        assert_eq!(registry.get_active().unwrap().title, "Renamed");

        assert!(registry.replace_if_active("d2", || None));
        assert!(registry.get_active().is_none());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let registry = ActiveRegistry::new();
        registry.set_active(Some(Document::new("d1", "One")));

        let snapshot = registry.get_active().unwrap();
        registry.set_active(Some(Document::new("d2", "Two")));

        assert_eq!(snapshot.id, "d1");
        assert_eq!(registry.active_id().as_deref(), Some("d2"));
    }

    #[test]
    fn test_concurrent_readers_see_whole_documents() {
        let registry = Arc::new(ActiveRegistry::new());
        let mut handles = vec![];

        for i in 0..4 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                for j in 0..200 {
                    let id = format!("d{}", i * 1000 + j);
                    let doc = Document::new(id.clone(), id.clone()).with_endpoint(
                        EndpointDefinition::new(HttpMethod::Get, format!("/{}", id), "x"),
                    );
                    registry.set_active(Some(doc));
                }
            }));
        }

        for _ in 0..4 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    if let Some(doc) = registry.get_active() {
                        assert_eq!(doc.id, doc.title);
                        assert_eq!(doc.endpoints[0].path, format!("/{}", doc.id));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(registry.get_active().is_some());
    }
}
