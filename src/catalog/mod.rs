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

pub mod admin;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod importer;
pub mod model;
pub mod registry;
pub mod store;

pub use admin::{ActivationResult, MockAdmin};
pub use content::MockBody;
pub use dispatcher::{MockDispatcher, MockResponse};
pub use error::{CatalogError, LookupError};
pub use importer::{ImportRequest, ParsedEndpoint};
pub use model::{Document, EndpointDefinition, ExampleResponse, HttpMethod};
pub use registry::ActiveRegistry;
pub use store::DocumentStore;

use std::sync::Arc;

/// The registry, store, admin and dispatcher wired together once at startup.
#[derive(Clone)]
pub struct Catalog {
    pub registry: Arc<ActiveRegistry>,
    pub admin: MockAdmin,
    pub dispatcher: MockDispatcher,
}

impl Catalog {
    pub fn new(source_header: impl Into<String>) -> Self {
        let registry = Arc::new(ActiveRegistry::new());
        let admin = MockAdmin::new(DocumentStore::new(), registry.clone());
        let dispatcher = MockDispatcher::new(registry.clone(), source_header);

        Self {
            registry,
            admin,
            dispatcher,
        }
    }
}
