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

//! Documentation-driven mock HTTP server.
//!
//! Imported API documents are kept in a [`catalog::DocumentStore`]; at most
//! one of them is active at a time and answers every request under the mock
//! prefix.

pub mod catalog;
pub mod config;
pub mod server;
pub mod telemetry;
pub mod utils;
