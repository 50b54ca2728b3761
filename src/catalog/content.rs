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

//! Content-type inference for stored mock bodies.

use serde_json::Value;

pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_XML: &str = "application/xml; charset=utf-8";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A stored mock body, classified by probing its text.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBody {
    Json(Value),
    Html(String),
    Xml(String),
    PlainText(String),
}

impl MockBody {
    /// Never fails: anything that is not JSON or markup is plain text.
    pub fn classify(raw: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return MockBody::Json(value);
        }

        let trimmed = raw.trim();
        if trimmed.starts_with('<') && trimmed.ends_with('>') {
            if raw.to_lowercase().contains("<html") {
                MockBody::Html(raw.to_string())
            } else {
                MockBody::Xml(raw.to_string())
            }
        } else {
            MockBody::PlainText(raw.to_string())
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MockBody::Json(_) => APPLICATION_JSON,
            MockBody::Html(_) => TEXT_HTML,
            MockBody::Xml(_) => APPLICATION_XML,
            MockBody::PlainText(_) => TEXT_PLAIN,
        }
    }

    /// JSON is re-rendered compactly; everything else is returned verbatim.
    pub fn into_body(self) -> String {
        match self {
            MockBody::Json(value) => value.to_string(),
            MockBody::Html(text) | MockBody::Xml(text) | MockBody::PlainText(text) => text,
        }
    }
}
