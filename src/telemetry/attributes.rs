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

//! Attribute names shared by spans, logs and metrics.
//!
//! HTTP names follow the OpenTelemetry semantic conventions
//! (https://opentelemetry.io/docs/specs/semconv/http/http-spans/); the
//! `mock.*` names are specific to this service.

pub mod http {
    pub const METHOD: &str = "http.method";

    /// Route template, i.e. the mock prefix rather than the full path.
    pub const ROUTE: &str = "http.route";

    pub const TARGET: &str = "http.target";

    pub const RESPONSE_STATUS_CODE: &str = "http.response.status_code";
}

pub mod mock {
    /// `hit`, `miss`, `inactive` or `preflight`.
    pub const OUTCOME: &str = "mock.outcome";

    pub const DOCUMENT: &str = "mock.document";
}

#[cfg(feature = "otel")]
pub mod kv {
    use opentelemetry::KeyValue;

    pub fn http_method(method: impl Into<String>) -> KeyValue {
        KeyValue::new(super::http::METHOD, method.into())
    }

    pub fn http_route(route: impl Into<String>) -> KeyValue {
        KeyValue::new(super::http::ROUTE, route.into())
    }

    pub fn http_response_status_code(status: u16) -> KeyValue {
        KeyValue::new(super::http::RESPONSE_STATUS_CODE, status as i64)
    }

    pub fn mock_outcome(outcome: impl Into<String>) -> KeyValue {
        KeyValue::new(super::mock::OUTCOME, outcome.into())
    }

    pub fn mock_document(document: impl Into<String>) -> KeyValue {
        KeyValue::new(super::mock::DOCUMENT, document.into())
    }
}
