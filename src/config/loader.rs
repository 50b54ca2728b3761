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

use crate::catalog::Document;
use crate::config::types::{Config, MockConfig, TelemetryConfig};
use actix_web::http::header::HeaderName;
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Prefixes owned by the admin and system routes.
const RESERVED_PREFIXES: [&str; 4] = ["/admin", "/health", "/swagger-ui", "/api-docs"];

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> anyhow::Result<Config> {
        let config: Config =
            serde_yaml::from_str(content).with_context(|| "Failed to parse YAML configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    pub fn validate(config: &Config) -> anyhow::Result<()> {
        if config.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if config.server.workers == 0 {
            anyhow::bail!("Number of workers cannot be 0");
        }

        if config.telemetry.sampling_rate < 0.0 || config.telemetry.sampling_rate > 1.0 {
            anyhow::bail!("Sampling rate must be between 0.0 and 1.0");
        }

        if config.telemetry.enabled {
            Self::validate_telemetry_config(&config.telemetry)?;
        }

        Self::validate_mock_config(&config.mock)?;
        Self::validate_documents(&config.documents, config.mock.active_document.as_deref())?;

        Ok(())
    }

    fn validate_telemetry_config(config: &TelemetryConfig) -> anyhow::Result<()> {
        if config.endpoint.is_empty() {
            anyhow::bail!("Telemetry endpoint cannot be empty");
        }

        let url = url::Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid telemetry endpoint URL format: {}", config.endpoint))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("Telemetry endpoint must use http:// or https:// scheme");
        }

        if url.host().is_none() {
            anyhow::bail!("Telemetry endpoint must have a host");
        }

        let protocol = config.protocol.to_lowercase();
        if protocol != "http" && protocol != "grpc" {
            anyhow::bail!(
                "Telemetry protocol must be 'http' or 'grpc', got '{}'",
                config.protocol
            );
        }

        if config.timeout_seconds == 0 {
            anyhow::bail!("Telemetry timeout must be greater than 0");
        }

        Ok(())
    }

    fn validate_mock_config(config: &MockConfig) -> anyhow::Result<()> {
        let prefix = config.prefix.as_str();

        if !prefix.starts_with('/') {
            anyhow::bail!("Mock prefix must start with '/', got '{}'", prefix);
        }

        if prefix == "/" || prefix.ends_with('/') {
            anyhow::bail!("Mock prefix must not be '/' or end with '/', got '{}'", prefix);
        }

        let lower = prefix.to_lowercase();
        for reserved in RESERVED_PREFIXES {
            if lower == reserved || lower.starts_with(&format!("{}/", reserved)) {
                anyhow::bail!("Mock prefix '{}' collides with reserved route '{}'", prefix, reserved);
            }
        }

        HeaderName::from_bytes(config.source_header.as_bytes())
            .with_context(|| format!("Invalid source header name: '{}'", config.source_header))?;

        Ok(())
    }

    fn validate_documents(documents: &[Document], active: Option<&str>) -> anyhow::Result<()> {
        let mut ids = HashSet::new();

        for doc in documents {
            if doc.id.trim().is_empty() {
                anyhow::bail!("Document id cannot be empty");
            }

            if doc.title.trim().is_empty() {
                anyhow::bail!("Document '{}' must have a title", doc.id);
            }

            if !ids.insert(doc.id.as_str()) {
                anyhow::bail!("Duplicate document id '{}'", doc.id);
            }

            for endpoint in &doc.endpoints {
                if !endpoint.path.starts_with('/') {
                    anyhow::bail!(
                        "Endpoint path must start with '/' in document '{}', got '{}'",
                        doc.id,
                        endpoint.path
                    );
                }
            }

            for signature in doc.duplicate_signatures() {
                warn!(
                    document = %doc.id,
                    endpoint = %signature,
                    "Duplicate endpoint in configuration, only the first one will be served"
                );
            }
        }

        if let Some(active) = active {
            if !ids.contains(active) {
                anyhow::bail!("Active document '{}' is not among the configured documents", active);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HttpMethod;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
server:
  host: 127.0.0.1
  port: 8081
  workers: 2
telemetry:
  log_format: text
mock:
  prefix: /api/mock
  active_document: https://docs.example.com/ping
documents:
  - id: https://docs.example.com/ping
    title: Ping API
    endpoints:
      - id: e1
        method: GET
        path: /ping
        defaultResponse: '{"ok":true}'
      - method: post
        path: /ping
        defaultResponse: created
        mockResponse: '{"id":1}'
"#;

    #[test]
    fn test_load_full_config() {
        let config = ConfigLoader::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.telemetry.log_format, "text");
        assert_eq!(
            config.mock.active_document.as_deref(),
            Some("https://docs.example.com/ping")
        );

        let doc = &config.documents[0];
        assert_eq!(doc.title, "Ping API");
        assert_eq!(doc.endpoints[0].mock_response, "{\"ok\":true}");
        assert_eq!(doc.endpoints[1].method, HttpMethod::Post);
        assert_eq!(doc.endpoints[1].mock_response, "{\"id\":1}");
        assert!(!doc.endpoints[1].id.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(config.documents.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::from_file("/nonexistent/docmock.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ConfigLoader::from_str("server: [").is_err());
    }

    #[test]
    fn test_rejects_zero_port_and_workers() {
        assert!(ConfigLoader::from_str("server:\n  port: 0\n").is_err());
        assert!(ConfigLoader::from_str("server:\n  workers: 0\n").is_err());
    }

    #[test]
    fn test_rejects_bad_sampling_rate() {
        assert!(ConfigLoader::from_str("telemetry:\n  sampling_rate: 1.5\n").is_err());
    }

    #[test]
    fn test_telemetry_checked_only_when_enabled() {
        assert!(ConfigLoader::from_str("telemetry:\n  endpoint: nope\n").is_ok());
        assert!(ConfigLoader::from_str("telemetry:\n  enabled: true\n  endpoint: nope\n").is_err());
        assert!(ConfigLoader::from_str(
            "telemetry:\n  enabled: true\n  endpoint: ftp://collector:4317\n"
        )
        .is_err());
        assert!(ConfigLoader::from_str("telemetry:\n  enabled: true\n  protocol: udp\n").is_err());
        assert!(ConfigLoader::from_str("telemetry:\n  enabled: true\n  protocol: http\n").is_ok());
    }

    #[test]
    fn test_rejects_bad_prefixes() {
        for prefix in ["mock", "/", "/mock/", "/admin", "/health/mock", "/API-DOCS"] {
            let yaml = format!("mock:\n  prefix: {}\n", prefix);
            assert!(ConfigLoader::from_str(&yaml).is_err(), "prefix {}", prefix);
        }
        assert!(ConfigLoader::from_str("mock:\n  prefix: /administration\n").is_ok());
    }

    #[test]
    fn test_rejects_bad_source_header() {
        assert!(ConfigLoader::from_str("mock:\n  source_header: \"bad header\"\n").is_err());
    }

    #[test]
    fn test_rejects_duplicate_document_ids() {
        let yaml = r#"
documents:
  - id: d1
    title: One
  - id: d1
    title: Again
"#;
        let err = ConfigLoader::from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate document id"));
    }

    #[test]
    fn test_rejects_relative_endpoint_path() {
        let yaml = r#"
documents:
  - id: d1
    title: One
    endpoints:
      - method: GET
        path: users
"#;
        assert!(ConfigLoader::from_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_unknown_active_document() {
        let yaml = r#"
mock:
  active_document: d9
documents:
  - id: d1
    title: One
"#;
        let err = ConfigLoader::from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("d9"));
    }

    #[test]
    fn test_rejects_unknown_method() {
        let yaml = r#"
documents:
  - id: d1
    title: One
    endpoints:
      - method: TRACE
        path: /x
"#;
        assert!(ConfigLoader::from_str(yaml).is_err());
    }
}
