//! Configuration for the paginated search dispatcher
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration.

use crate::error::{Error, Result, ResultExt};
use crate::links::{DEFAULT_PRESERVED_PARAMS, PAGE_SIZE_PARAM, START_PARAM};
use crate::types::MediaType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Pager Config
// ============================================================================

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagerConfig {
    /// Page size used when the caller does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Result cap for scans when the caller does not give one (0 = unbounded)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Time budget for scans in milliseconds (0 = unbounded)
    #[serde(default = "default_max_time_ms")]
    pub max_time_ms: u64,

    /// Media type advertised on navigation links
    #[serde(default)]
    pub media_type: MediaType,

    /// Query parameters carried into navigation links
    #[serde(default = "default_preserved_params")]
    pub preserved_params: Vec<String>,

    /// Maximum concurrent single-record lookups during scans
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_max_results() -> usize {
    100
}

fn default_max_time_ms() -> u64 {
    10_000
}

fn default_preserved_params() -> Vec<String> {
    DEFAULT_PRESERVED_PARAMS
        .iter()
        .map(|p| (*p).to_string())
        .collect()
}

fn default_lookup_concurrency() -> usize {
    8
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_results: default_max_results(),
            max_time_ms: default_max_time_ms(),
            media_type: MediaType::default(),
            preserved_params: default_preserved_params(),
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}

impl PagerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PagerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse pager config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Scan time budget
    pub fn max_time(&self) -> Duration {
        Duration::from_millis(self.max_time_ms)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(Error::config("default_page_size must be positive"));
        }
        if self.max_page_size < self.default_page_size {
            return Err(Error::config(format!(
                "max_page_size ({}) is smaller than default_page_size ({})",
                self.max_page_size, self.default_page_size
            )));
        }
        if self.lookup_concurrency == 0 {
            return Err(Error::config("lookup_concurrency must be positive"));
        }
        for name in &self.preserved_params {
            if name.is_empty() {
                return Err(Error::config("preserved parameter names cannot be empty"));
            }
            if name == START_PARAM || name == PAGE_SIZE_PARAM {
                return Err(Error::config(format!(
                    "'{name}' is reserved for cursor links and cannot be preserved"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PagerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, PagerConfig::default());
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_time(), Duration::from_secs(10));
        assert_eq!(config.media_type, MediaType::Xml);
        assert_eq!(config.preserved_params, vec!["requestState", "requestType"]);
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
default_page_size: 10
max_page_size: 50
max_results: 0
max_time_ms: 250
media_type: application/json
preserved_params: [requestState, owner]
lookup_concurrency: 2
"#;
        let config = PagerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.max_results, 0);
        assert_eq!(config.max_time(), Duration::from_millis(250));
        assert_eq!(config.media_type, MediaType::Json);
        assert_eq!(config.preserved_params, vec!["requestState", "owner"]);
        assert_eq!(config.lookup_concurrency, 2);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = PagerConfig::from_yaml_str("page_sise: 10").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            "default_page_size: 0",
            "default_page_size: 50\nmax_page_size: 10",
            "lookup_concurrency: 0",
            "preserved_params: ['']",
            "preserved_params: [start]",
            "preserved_params: [requestState, pageSize]",
        ];
        for yaml in cases {
            let err = PagerConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, Error::Config { .. }), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_page_size: 5\nmedia_type: application/xml").unwrap();

        let config = PagerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.media_type, MediaType::Xml);
    }

    #[test]
    fn test_from_missing_file() {
        let err = PagerConfig::from_file("/nonexistent/pager.yaml").unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert!(err
            .to_string()
            .starts_with("Failed to read config file '/nonexistent/pager.yaml': IO error:"));
    }
}
