//! Generator configuration, loadable from a `vimbridge.toml` file.
//!
//! ```toml
//! [generator]
//! scan_paths = ["src/"]
//! output_file = "src/generated/legacy_aliases.rs"
//! crate_name = "crate"
//!
//! [filters]
//! include_enum_files = ["v1/enums.rs"]
//! include_modules = ["crate::v1"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub generator: GeneratorSettings,
    pub filters: FilterSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub scan_paths: Vec<String>,
    pub output_file: String,
    pub crate_name: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            scan_paths: vec!["src/".to_string()],
            output_file: "src/generated/legacy_aliases.rs".to_string(),
            crate_name: "crate".to_string(),
        }
    }
}

/// Include filters. An empty list includes everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Files whose schema enums get bridge assertions, relative to the scanned directory
    pub include_enum_files: Vec<String>,
    /// Modules whose schema messages get legacy aliases; submodules are included
    pub include_modules: Vec<String>,
}

impl GeneratorConfig {
    /// Load configuration from a toml file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid generator configuration")
    }
}

impl FilterSettings {
    pub fn includes_module(&self, module_path: &str) -> bool {
        self.include_modules.is_empty()
            || self.include_modules.iter().any(|included| {
                module_path == included.as_str()
                    || module_path
                        .strip_prefix(included.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
    }

    pub fn includes_enum_file(&self, file: &Path) -> bool {
        self.include_enum_files.is_empty()
            || self
                .include_enum_files
                .iter()
                .any(|included| file.ends_with(included.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            [filters]
            include_modules = ["crate::v1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.generator, GeneratorSettings::default());
        assert_eq!(config.filters.include_modules, vec!["crate::v1".to_string()]);
        assert!(config.filters.include_enum_files.is_empty());
    }

    #[test]
    fn test_empty_filters_include_everything() {
        let filters = FilterSettings::default();
        assert!(filters.includes_module("crate::anything"));
        assert!(filters.includes_enum_file(Path::new("v1/enums.rs")));
    }

    #[test]
    fn test_module_filter_includes_submodules_only() {
        let filters = FilterSettings {
            include_modules: vec!["crate::v1".into()],
            ..Default::default()
        };
        assert!(filters.includes_module("crate::v1"));
        assert!(filters.includes_module("crate::v1::faults"));
        assert!(!filters.includes_module("crate::v10"));
        assert!(!filters.includes_module("crate::v2"));
    }

    #[test]
    fn test_enum_file_filter_matches_path_suffix() {
        let filters = FilterSettings {
            include_enum_files: vec!["v1/enums.rs".into()],
            ..Default::default()
        };
        assert!(filters.includes_enum_file(Path::new("v1/enums.rs")));
        assert!(filters.includes_enum_file(Path::new("api/v1/enums.rs")));
        assert!(!filters.includes_enum_file(Path::new("v1/messages.rs")));
    }

    #[test]
    fn test_invalid_config_reports_context() {
        let err = GeneratorConfig::from_toml_str("generator = 3").unwrap_err();
        assert!(err.to_string().contains("Invalid generator configuration"));
    }
}
