// src/domain/project/configuration.rs

use crate::domain::collection::ChartConfig;
use serde::{Deserialize, Serialize};

/// Project-wide resolution switches. Collections may override some of them.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ResolutionSettings {
    #[serde(default)]
    pub warn_on_missing_combinations: bool,

    #[serde(default)]
    pub prune_unused_choices: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,

    #[serde(rename = "collection-paths", default = "default_collection_paths")]
    pub collection_paths: Vec<String>,

    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    /// Global chart defaults, the lowest config layer of every view.
    #[serde(default)]
    pub defaults: ChartConfig,

    #[serde(default)]
    pub resolution: ResolutionSettings,
}

fn default_collection_paths() -> Vec<String> {
    vec!["collections".to_string()]
}
fn default_catalog_path() -> String {
    "catalog.yaml".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("name: covid\nversion: '1.0'\n").unwrap();
        assert_eq!(config.collection_paths, vec!["collections"]);
        assert_eq!(config.catalog_path, "catalog.yaml");
        assert_eq!(config.target_path, "target");
        assert_eq!(config.clean_targets, vec!["target"]);
        assert!(config.defaults.is_empty());
        assert_eq!(config.resolution, ResolutionSettings::default());
    }

    #[test]
    fn test_project_kebab_keys() {
        let yaml = r#"
name: covid
version: "2.1"
collection-paths: [mdims, explorers]
catalog-path: data/tables.yml
target-path: build
defaults:
  hasMapTab: true
resolution:
  prune_unused_choices: true
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.collection_paths, vec!["mdims", "explorers"]);
        assert_eq!(config.catalog_path, "data/tables.yml");
        assert_eq!(config.target_path, "build");
        assert_eq!(config.defaults.has_map_tab, Some(true));
        assert!(config.resolution.prune_unused_choices);
        assert!(!config.resolution.warn_on_missing_combinations);
    }
}
