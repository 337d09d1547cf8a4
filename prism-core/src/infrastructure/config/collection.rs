// prism-core/src/infrastructure/config/collection.rs

use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use validator::Validate;
use walkdir::WalkDir;

use crate::domain::collection::CollectionConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::{CollectionEntry, CollectionLoader};
use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const COLLECTION_SUFFIXES: [&str; 2] = [".mdim.yml", ".mdim.yaml"];

/// Collection name from a file name: `covid.mdim.yml` -> `covid`.
pub fn collection_name(file_name: &str) -> Option<&str> {
    COLLECTION_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}

/// Finds every `*.mdim.yml` under the configured collection paths, sorted by name.
pub fn discover_collections(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<CollectionEntry>, InfrastructureError> {
    let mut entries = Vec::new();

    for rel in &config.collection_paths {
        let dir = project_dir.join(rel);
        if !dir.exists() {
            warn!(path = ?dir, "Collection path does not exist");
            continue;
        }

        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| InfrastructureError::Io(e.into()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if let Some(name) = collection_name(&file_name) {
                debug!(collection = name, path = ?path, "Found collection");
                entries.push(CollectionEntry {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
    }

    entries.sort();
    if let Some(dup) = entries.windows(2).find(|w| w[0].name == w[1].name) {
        return Err(InfrastructureError::ConfigError(format!(
            "Collection '{}' is defined twice: {:?} and {:?}",
            dup[0].name, dup[0].path, dup[1].path
        )));
    }

    Ok(entries)
}

#[instrument]
pub fn load_collection(path: &Path) -> Result<CollectionConfig, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let config: CollectionConfig = serde_yaml::from_str(&content)?;
    config
        .validate()
        .map_err(|source| InfrastructureError::Validation {
            path: path.display().to_string(),
            source,
        })?;
    info!(title = %config.title, "Collection loaded");
    Ok(config)
}

pub struct YamlCollectionLoader;

impl CollectionLoader for YamlCollectionLoader {
    fn discover(
        &self,
        root: &Path,
        config: &ProjectConfig,
    ) -> Result<Vec<CollectionEntry>, DomainError> {
        discover_collections(root, config).map_err(|e| DomainError::CollectionError(e.to_string()))
    }

    fn load(&self, entry: &CollectionEntry) -> Result<CollectionConfig, DomainError> {
        load_collection(&entry.path).map_err(|e| {
            DomainError::CollectionError(format!("{}: {}", entry.path.display(), e))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
title: Deaths
dimensions:
  - slug: metric
    name: Metric
    choices:
      - slug: absolute
        name: Absolute
"#;

    fn project() -> ProjectConfig {
        serde_yaml::from_str("name: p\nversion: '1'\n").unwrap()
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(collection_name("covid.mdim.yml"), Some("covid"));
        assert_eq!(collection_name("covid.mdim.yaml"), Some("covid"));
        assert_eq!(collection_name("covid.yml"), None);
        assert_eq!(collection_name(".mdim.yml"), None);
    }

    #[test]
    fn test_discover_sorted_and_nested() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("collections");
        fs::create_dir_all(root.join("health"))?;
        fs::write(root.join("zeta.mdim.yml"), MINIMAL)?;
        fs::write(root.join("health/alpha.mdim.yaml"), MINIMAL)?;
        fs::write(root.join("notes.md"), "ignored")?;

        let entries = discover_collections(dir.path(), &project())?;
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        Ok(())
    }

    #[test]
    fn test_discover_rejects_duplicate_names() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("collections");
        fs::create_dir_all(root.join("a"))?;
        fs::create_dir_all(root.join("b"))?;
        fs::write(root.join("a/covid.mdim.yml"), MINIMAL)?;
        fs::write(root.join("b/covid.mdim.yml"), MINIMAL)?;
        assert!(matches!(
            discover_collections(dir.path(), &project()),
            Err(InfrastructureError::ConfigError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_collection_validates_shape() -> Result<()> {
        let dir = tempdir()?;
        let ok = dir.path().join("ok.mdim.yml");
        fs::write(&ok, MINIMAL)?;
        assert_eq!(load_collection(&ok)?.title, "Deaths");

        let bad = dir.path().join("bad.mdim.yml");
        fs::write(&bad, "title: ''\ndimensions: []\n")?;
        assert!(matches!(
            load_collection(&bad),
            Err(InfrastructureError::Validation { .. })
        ));
        Ok(())
    }
}
