// prism-core/src/infrastructure/config/catalog.rs

use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::catalog::Catalog;
use crate::domain::error::DomainError;
use crate::domain::ports::CatalogSource;
use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

/// Loads the table catalog. A missing file yields an empty catalog.
#[instrument]
pub fn load_catalog(path: &Path) -> Result<Catalog, InfrastructureError> {
    if !path.exists() {
        return Ok(Catalog::default());
    }

    let content = fs::read_to_string(path)?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;

    for table in catalog.tables() {
        if table.name.trim().is_empty() {
            return Err(InfrastructureError::ConfigError(format!(
                "Catalog {:?} declares a table without a name",
                path
            )));
        }
    }

    info!(tables = catalog.tables().len(), "Catalog loaded");
    Ok(catalog)
}

pub struct YamlCatalogSource;

impl CatalogSource for YamlCatalogSource {
    fn load_catalog(&self, root: &Path, config: &ProjectConfig) -> Result<Catalog, DomainError> {
        load_catalog(&root.join(&config.catalog_path))
            .map_err(|e| DomainError::CatalogError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_load_catalog() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.yaml");
        fs::write(
            &path,
            "tables:\n  - name: cases_deaths\n    catalog_path: grapher/covid/cases_deaths\n    columns: [total_cases]\n",
        )?;
        let catalog = load_catalog(&path)?;
        assert_eq!(catalog.tables().len(), 1);
        assert!(catalog.find_table("cases_deaths")?.has_column("total_cases"));
        Ok(())
    }

    #[test]
    fn test_missing_catalog_is_empty() -> Result<()> {
        let dir = tempdir()?;
        assert!(load_catalog(&dir.path().join("nope.yaml"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_nameless_table_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, "tables:\n  - name: ''\n")?;
        assert!(load_catalog(&path).is_err());
        Ok(())
    }
}
