use crate::domain::catalog::Catalog;
use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use std::path::Path;

/// Supplies the tables loaded by the dataset layer.
pub trait CatalogSource: Send + Sync {
    fn load_catalog(&self, root: &Path, config: &ProjectConfig) -> Result<Catalog, DomainError>;
}
