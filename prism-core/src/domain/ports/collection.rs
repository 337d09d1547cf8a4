use crate::domain::collection::CollectionConfig;
use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use std::path::{Path, PathBuf};

/// A collection document found in the project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollectionEntry {
    pub name: String,
    pub path: PathBuf,
}

pub trait CollectionLoader: Send + Sync {
    fn discover(
        &self,
        root: &Path,
        config: &ProjectConfig,
    ) -> Result<Vec<CollectionEntry>, DomainError>;

    fn load(&self, entry: &CollectionEntry) -> Result<CollectionConfig, DomainError>;
}
