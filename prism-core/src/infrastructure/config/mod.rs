pub mod catalog;
pub mod collection;
pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use catalog::{YamlCatalogSource, load_catalog};
pub use collection::{YamlCollectionLoader, discover_collections, load_collection};
pub use project::load_project_config;
