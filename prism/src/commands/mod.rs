// prism/src/commands/mod.rs

pub mod build;
pub mod clean;
pub mod explain;
pub mod views;

use anyhow::{Context, bail};
use std::path::Path;

use prism_core::domain::catalog::Catalog;
use prism_core::domain::DomainError;
use prism_core::domain::collection::CollectionConfig;
use prism_core::domain::ports::{CatalogSource, CollectionLoader};
use prism_core::domain::project::ProjectConfig;
use prism_core::infrastructure::config::{
    YamlCatalogSource, YamlCollectionLoader, load_project_config,
};

/// Everything needed to resolve a single collection of the project.
pub struct CollectionContext {
    pub project: ProjectConfig,
    pub collection: CollectionConfig,
    pub catalog: Catalog,
}

pub fn load_collection_context(project_dir: &Path, name: &str) -> anyhow::Result<CollectionContext> {
    let project = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;

    let loader = YamlCollectionLoader;
    let entries = loader.discover(project_dir, &project)?;
    let Some(entry) = entries.iter().find(|e| e.name == name) else {
        let known: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        bail!(
            "❌ Collection '{}' not found.\n👉 Known collections: [{}]",
            name,
            known.join(", ")
        );
    };

    tracing::debug!(collection = %entry.name, path = ?entry.path, "Loading collection");
    let collection = loader.load(entry)?;
    let catalog = YamlCatalogSource.load_catalog(project_dir, &project)?;

    Ok(CollectionContext {
        project,
        collection,
        catalog,
    })
}

/// Renders a domain error with its diagnostic code and help, then exits.
pub fn fail_with_diagnostic(err: DomainError) -> ! {
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(1);
}
