// prism-core/src/application/pipeline.rs

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, instrument};

use crate::application::resolve::{ResolutionStats, ResolveOptions, resolve_collection};
use crate::domain::error::DomainError;
use crate::domain::ports::{CatalogSource, CollectionLoader};
use crate::domain::project::ProjectConfig;
use crate::error::PrismError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, is_up_to_date, write_if_changed};

pub const COLLECTIONS_DIR: &str = "collections";
pub const BUILD_REPORT: &str = "build_report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStatus {
    Written,
    Unchanged,
    Stale,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub name: String,
    pub status: OutputStatus,
    pub views: usize,
    pub stats: ResolutionStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub success: bool,
    pub check: bool,
    pub collections: Vec<CollectionReport>,
    pub errors: Vec<String>,
}

impl BuildResult {
    pub fn with_status(&self, status: OutputStatus) -> impl Iterator<Item = &CollectionReport> {
        self.collections.iter().filter(move |c| c.status == status)
    }
}

#[derive(Serialize)]
struct BuildReport<'a> {
    generated_at: String,
    project: &'a str,
    #[serde(flatten)]
    result: &'a BuildResult,
}

/// Resolves every collection of the project and emits one JSON file per collection.
///
/// Collections resolve in parallel on the blocking pool. In `check` mode nothing
/// is written and outputs that would change are reported as stale.
#[instrument(skip_all, fields(project = %config.name, check = check))]
pub async fn build_project<L, C>(
    loader: &L,
    catalog_source: &C,
    project_dir: &Path,
    config: &ProjectConfig,
    select: Option<String>,
    check: bool,
) -> Result<BuildResult, PrismError>
where
    L: CollectionLoader,
    C: CatalogSource,
{
    println!("🚀 Starting Prism build...");
    let start_time = std::time::Instant::now();

    // 1. CATALOG
    println!("📚 Loading table catalog...");
    let catalog = Arc::new(catalog_source.load_catalog(project_dir, config)?);

    // 2. DISCOVERY
    println!("📦 Discovering collections...");
    let mut entries = loader.discover(project_dir, config)?;
    if let Some(sel) = &select {
        entries.retain(|e| &e.name == sel);
        if entries.is_empty() {
            return Err(DomainError::not_found("collection", sel.as_str()).into());
        }
    }
    println!("📝 {} collection(s) selected", entries.len());

    // 3. RESOLUTION (parallel, pure)
    let options = Arc::new(ResolveOptions::from_project(config));
    let mut tasks = JoinSet::new();
    let mut reports = Vec::new();

    for entry in entries {
        let document = match loader.load(&entry) {
            Ok(document) => document,
            Err(e) => {
                reports.push((entry.name.clone(), Err(e)));
                continue;
            }
        };
        let catalog = Arc::clone(&catalog);
        let options = Arc::clone(&options);
        tasks.spawn_blocking(move || {
            let res = resolve_collection(&entry.name, &document, &catalog, &options);
            (entry.name, res)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome =
            joined.map_err(|e| PrismError::InternalError(format!("Resolution task failed: {}", e)))?;
        reports.push(outcome);
    }
    // Emission order never depends on scheduling.
    reports.sort_by(|a, b| a.0.cmp(&b.0));

    // 4. EMISSION
    let target_dir = project_dir.join(&config.target_path);
    let output_dir = target_dir.join(COLLECTIONS_DIR);
    let mut collections = Vec::with_capacity(reports.len());
    let mut errors = Vec::new();

    for (name, outcome) in reports {
        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(e) => {
                eprintln!("    ❌ Error resolving {}: {}", name, e);
                errors.push(format!("{}: {}", name, e));
                collections.push(CollectionReport {
                    name,
                    status: OutputStatus::Failed,
                    views: 0,
                    stats: ResolutionStats::default(),
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let mut json = serde_json::to_string_pretty(&resolution.collection)
            .map_err(InfrastructureError::from)?;
        json.push('\n');
        let path = output_dir.join(format!("{}.json", name));

        let status = if check {
            if is_up_to_date(&path, json.as_bytes())? {
                OutputStatus::Unchanged
            } else {
                OutputStatus::Stale
            }
        } else if write_if_changed(&path, json.as_bytes())? {
            OutputStatus::Written
        } else {
            OutputStatus::Unchanged
        };

        match status {
            OutputStatus::Written => println!("    ✅ Built collection: {}", name),
            OutputStatus::Unchanged => println!("    💤 Up to date: {}", name),
            OutputStatus::Stale => println!("    ⚠️  Stale output: {}", name),
            OutputStatus::Failed => {}
        }

        collections.push(CollectionReport {
            name,
            status,
            views: resolution.collection.views.len(),
            stats: resolution.stats,
            error: None,
        });
    }

    let stale = collections
        .iter()
        .filter(|c| c.status == OutputStatus::Stale)
        .count();
    let result = BuildResult {
        success: errors.is_empty() && stale == 0,
        check,
        collections,
        errors,
    };

    // 5. REPORT
    if !check {
        let report = BuildReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            project: &config.name,
            result: &result,
        };
        let content = serde_json::to_string_pretty(&report).map_err(InfrastructureError::from)?;
        atomic_write(target_dir.join(BUILD_REPORT), content)?;
    }

    info!(
        collections = result.collections.len(),
        errors = result.errors.len(),
        stale,
        "Build finished"
    );
    println!(
        "✨ Done in {:.2}s. {} collection(s) processed.",
        start_time.elapsed().as_secs_f64(),
        result.collections.len()
    );

    Ok(result)
}
