// prism/src/commands/build.rs
//
// USE CASE: Resolve and emit every collection of the project.

use std::path::PathBuf;

use anyhow::Context;
use prism_core::application::{OutputStatus, build_project};
use prism_core::infrastructure::config::{
    YamlCatalogSource, YamlCollectionLoader, load_project_config,
};

pub async fn execute(project_dir: PathBuf, select: Option<String>, check: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);
    if check {
        println!("   Mode: check (no files written) 🔒");
    }

    let result = build_project(
        &YamlCollectionLoader,
        &YamlCatalogSource,
        &project_dir,
        &config,
        select,
        check,
    )
    .await;

    match result {
        Ok(build) => {
            if build.success {
                println!("\n✨ SUCCESS! Build finished in {:.2?}", start.elapsed());
            } else {
                for error in &build.errors {
                    eprintln!("   ❌ {}", error);
                }
                let stale: Vec<&str> = build
                    .with_status(OutputStatus::Stale)
                    .map(|c| c.name.as_str())
                    .collect();
                if !stale.is_empty() {
                    eprintln!("   ⚠️  Stale outputs: [{}]", stale.join(", "));
                    eprintln!("   👉 Run 'prism build' to refresh them.");
                }
                eprintln!(
                    "\n❌ FAILURE. {} collection(s) failed, {} stale.",
                    build.errors.len(),
                    stale.len()
                );
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL BUILD ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
