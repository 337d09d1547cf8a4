// prism-core/src/application/clean.rs

use crate::error::PrismError;
use crate::infrastructure::config::project::load_project_config;
use std::fs;
use std::path::{Component, Path};

/// Clean targets must stay inside the project: relative, no `..`.
fn is_contained(target: &Path) -> bool {
    target
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Removes the configured clean targets. Returns the removed relative paths.
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, PrismError> {
    tracing::info!("🧹 Initializing Prism cleanup sequence...");

    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        if !is_contained(Path::new(&target_rel_path)) {
            return Err(PrismError::UnsafePath(target_rel_path));
        }
        let full_path = project_dir.join(&target_rel_path);

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            println!("   🗑️  Artifact removed: {}", target_rel_path);
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_clean_removes_targets() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("prism.yaml"),
            "name: p\nversion: '1'\nclean-targets: [target, cache.json]\n",
        )?;
        fs::create_dir_all(dir.path().join("target/collections"))?;
        fs::write(dir.path().join("target/collections/a.json"), "{}")?;
        fs::write(dir.path().join("cache.json"), "{}")?;

        let removed = clean_project(dir.path())?;
        assert_eq!(removed, vec!["target", "cache.json"]);
        assert!(!dir.path().join("target").exists());
        assert!(!dir.path().join("cache.json").exists());
        assert!(dir.path().join("prism.yaml").exists());
        Ok(())
    }

    #[test]
    fn test_clean_rejects_escaping_paths() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("prism.yaml"),
            "name: p\nversion: '1'\nclean-targets: ['../outside']\n",
        )?;
        assert!(matches!(
            clean_project(dir.path()),
            Err(PrismError::UnsafePath(_))
        ));
        Ok(())
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("target")));
        assert!(is_contained(Path::new("./build/out")));
        assert!(!is_contained(Path::new("../x")));
        assert!(!is_contained(Path::new("/etc")));
        assert!(!is_contained(Path::new("a/../../b")));
    }
}
