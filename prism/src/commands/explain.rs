// prism/src/commands/explain.rs
//
// USE CASE: Config provenance of a single view.

use std::path::PathBuf;

use prism_core::application::{ResolveOptions, explain_view, parse_selector};
use prism_core::domain::collection::describe_values;

use super::{fail_with_diagnostic, load_collection_context};

pub fn execute(project_dir: PathBuf, name: String, view: String) -> anyhow::Result<()> {
    let ctx = load_collection_context(&project_dir, &name)?;
    let values = parse_selector(&view).unwrap_or_else(|e| fail_with_diagnostic(e));
    let options = ResolveOptions::from_project(&ctx.project);
    let explanation = explain_view(&ctx.collection, &ctx.catalog, &options, &values)
        .unwrap_or_else(|e| fail_with_diagnostic(e));

    println!("\n🔎 View {}", describe_values(&explanation.dimension_values));

    println!("   Indicators:");
    for indicator in &explanation.indicators {
        println!(
            "     {:<6} {} ➜ {}",
            indicator.role.as_str(), indicator.reference, indicator.catalog_path
        );
    }

    let rules: Vec<String> = explanation
        .matching_rules
        .iter()
        .map(|i| format!("common_views[{}]", i))
        .collect();
    println!("   Matching rules: [{}]", rules.join(", "));

    println!("   Config:");
    for key in &explanation.keys {
        println!("     {} = {}  ({})", key.key, key.value, key.origin);
    }

    for conflict in &explanation.conflicts {
        println!(
            "   ⚠️  '{}' set by common_views[{}] and common_views[{}] (same specificity), the latter wins",
            conflict.key, conflict.overridden, conflict.winner
        );
    }

    Ok(())
}
