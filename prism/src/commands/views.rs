// prism/src/commands/views.rs
//
// USE CASE: List the resolved views of one collection.

use std::path::PathBuf;

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use prism_core::application::{ResolveOptions, resolve_collection};
use prism_core::domain::collection::describe_values;

use super::{fail_with_diagnostic, load_collection_context};

pub fn execute(project_dir: PathBuf, name: String) -> anyhow::Result<()> {
    let ctx = load_collection_context(&project_dir, &name)?;
    let options = ResolveOptions::from_project(&ctx.project);
    let resolution = resolve_collection(&name, &ctx.collection, &ctx.catalog, &options)
        .unwrap_or_else(|e| fail_with_diagnostic(e));
    let collection = &resolution.collection;

    println!("\n📋 {} ({} views)", collection.title, collection.views.len());

    let slugs: Vec<&str> = collection.dimensions.iter().map(|d| d.slug.as_str()).collect();
    let mut header: Vec<Cell> = slugs.iter().map(|s| Cell::new(s)).collect();
    header.push(Cell::new("y"));
    header.push(Cell::new("title"));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);

    for view in &collection.views {
        let mut row: Vec<Cell> = slugs
            .iter()
            .map(|s| Cell::new(view.dimension_values.get(*s).map_or("", String::as_str)))
            .collect();
        row.push(Cell::new(view.indicators.y.join("\n")));
        row.push(Cell::new(view.config.title.as_deref().unwrap_or("")));
        table.add_row(row);
    }
    println!("{table}");

    let stats = &resolution.stats;
    println!(
        "📊 expanded: {}, refined: {}, explicit: {}, dropped: {}, conflicts: {}",
        stats.expanded, stats.refined, stats.explicit, stats.dropped, stats.conflicts
    );
    if let Some(default_view) = &collection.default_view {
        println!("⭐ Default view: {}", describe_values(default_view));
    }

    Ok(())
}
