// prism-core/src/application/resolve.rs
//
// One collection, end to end: registry -> expansion -> explicit views ->
// validation -> indicator references -> config layering.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use crate::domain::catalog::{Catalog, ReferenceResolver, TableDescriptor};
use crate::domain::collection::{
    ChartConfig, CollectionConfig, Dimension, DimensionRegistry, DimensionValues, View,
    ViewIndicators, describe_values,
};
use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use crate::domain::resolution::{ConfigMerger, ViewExpander};

/// Project-level inputs of a resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Lowest config layer, below the collection's own `defaults`.
    pub defaults: ChartConfig,
    pub warn_on_missing_combinations: bool,
    pub prune_unused_choices: bool,
}

impl ResolveOptions {
    pub fn from_project(config: &ProjectConfig) -> Self {
        Self {
            defaults: config.defaults.clone(),
            warn_on_missing_combinations: config.resolution.warn_on_missing_combinations,
            prune_unused_choices: config.resolution.prune_unused_choices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedView {
    pub dimension_values: DimensionValues,
    /// Qualified `<catalog_path>#<column>` references.
    pub indicators: ViewIndicators,
    #[serde(skip_serializing_if = "ChartConfig::is_empty")]
    pub config: ChartConfig,
}

/// The emitted artifact of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCollection {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_selection: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topic_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_view: Option<DimensionValues>,
    pub dimensions: Vec<Dimension>,
    pub views: Vec<ResolvedView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionStats {
    /// Views produced by the expander.
    pub expanded: usize,
    /// Explicit views refining an expanded one.
    pub refined: usize,
    /// Explicit views with no expanded counterpart.
    pub explicit: usize,
    /// Combinations dropped for lack of a backing column.
    pub dropped: usize,
    pub conflicts: usize,
    pub pruned_choices: usize,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub collection: ResolvedCollection,
    pub stats: ResolutionStats,
}

/// Views of a collection before references and configs are resolved.
pub(crate) struct ViewSet {
    pub registry: DimensionRegistry,
    pub views: Vec<View>,
    pub stats: ResolutionStats,
}

/// Collection defaults layered over the project defaults.
pub(crate) fn global_defaults(config: &CollectionConfig, options: &ResolveOptions) -> ChartConfig {
    options.defaults.clone().overlay(config.defaults.clone())
}

/// Builds and validates the view set: expansion, explicit overlay, rule patterns.
pub(crate) fn assemble_views(
    config: &CollectionConfig,
    catalog: &Catalog,
    options: &ResolveOptions,
) -> Result<ViewSet, DomainError> {
    let registry = DimensionRegistry::from_dimensions(config.dimensions.clone())?;
    let mut stats = ResolutionStats::default();
    let mut views = Vec::new();

    if let Some(expand) = &config.expand {
        let mut expand = expand.clone();
        expand
            .warn_on_missing_combinations
            .get_or_insert(options.warn_on_missing_combinations);

        let tables: Vec<&TableDescriptor> = catalog.select(&expand.tables)?;
        let expansion = ViewExpander::expand(&registry, &tables, &expand)?;
        stats.expanded = expansion.views.len();
        stats.dropped = expansion.dropped.len();
        views = expansion.views;
    }

    let mut seen_explicit = BTreeSet::new();
    for explicit in &config.views {
        registry.validate_values(&explicit.dimension_values)?;
        if !seen_explicit.insert(&explicit.dimension_values) {
            return Err(DomainError::DuplicateView(describe_values(
                &explicit.dimension_values,
            )));
        }

        match views
            .iter_mut()
            .find(|v| v.dimension_values == explicit.dimension_values)
        {
            Some(existing) => {
                if !explicit.indicators.is_empty() {
                    existing.indicators = explicit.indicators.clone();
                }
                existing.config = existing.config.clone().overlay(explicit.config.clone());
                stats.refined += 1;
            }
            None => {
                if explicit.indicators.y.is_empty() {
                    return Err(DomainError::InvalidView {
                        view: describe_values(&explicit.dimension_values),
                        reason: "no 'y' indicator and no expanded view to refine".to_string(),
                    });
                }
                views.push(explicit.clone());
                stats.explicit += 1;
            }
        }
    }

    for rule in &config.common_views {
        registry.check_partial(&rule.dimensions)?;
    }

    if views.is_empty() {
        warn!(title = %config.title, "Collection has no views");
    }

    Ok(ViewSet {
        registry,
        views,
        stats,
    })
}

/// Resolves one collection document against the catalog. Pure, no I/O.
#[instrument(skip(config, catalog, options))]
pub fn resolve_collection(
    name: &str,
    config: &CollectionConfig,
    catalog: &Catalog,
    options: &ResolveOptions,
) -> Result<Resolution, DomainError> {
    let ViewSet {
        mut registry,
        views,
        mut stats,
    } = assemble_views(config, catalog, options)?;

    let resolver = ReferenceResolver::new(catalog);
    let defaults = global_defaults(config, options);

    let mut resolved = Vec::with_capacity(views.len());
    for view in &views {
        let indicators = view
            .indicators
            .try_map(|_, reference| resolver.qualify(reference))?;
        let merged = ConfigMerger::resolve_traced(view, &config.common_views, &defaults);
        stats.conflicts += merged.conflicts.len();

        resolved.push(ResolvedView {
            dimension_values: view.dimension_values.clone(),
            indicators,
            config: merged.config,
        });
    }

    if let Some(default_view) = &config.default_view {
        registry.validate_values(default_view)?;
        if !views.iter().any(|v| v.dimension_values == *default_view) {
            return Err(DomainError::not_found("view", describe_values(default_view)));
        }
    }

    if options.prune_unused_choices {
        let removed = registry.prune_unused(&views);
        for (dimension, choice) in &removed {
            debug!(dimension = %dimension, choice = %choice, "Pruned unused choice");
        }
        stats.pruned_choices = removed.len();
    }

    info!(
        collection = name,
        views = resolved.len(),
        dropped = stats.dropped,
        "Collection resolved"
    );

    Ok(Resolution {
        collection: ResolvedCollection {
            name: name.to_string(),
            title: config.title.clone(),
            default_selection: config.default_selection.clone(),
            topic_tags: config.topic_tags.clone(),
            default_view: config.default_view.clone(),
            dimensions: registry.into_dimensions(),
            views: resolved,
        },
        stats,
    })
}
