// prism-core/src/application/explain.rs

use serde::Serialize;
use serde_json::Value;

use crate::application::resolve::{ResolveOptions, assemble_views, global_defaults};
use crate::domain::catalog::{Catalog, ReferenceResolver};
use crate::domain::collection::{CollectionConfig, DimensionValues, IndicatorRole, describe_values};
use crate::domain::error::DomainError;
use crate::domain::resolution::{ConfigMerger, ConfigOrigin, RuleConflict};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedIndicator {
    pub role: IndicatorRole,
    pub reference: String,
    pub catalog_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedKey {
    pub key: String,
    pub value: Value,
    pub origin: ConfigOrigin,
}

/// How one view got its indicators and config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewExplanation {
    pub dimension_values: DimensionValues,
    pub indicators: Vec<ExplainedIndicator>,
    /// Indices of the matching `common_views`, in application order.
    pub matching_rules: Vec<usize>,
    pub keys: Vec<ExplainedKey>,
    pub conflicts: Vec<RuleConflict>,
}

/// Parses `period=weekly,metric=absolute` into a tuple.
pub fn parse_selector(selector: &str) -> Result<DimensionValues, DomainError> {
    let mut values = DimensionValues::new();
    for pair in selector.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (dimension, choice) = pair
            .split_once('=')
            .map(|(d, c)| (d.trim(), c.trim()))
            .filter(|(d, c)| !d.is_empty() && !c.is_empty())
            .ok_or_else(|| DomainError::InvalidView {
                view: selector.to_string(),
                reason: format!("expected 'dimension=choice', got '{}'", pair),
            })?;
        values.insert(dimension.to_string(), choice.to_string());
    }
    Ok(values)
}

pub fn explain_view(
    config: &CollectionConfig,
    catalog: &Catalog,
    options: &ResolveOptions,
    values: &DimensionValues,
) -> Result<ViewExplanation, DomainError> {
    let set = assemble_views(config, catalog, options)?;
    set.registry.validate_values(values)?;

    let view = set
        .views
        .iter()
        .find(|v| v.dimension_values == *values)
        .ok_or_else(|| DomainError::not_found("view", describe_values(values)))?;

    let resolver = ReferenceResolver::new(catalog);
    let indicators = view
        .indicators
        .iter()
        .map(|(role, reference)| {
            resolver.qualify(reference).map(|catalog_path| ExplainedIndicator {
                role,
                reference: reference.to_string(),
                catalog_path,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let matching_rules = ConfigMerger::matching_rules(values, &config.common_views)
        .into_iter()
        .map(|(index, _)| index)
        .collect();

    let traced = ConfigMerger::resolve_traced(
        view,
        &config.common_views,
        &global_defaults(config, options),
    );
    let keys = traced
        .config
        .to_map()
        .into_iter()
        .map(|(key, value)| ExplainedKey {
            origin: traced.origins.get(&key).copied().unwrap_or(ConfigOrigin::Default),
            key,
            value,
        })
        .collect();

    Ok(ViewExplanation {
        dimension_values: values.clone(),
        indicators,
        matching_rules,
        keys,
        conflicts: traced.conflicts,
    })
}
