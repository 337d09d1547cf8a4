// prism-core/src/domain/resolution/expander.rs
//
// Expands dimension choices into concrete views backed by catalog columns.

use minijinja::{Environment, Template, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

use crate::domain::catalog::TableDescriptor;
use crate::domain::collection::{
    ChartConfig, DimensionRegistry, DimensionValues, View, ViewIndicators, describe_values,
};
use crate::domain::error::DomainError;

fn default_separator() -> String {
    "_".to_string()
}

/// How a dimension tuple maps onto a column of the source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ColumnNaming {
    /// Fragments joined by `separator`, in `order` (declaration order when empty).
    Concat {
        #[serde(default)]
        order: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// A minijinja template, e.g. `{{ period }}_deaths_{{ metric }}`.
    /// Empty segments between `separator`s are collapsed after rendering.
    Template {
        template: String,
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// Columns declare the tuple they represent in their `dimensions` metadata.
    Metadata,
}

impl ColumnNaming {
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            separator: default_separator(),
        }
    }
}

impl Default for ColumnNaming {
    fn default() -> Self {
        Self::Concat {
            order: Vec::new(),
            separator: default_separator(),
        }
    }
}

/// The `expand` block of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpansionConfig {
    #[serde(default)]
    pub naming: ColumnNaming,

    /// Column fragment per `dimension -> choice`. Defaults to the choice slug.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fragments: BTreeMap<String, BTreeMap<String, String>>,

    /// Restricts dimensions to a subset of their choices (filtered product).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub choices: BTreeMap<String, Vec<String>>,

    /// Source tables feeding the expansion. Empty means every catalog table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_on_missing_combinations: Option<bool>,

    /// Config given to every expanded view.
    #[serde(default, skip_serializing_if = "ChartConfig::is_empty")]
    pub config: ChartConfig,
}

/// Result of an expansion: kept views plus the tuples dropped for lack of data.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub views: Vec<View>,
    pub dropped: Vec<DimensionValues>,
}

enum Namer<'env, 'source> {
    Concat {
        order: Vec<String>,
        separator: String,
    },
    Template {
        template: Template<'env, 'source>,
        separator: String,
    },
    Metadata,
}

pub struct ViewExpander;

impl ViewExpander {
    #[instrument(skip_all, fields(dimensions = registry.len(), tables = tables.len()))]
    pub fn expand(
        registry: &DimensionRegistry,
        tables: &[&TableDescriptor],
        options: &ExpansionConfig,
    ) -> Result<Expansion, DomainError> {
        if registry.is_empty() {
            return Ok(Expansion::default());
        }

        let axes = Self::axes(registry, &options.choices)?;
        Self::check_fragments(registry, &options.fragments)?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        let namer = match &options.naming {
            ColumnNaming::Concat { order, separator } => Namer::Concat {
                order: Self::concat_order(registry, order)?,
                separator: separator.clone(),
            },
            ColumnNaming::Template {
                template,
                separator,
            } => Namer::Template {
                template: env
                    .template_from_str(template)
                    .map_err(|e| DomainError::InvalidNaming(e.to_string()))?,
                separator: separator.clone(),
            },
            ColumnNaming::Metadata => Namer::Metadata,
        };

        let warn_missing = options.warn_on_missing_combinations.unwrap_or(false);
        let mut expansion = Expansion::default();
        // qualified column -> tuple that claimed it
        let mut claimed: BTreeMap<String, DimensionValues> = BTreeMap::new();

        for values in Self::cartesian(&axes) {
            let hits = Self::find_columns(&namer, &options.fragments, tables, &values)?;

            match hits.as_slice() {
                [] => {
                    if warn_missing {
                        warn!(view = %describe_values(&values), "No backing column, view dropped");
                    } else {
                        debug!(view = %describe_values(&values), "No backing column, view dropped");
                    }
                    expansion.dropped.push(values);
                }
                [(table, column)] => {
                    let reference = table.qualify(column);
                    if let Some(previous) = claimed.get(&reference) {
                        return Err(DomainError::AmbiguousIndicator {
                            target: format!("column '{}'", reference),
                            candidates: vec![describe_values(previous), describe_values(&values)],
                        });
                    }
                    claimed.insert(reference.clone(), values.clone());
                    expansion.views.push(View {
                        dimension_values: values,
                        indicators: ViewIndicators::with_y(reference),
                        config: options.config.clone(),
                    });
                }
                many => {
                    return Err(DomainError::AmbiguousIndicator {
                        target: format!("view {}", describe_values(&values)),
                        candidates: many.iter().map(|(t, c)| t.qualify(c)).collect(),
                    });
                }
            }
        }

        info!(
            views = expansion.views.len(),
            dropped = expansion.dropped.len(),
            "Expanded dimension choices"
        );
        Ok(expansion)
    }

    /// One axis per dimension, in declaration order, honouring the choice filter.
    fn axes(
        registry: &DimensionRegistry,
        filter: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<(String, Vec<String>)>, DomainError> {
        for (dim_slug, choices) in filter {
            let dimension = registry.get(dim_slug)?;
            if let Some(missing) = choices.iter().find(|c| !dimension.has_choice(c)) {
                return Err(DomainError::not_found(
                    "choice",
                    format!("{}.{}", dim_slug, missing),
                ));
            }
        }

        Ok(registry
            .iter()
            .map(|dimension| {
                let choices = dimension
                    .choice_slugs()
                    .filter(|c| {
                        filter
                            .get(&dimension.slug)
                            .is_none_or(|allowed| allowed.iter().any(|a| a.as_str() == *c))
                    })
                    .map(str::to_string)
                    .collect();
                (dimension.slug.clone(), choices)
            })
            .collect())
    }

    fn check_fragments(
        registry: &DimensionRegistry,
        fragments: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<(), DomainError> {
        for (dim_slug, per_choice) in fragments {
            let dimension = registry.get(dim_slug)?;
            if let Some(missing) = per_choice.keys().find(|c| !dimension.has_choice(c)) {
                return Err(DomainError::not_found(
                    "choice",
                    format!("{}.{}", dim_slug, missing),
                ));
            }
        }
        Ok(())
    }

    fn concat_order(
        registry: &DimensionRegistry,
        order: &[String],
    ) -> Result<Vec<String>, DomainError> {
        if order.is_empty() {
            return Ok(registry.slugs().map(str::to_string).collect());
        }
        for slug in order {
            registry.get(slug)?;
        }
        // Every dimension exactly once, or distinct tuples share a column name.
        let distinct: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        if distinct.len() != order.len() || order.len() != registry.len() {
            return Err(DomainError::InvalidNaming(format!(
                "concat order [{}] must list each of [{}] exactly once",
                order.join(", "),
                registry.slugs().collect::<Vec<_>>().join(", ")
            )));
        }
        Ok(order.to_vec())
    }

    /// Dimension-major product: the first declared dimension varies slowest.
    fn cartesian(axes: &[(String, Vec<String>)]) -> Vec<DimensionValues> {
        let mut combos = vec![DimensionValues::new()];
        for (slug, choices) in axes {
            combos = combos
                .into_iter()
                .flat_map(|partial| {
                    choices.iter().map(move |choice| {
                        let mut next = partial.clone();
                        next.insert(slug.clone(), choice.clone());
                        next
                    })
                })
                .collect();
        }
        combos
    }

    fn fragment<'a>(
        fragments: &'a BTreeMap<String, BTreeMap<String, String>>,
        dimension: &str,
        choice: &'a str,
    ) -> &'a str {
        fragments
            .get(dimension)
            .and_then(|m| m.get(choice))
            .map(String::as_str)
            .unwrap_or(choice)
    }

    /// Drops empty segments so that empty fragments leave no dangling separators.
    fn normalize(name: &str, separator: &str) -> String {
        if separator.is_empty() {
            return name.trim().to_string();
        }
        name.trim()
            .split(separator)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn column_name(
        namer: &Namer<'_, '_>,
        fragments: &BTreeMap<String, BTreeMap<String, String>>,
        values: &DimensionValues,
    ) -> Result<Option<String>, DomainError> {
        match namer {
            Namer::Concat { order, separator } => {
                let parts: Vec<&str> = order
                    .iter()
                    .filter_map(|dim| values.get(dim).map(|c| Self::fragment(fragments, dim, c)))
                    .collect();
                Ok(Some(Self::normalize(&parts.join(separator), separator)))
            }
            Namer::Template {
                template,
                separator,
            } => {
                let context: BTreeMap<&str, &str> = values
                    .iter()
                    .map(|(dim, c)| (dim.as_str(), Self::fragment(fragments, dim, c)))
                    .collect();
                let rendered = template
                    .render(&context)
                    .map_err(|e| DomainError::InvalidNaming(e.to_string()))?;
                Ok(Some(Self::normalize(&rendered, separator)))
            }
            Namer::Metadata => Ok(None),
        }
    }

    fn find_columns<'t>(
        namer: &Namer<'_, '_>,
        fragments: &BTreeMap<String, BTreeMap<String, String>>,
        tables: &[&'t TableDescriptor],
        values: &DimensionValues,
    ) -> Result<Vec<(&'t TableDescriptor, String)>, DomainError> {
        let hits = match Self::column_name(namer, fragments, values)? {
            Some(name) => tables
                .iter()
                .copied()
                .filter(|t| t.has_column(&name))
                .map(|t| (t, name.clone()))
                .collect(),
            None => tables
                .iter()
                .copied()
                .flat_map(|t| {
                    t.columns
                        .iter()
                        .filter(move |c| c.dimensions == *values)
                        .map(move |c| (t, c.name.clone()))
                })
                .collect(),
        };
        Ok(hits)
    }
}
