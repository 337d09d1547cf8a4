// prism-core/src/domain/collection/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::collection::chart::ChartConfig;
use crate::domain::collection::dimension::{Dimension, DimensionValues};
use crate::domain::collection::rule::CommonViewRule;
use crate::domain::collection::view::View;
use crate::domain::resolution::expander::ExpansionConfig;

/// The declarative document describing one collection (`*.mdim.yml`).
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    #[validate(length(min = 1, message = "collection title cannot be empty"))]
    pub title: String,

    #[serde(default)]
    pub default_selection: Vec<String>,

    #[serde(default)]
    pub topic_tags: Vec<String>,

    #[validate(length(min = 1, message = "a collection needs at least one dimension"), nested)]
    pub dimensions: Vec<Dimension>,

    /// Explicit views. They either refine an expanded view with the same
    /// tuple or add a new one.
    #[serde(default)]
    pub views: Vec<View>,

    #[serde(default)]
    pub common_views: Vec<CommonViewRule>,

    /// Collection-wide defaults, layered over the project defaults.
    #[serde(default, skip_serializing_if = "ChartConfig::is_empty")]
    pub defaults: ChartConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<ExpansionConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view: Option<DimensionValues>,
}
