// prism-core/src/domain/collection/rule.rs

use serde::{Deserialize, Serialize};

use crate::domain::collection::chart::ChartConfig;
use crate::domain::collection::dimension::DimensionValues;

/// Config override applied to every view matching a (possibly partial) tuple.
/// An empty pattern matches every view of the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonViewRule {
    #[serde(default)]
    pub dimensions: DimensionValues,

    #[serde(default)]
    pub config: ChartConfig,
}

impl CommonViewRule {
    pub fn new(dimensions: DimensionValues, config: ChartConfig) -> Self {
        Self { dimensions, config }
    }

    /// Every key/value pair of the pattern must match the view exactly.
    pub fn matches(&self, values: &DimensionValues) -> bool {
        self.dimensions
            .iter()
            .all(|(k, v)| values.get(k).is_some_and(|actual| actual == v))
    }

    /// Number of constrained dimensions.
    pub fn specificity(&self) -> usize {
        self.dimensions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> DimensionValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_rule_matching() {
        let view = values(&[("indicator", "age_structure"), ("sex", "female")]);

        let all = CommonViewRule::default();
        assert!(all.matches(&view));
        assert_eq!(all.specificity(), 0);

        let partial = CommonViewRule::new(
            values(&[("indicator", "age_structure")]),
            ChartConfig::default(),
        );
        assert!(partial.matches(&view));

        let other = CommonViewRule::new(values(&[("sex", "male")]), ChartConfig::default());
        assert!(!other.matches(&view));

        let unknown_dim =
            CommonViewRule::new(values(&[("age", "all")]), ChartConfig::default());
        assert!(!unknown_dim.matches(&view));
    }
}
