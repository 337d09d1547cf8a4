// prism-core/src/domain/resolution/merger.rs
//
// Layered config resolution: defaults -> common rules (by specificity) -> view.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::domain::collection::{
    ChartConfig, CommonViewRule, DimensionValues, View, describe_values,
};

/// Layer a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum ConfigOrigin {
    Default,
    CommonRule { index: usize },
    View,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::CommonRule { index } => write!(f, "common_views[{}]", index),
            Self::View => write!(f, "view"),
        }
    }
}

/// Two matching rules of equal specificity setting the same key differently.
/// The later declaration (`winner`) is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConflict {
    pub key: String,
    pub specificity: usize,
    pub overridden: usize,
    pub winner: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: ChartConfig,
    pub origins: BTreeMap<String, ConfigOrigin>,
    pub conflicts: Vec<RuleConflict>,
}

pub struct ConfigMerger;

impl ConfigMerger {
    pub fn resolve(view: &View, rules: &[CommonViewRule], defaults: &ChartConfig) -> ChartConfig {
        Self::resolve_traced(view, rules, defaults).config
    }

    /// Matching rules in application order: ascending specificity, then declaration order.
    pub fn matching_rules<'r>(
        values: &DimensionValues,
        rules: &'r [CommonViewRule],
    ) -> Vec<(usize, &'r CommonViewRule)> {
        let mut matching: Vec<(usize, &CommonViewRule)> = rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(values))
            .collect();
        matching.sort_by_key(|(index, rule)| (rule.specificity(), *index));
        matching
    }

    pub fn resolve_traced(
        view: &View,
        rules: &[CommonViewRule],
        defaults: &ChartConfig,
    ) -> ResolvedConfig {
        let mut config = defaults.clone();
        let mut origins = BTreeMap::new();
        for key in defaults.keys() {
            origins.insert(key, ConfigOrigin::Default);
        }

        let mut conflicts = Vec::new();
        // key -> (specificity, rule index, value) of the last rule that set it
        let mut setters: BTreeMap<String, (usize, usize, Value)> = BTreeMap::new();

        for (index, rule) in Self::matching_rules(&view.dimension_values, rules) {
            let specificity = rule.specificity();
            for (key, value) in rule.config.to_map() {
                if let Some((prev_specificity, prev_index, prev_value)) = setters.get(&key)
                    && *prev_specificity == specificity
                    && *prev_value != value
                {
                    warn!(
                        view = %describe_values(&view.dimension_values),
                        key = %key,
                        overridden = *prev_index,
                        winner = index,
                        "Common view rules of equal specificity conflict, last declared wins"
                    );
                    conflicts.push(RuleConflict {
                        key: key.clone(),
                        specificity,
                        overridden: *prev_index,
                        winner: index,
                    });
                }
                origins.insert(key.clone(), ConfigOrigin::CommonRule { index });
                setters.insert(key, (specificity, index, value));
            }
            config = config.overlay(rule.config.clone());
        }

        for key in view.config.keys() {
            origins.insert(key, ConfigOrigin::View);
        }
        config = config.overlay(view.config.clone());

        ResolvedConfig {
            config,
            origins,
            conflicts,
        }
    }
}
