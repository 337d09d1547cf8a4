// prism-core/src/domain/collection/dimension.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;
use tracing::debug;
use validator::Validate;

use crate::domain::collection::view::View;
use crate::domain::error::DomainError;

/// One concrete value for every dimension, keyed by dimension slug.
/// Ordered map: equal tuples always serialize identically.
pub type DimensionValues = BTreeMap<String, String>;

fn re_slug() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

pub fn is_valid_slug(slug: &str) -> bool {
    re_slug().is_match(slug)
}

/// Renders a tuple as `{a=1, b=2}` for error messages and logs.
pub fn describe_values(values: &DimensionValues) -> String {
    let pairs: Vec<String> = values.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Choice {
    #[validate(length(min = 1, message = "choice slug cannot be empty"))]
    pub slug: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// UI grouping hint (dropdown sections).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Choice {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
            group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Dimension {
    #[validate(length(min = 1, message = "dimension slug cannot be empty"))]
    pub slug: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "a dimension needs at least one choice"), nested)]
    pub choices: Vec<Choice>,
}

impl Dimension {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
            choices,
        }
    }

    pub fn choice(&self, slug: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.slug == slug)
    }

    pub fn has_choice(&self, slug: &str) -> bool {
        self.choice(slug).is_some()
    }

    pub fn choice_slugs(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|c| c.slug.as_str())
    }
}

/// Named dimensions of a collection, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    dimensions: Vec<Dimension>,
    index: HashMap<String, usize>,
}

impl DimensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dimensions(dimensions: Vec<Dimension>) -> Result<Self, DomainError> {
        let mut registry = Self::new();
        for dimension in dimensions {
            registry.register(dimension)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, dimension: Dimension) -> Result<(), DomainError> {
        if !is_valid_slug(&dimension.slug) {
            return Err(DomainError::InvalidSlug(dimension.slug));
        }
        if self.index.contains_key(&dimension.slug) {
            return Err(DomainError::DuplicateSlug {
                kind: "dimension",
                slug: dimension.slug,
            });
        }
        if dimension.choices.is_empty() {
            return Err(DomainError::InvalidDimension {
                slug: dimension.slug,
                reason: "no choices declared".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for choice in &dimension.choices {
            if !is_valid_slug(&choice.slug) {
                return Err(DomainError::InvalidSlug(choice.slug.clone()));
            }
            if !seen.insert(choice.slug.as_str()) {
                return Err(DomainError::DuplicateSlug {
                    kind: "choice",
                    slug: format!("{}.{}", dimension.slug, choice.slug),
                });
            }
        }

        debug!(
            dimension = %dimension.slug,
            choices = dimension.choices.len(),
            "Registered dimension"
        );
        self.index
            .insert(dimension.slug.clone(), self.dimensions.len());
        self.dimensions.push(dimension);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Result<&Dimension, DomainError> {
        self.index
            .get(slug)
            .map(|&i| &self.dimensions[i])
            .ok_or_else(|| DomainError::not_found("dimension", slug))
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn into_dimensions(self) -> Vec<Dimension> {
        self.dimensions
    }

    /// Checks a full tuple: keys equal the registered slugs, choices exist.
    pub fn validate_values(&self, values: &DimensionValues) -> Result<(), DomainError> {
        let missing: Vec<&str> = self.slugs().filter(|s| !values.contains_key(*s)).collect();
        let unexpected: Vec<&str> = values
            .keys()
            .map(String::as_str)
            .filter(|k| !self.contains(k))
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            let mut reasons = Vec::new();
            if !missing.is_empty() {
                reasons.push(format!("missing [{}]", missing.join(", ")));
            }
            if !unexpected.is_empty() {
                reasons.push(format!("unexpected [{}]", unexpected.join(", ")));
            }
            return Err(DomainError::IncompleteView {
                view: describe_values(values),
                reason: reasons.join("; "),
            });
        }

        self.check_partial(values)
    }

    /// Checks a partial tuple (rule patterns, filters): every key and choice exists.
    pub fn check_partial(&self, values: &DimensionValues) -> Result<(), DomainError> {
        for (dim_slug, choice_slug) in values {
            let dimension = self.get(dim_slug)?;
            if !dimension.has_choice(choice_slug) {
                return Err(DomainError::not_found(
                    "choice",
                    format!("{}.{}", dim_slug, choice_slug),
                ));
            }
        }
        Ok(())
    }

    /// Drops choices no view uses. Returns the removed `(dimension, choice)` pairs.
    /// Dimensions always keep at least the choices their views reference.
    pub fn prune_unused(&mut self, views: &[View]) -> Vec<(String, String)> {
        let mut removed = Vec::new();
        for dimension in &mut self.dimensions {
            let used: BTreeSet<&str> = views
                .iter()
                .filter_map(|v| v.dimension_values.get(&dimension.slug))
                .map(String::as_str)
                .collect();
            if used.is_empty() {
                continue;
            }
            let dim_slug = dimension.slug.clone();
            dimension.choices.retain(|c| {
                let keep = used.contains(c.slug.as_str());
                if !keep {
                    removed.push((dim_slug.clone(), c.slug.clone()));
                }
                keep
            });
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn metric() -> Dimension {
        Dimension::new(
            "metric",
            "Metric",
            vec![
                Choice::new("absolute", "Absolute"),
                Choice::new("per_capita", "Per capita"),
            ],
        )
    }

    fn period() -> Dimension {
        Dimension::new("period", "Period", vec![Choice::new("weekly", "Weekly")])
    }

    #[test]
    fn test_register_preserves_order() -> Result<()> {
        let registry = DimensionRegistry::from_dimensions(vec![period(), metric()])?;
        let slugs: Vec<&str> = registry.slugs().collect();
        assert_eq!(slugs, vec!["period", "metric"]);
        assert_eq!(registry.get("metric")?.choices.len(), 2);
        Ok(())
    }

    #[test]
    fn test_register_duplicate_slug() {
        let mut registry = DimensionRegistry::new();
        registry.register(metric()).unwrap();
        let err = registry.register(metric()).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateSlug { kind: "dimension", .. }));
    }

    #[test]
    fn test_register_rejects_empty_choices_and_bad_slugs() {
        let mut registry = DimensionRegistry::new();
        let empty = Dimension::new("sex", "Sex", vec![]);
        assert!(matches!(
            registry.register(empty),
            Err(DomainError::InvalidDimension { .. })
        ));

        let bad = Dimension::new("has space", "Bad", vec![Choice::new("a", "A")]);
        assert!(matches!(
            registry.register(bad),
            Err(DomainError::InvalidSlug(_))
        ));

        let dup_choice = Dimension::new(
            "age",
            "Age",
            vec![Choice::new("all", "All"), Choice::new("all", "All again")],
        );
        assert!(matches!(
            registry.register(dup_choice),
            Err(DomainError::DuplicateSlug { kind: "choice", .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_missing_dimension() {
        let registry = DimensionRegistry::from_dimensions(vec![metric()]).unwrap();
        assert_eq!(
            registry.get("sex").unwrap_err(),
            DomainError::not_found("dimension", "sex")
        );
    }

    #[test]
    fn test_validate_values() {
        let registry = DimensionRegistry::from_dimensions(vec![period(), metric()]).unwrap();

        let mut values = DimensionValues::new();
        values.insert("period".into(), "weekly".into());
        assert!(matches!(
            registry.validate_values(&values),
            Err(DomainError::IncompleteView { .. })
        ));

        values.insert("metric".into(), "per_capita".into());
        assert!(registry.validate_values(&values).is_ok());

        values.insert("metric".into(), "per_million".into());
        assert!(matches!(
            registry.validate_values(&values),
            Err(DomainError::NotFound { kind: "choice", .. })
        ));

        values.insert("metric".into(), "absolute".into());
        values.insert("sex".into(), "female".into());
        match registry.validate_values(&values) {
            Err(DomainError::IncompleteView { reason, .. }) => {
                assert!(reason.contains("unexpected [sex]"))
            }
            other => panic!("Expected IncompleteView, got {:?}", other),
        }
    }

    #[test]
    fn test_prune_unused_choices() {
        let mut registry = DimensionRegistry::from_dimensions(vec![period(), metric()]).unwrap();
        let mut values = DimensionValues::new();
        values.insert("period".into(), "weekly".into());
        values.insert("metric".into(), "absolute".into());
        let views = vec![View::new(values)];

        let removed = registry.prune_unused(&views);
        assert_eq!(
            removed,
            vec![("metric".to_string(), "per_capita".to_string())]
        );
        assert_eq!(registry.get("metric").unwrap().choices.len(), 1);
    }

    #[test]
    fn test_describe_values_is_sorted() {
        let mut values = DimensionValues::new();
        values.insert("period".into(), "weekly".into());
        values.insert("metric".into(), "absolute".into());
        assert_eq!(describe_values(&values), "{metric=absolute, period=weekly}");
    }
}
