// prism-core/src/domain/collection/view.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::collection::chart::ChartConfig;
use crate::domain::collection::dimension::DimensionValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorRole {
    Y,
    X,
    Size,
    Color,
}

impl IndicatorRole {
    pub const ALL: [IndicatorRole; 4] = [Self::Y, Self::X, Self::Size, Self::Color];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Y => "y",
            Self::X => "x",
            Self::Size => "size",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for IndicatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Indicator references per chart role. Each role takes a single reference or a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewIndicators {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub size: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,
}

impl ViewIndicators {
    pub fn with_y(reference: impl Into<String>) -> Self {
        Self {
            y: vec![reference.into()],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        IndicatorRole::ALL.iter().all(|r| self.role(*r).is_empty())
    }

    pub fn role(&self, role: IndicatorRole) -> &[String] {
        match role {
            IndicatorRole::Y => &self.y,
            IndicatorRole::X => &self.x,
            IndicatorRole::Size => &self.size,
            IndicatorRole::Color => &self.color,
        }
    }

    fn role_mut(&mut self, role: IndicatorRole) -> &mut Vec<String> {
        match role {
            IndicatorRole::Y => &mut self.y,
            IndicatorRole::X => &mut self.x,
            IndicatorRole::Size => &mut self.size,
            IndicatorRole::Color => &mut self.color,
        }
    }

    /// All references, role by role.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorRole, &str)> {
        IndicatorRole::ALL
            .into_iter()
            .flat_map(move |r| self.role(r).iter().map(move |s| (r, s.as_str())))
    }

    /// Rewrites every reference, keeping roles and order.
    pub fn try_map<E, F>(&self, mut f: F) -> Result<ViewIndicators, E>
    where
        F: FnMut(IndicatorRole, &str) -> Result<String, E>,
    {
        let mut out = ViewIndicators::default();
        for (role, reference) in self.iter() {
            let mapped = f(role, reference)?;
            out.role_mut(role).push(mapped);
        }
        Ok(out)
    }
}

/// One concrete combination of dimension choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct View {
    #[serde(alias = "dimensions")]
    pub dimension_values: DimensionValues,

    #[serde(default, skip_serializing_if = "ViewIndicators::is_empty")]
    pub indicators: ViewIndicators,

    #[serde(default, skip_serializing_if = "ChartConfig::is_empty")]
    pub config: ChartConfig,
}

impl View {
    pub fn new(dimension_values: DimensionValues) -> Self {
        Self {
            dimension_values,
            ..Default::default()
        }
    }
}
