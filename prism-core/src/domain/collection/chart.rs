// prism-core/src/domain/collection/chart.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    LineChart,
    ScatterPlot,
    StackedArea,
    DiscreteBar,
    StackedDiscreteBar,
    SlopeChart,
    StackedBar,
    Marimekko,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTab {
    Chart,
    Map,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddCountryMode {
    AddCountry,
    ChangeCountry,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackMode {
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Linear,
    Log,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AxisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<ScaleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_change_scale_type: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKeyword {
    Earliest,
    Latest,
}

/// A year (or day offset) or one of the `earliest` / `latest` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeBound {
    Point(i64),
    Keyword(TimeKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MapRegion {
    World,
    Europe,
    Africa,
    Asia,
    NorthAmerica,
    SouthAmerica,
    Oceania,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<MapRegion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_tolerance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_timeline: Option<bool>,
    /// Binning and colours are passed through to the renderer as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<Map<String, Value>>,
}

/// Which annotation fields the renderer leaves out of the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnnotationFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_in_prefix: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedQuestion {
    pub text: String,
    pub url: String,
}

/// Presentation overrides for a chart.
///
/// Every key is optional and an unset key never serializes, so a config is
/// exactly the set of keys an author wrote. Unknown keys are rejected at load
/// time instead of being silently ignored by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_types: Option<Vec<ChartType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<ChartTab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_map_tab: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_entity_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_country_mode: Option<AddCountryMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_mode: Option<StackMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_relative_to_population: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<TimeBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<TimeBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_annotation_fields_in_title: Option<AnnotationFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type_plural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_facet_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_questions: Option<Vec<RelatedQuestion>>,
}

impl ChartConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge: every key set on `top` wins, the rest is kept from `self`.
    pub fn overlay(self, top: ChartConfig) -> ChartConfig {
        ChartConfig {
            title: top.title.or(self.title),
            subtitle: top.subtitle.or(self.subtitle),
            note: top.note.or(self.note),
            source_desc: top.source_desc.or(self.source_desc),
            chart_types: top.chart_types.or(self.chart_types),
            tab: top.tab.or(self.tab),
            has_map_tab: top.has_map_tab.or(self.has_map_tab),
            y_axis: top.y_axis.or(self.y_axis),
            selected_entity_names: top.selected_entity_names.or(self.selected_entity_names),
            add_country_mode: top.add_country_mode.or(self.add_country_mode),
            stack_mode: top.stack_mode.or(self.stack_mode),
            hide_relative_to_population: top
                .hide_relative_to_population
                .or(self.hide_relative_to_population),
            origin_url: top.origin_url.or(self.origin_url),
            min_time: top.min_time.or(self.min_time),
            max_time: top.max_time.or(self.max_time),
            x_axis: top.x_axis.or(self.x_axis),
            map: top.map.or(self.map),
            hide_legend: top.hide_legend.or(self.hide_legend),
            hide_annotation_fields_in_title: top
                .hide_annotation_fields_in_title
                .or(self.hide_annotation_fields_in_title),
            entity_type: top.entity_type.or(self.entity_type),
            entity_type_plural: top.entity_type_plural.or(self.entity_type_plural),
            hide_facet_control: top.hide_facet_control.or(self.hide_facet_control),
            related_questions: top.related_questions.or(self.related_questions),
        }
    }

    /// The set keys with their serialized values, keyed by their YAML names.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.to_map().keys().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_specific_wins_and_keys_union() {
        let base = ChartConfig {
            title: Some("Deaths".into()),
            has_map_tab: Some(true),
            ..Default::default()
        };
        let top = ChartConfig {
            title: Some("Deaths per million".into()),
            tab: Some(ChartTab::Map),
            ..Default::default()
        };

        let merged = base.overlay(top);
        assert_eq!(merged.title.as_deref(), Some("Deaths per million"));
        assert_eq!(merged.has_map_tab, Some(true));
        assert_eq!(merged.tab, Some(ChartTab::Map));
    }

    #[test]
    fn test_overlay_replaces_axis_as_a_unit() {
        let base = ChartConfig {
            y_axis: Some(AxisConfig {
                min: Some(0.0),
                max: Some(100.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let top = ChartConfig {
            y_axis: Some(AxisConfig {
                scale_type: Some(ScaleType::Log),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.overlay(top);
        let axis = merged.y_axis.unwrap();
        assert_eq!(axis.min, None);
        assert_eq!(axis.scale_type, Some(ScaleType::Log));
    }

    #[test]
    fn test_deserialize_camel_case_yaml() {
        let yaml = r#"
title: Weekly deaths
hasMapTab: true
chartTypes: [LineChart, DiscreteBar]
yAxis:
  min: 0
addCountryMode: change-country
"#;
        let config: ChartConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.has_map_tab, Some(true));
        assert_eq!(
            config.chart_types,
            Some(vec![ChartType::LineChart, ChartType::DiscreteBar])
        );
        assert_eq!(config.add_country_mode, Some(AddCountryMode::ChangeCountry));
        assert_eq!(config.y_axis.unwrap().min, Some(0.0));
    }

    #[test]
    fn test_map_time_and_annotation_keys() {
        let yaml = r#"
originUrl: /covid
minTime: 2020
maxTime: latest
hideLegend: true
hideAnnotationFieldsInTitle:
  time: true
  changeInPrefix: true
map:
  columnSlug: weekly_deaths
  region: Europe
  time: latest
  colorScale:
    binningStrategy: manual
    customNumericValues: [0, 10, 100]
relatedQuestions:
  - text: How are deaths counted?
    url: https://example.org/deaths
"#;
        let config: ChartConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.origin_url.as_deref(), Some("/covid"));
        assert_eq!(config.min_time, Some(TimeBound::Point(2020)));
        assert_eq!(config.max_time, Some(TimeBound::Keyword(TimeKeyword::Latest)));
        assert_eq!(
            config.hide_annotation_fields_in_title,
            Some(AnnotationFields {
                time: Some(true),
                change_in_prefix: Some(true),
                ..Default::default()
            })
        );
        let map = config.map.clone().unwrap();
        assert_eq!(map.region, Some(MapRegion::Europe));
        assert_eq!(map.time, Some(TimeBound::Keyword(TimeKeyword::Latest)));
        assert_eq!(map.color_scale.unwrap()["binningStrategy"], "manual");

        let keys = config.keys();
        for key in ["originUrl", "minTime", "maxTime", "map", "hideAnnotationFieldsInTitle"] {
            assert!(keys.contains(&key.to_string()), "missing {}", key);
        }
        assert_eq!(config.to_map()["maxTime"], "latest");
        assert_eq!(config.to_map()["minTime"], 2020);

        let bad = "map:\n  colmnSlug: weekly_deaths\n";
        assert!(serde_yaml::from_str::<ChartConfig>(bad).is_err());
    }

    #[test]
    fn test_overlay_carries_map_and_time_bounds() {
        let base = ChartConfig {
            min_time: Some(TimeBound::Point(2020)),
            map: Some(MapConfig {
                region: Some(MapRegion::World),
                ..Default::default()
            }),
            ..Default::default()
        };
        let top = ChartConfig {
            map: Some(MapConfig {
                hide_timeline: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.overlay(top);
        assert_eq!(merged.min_time, Some(TimeBound::Point(2020)));
        let map = merged.map.unwrap();
        assert_eq!(map.region, None);
        assert_eq!(map.hide_timeline, Some(true));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "titel: Typo\n";
        assert!(serde_yaml::from_str::<ChartConfig>(yaml).is_err());
    }

    #[test]
    fn test_to_map_only_contains_set_keys() {
        let config = ChartConfig {
            subtitle: Some("Per week".into()),
            has_map_tab: Some(false),
            ..Default::default()
        };
        assert_eq!(config.keys(), vec!["hasMapTab", "subtitle"]);
        assert!(ChartConfig::default().is_empty());
        assert!(!config.is_empty());
    }
}
