// prism-core/src/domain/collection/mod.rs

pub mod chart;
pub mod configuration;
pub mod dimension;
pub mod rule;
pub mod view;

pub use chart::{
    AddCountryMode, AnnotationFields, AxisConfig, ChartConfig, ChartTab, ChartType, MapConfig,
    MapRegion, RelatedQuestion, ScaleType, StackMode, TimeBound, TimeKeyword,
};
pub use configuration::CollectionConfig;
pub use dimension::{Choice, Dimension, DimensionRegistry, DimensionValues, describe_values};
pub use rule::CommonViewRule;
pub use view::{IndicatorRole, View, ViewIndicators};
