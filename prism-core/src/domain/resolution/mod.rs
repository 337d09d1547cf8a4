// prism-core/src/domain/resolution/mod.rs

pub mod expander;
pub mod merger;

pub use expander::{ColumnNaming, Expansion, ExpansionConfig, ViewExpander};
pub use merger::{ConfigMerger, ConfigOrigin, ResolvedConfig, RuleConflict};
