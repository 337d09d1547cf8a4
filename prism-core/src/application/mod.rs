// prism-core/src/application/mod.rs

pub mod clean;
pub mod explain;
pub mod pipeline;
pub mod resolve;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI imports use cases from here without knowing the file layout.

pub use clean::clean_project;
pub use explain::{ExplainedIndicator, ExplainedKey, ViewExplanation, explain_view, parse_selector};
pub use pipeline::{BuildResult, CollectionReport, OutputStatus, build_project};
pub use resolve::{
    Resolution, ResolutionStats, ResolveOptions, ResolvedCollection, ResolvedView,
    resolve_collection,
};
