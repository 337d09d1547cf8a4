// prism-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    // --- REGISTRY ---
    #[error("Duplicate {kind} slug '{slug}'")]
    #[diagnostic(
        code(prism::domain::duplicate_slug),
        help("Slugs must be unique within their scope.")
    )]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("{kind} '{slug}' not found")]
    #[diagnostic(code(prism::domain::not_found))]
    NotFound { kind: &'static str, slug: String },

    #[error("Invalid slug '{0}'")]
    #[diagnostic(
        code(prism::domain::invalid_slug),
        help("Use letters, digits, '_' or '-', starting with a letter or digit.")
    )]
    InvalidSlug(String),

    #[error("Dimension '{slug}' is invalid: {reason}")]
    #[diagnostic(code(prism::domain::invalid_dimension))]
    InvalidDimension { slug: String, reason: String },

    // --- VIEWS ---
    #[error("View {view} does not match the declared dimensions: {reason}")]
    #[diagnostic(
        code(prism::domain::incomplete_view),
        help("A view must pick exactly one choice for every declared dimension.")
    )]
    IncompleteView { view: String, reason: String },

    #[error("Duplicate view {0}")]
    #[diagnostic(code(prism::domain::duplicate_view))]
    DuplicateView(String),

    #[error("View {view} is invalid: {reason}")]
    #[diagnostic(code(prism::domain::invalid_view))]
    InvalidView { view: String, reason: String },

    #[error("Column naming is invalid: {0}")]
    #[diagnostic(
        code(prism::domain::naming),
        help("Check the `expand.naming` block (strategy, template, fragments).")
    )]
    InvalidNaming(String),

    // --- INDICATORS ---
    #[error("Ambiguous indicator for {target}: candidates {candidates:?}")]
    #[diagnostic(
        code(prism::domain::ambiguous_indicator),
        help("Restrict the source tables or use a fully qualified catalog path.")
    )]
    AmbiguousIndicator {
        target: String,
        candidates: Vec<String>,
    },

    #[error("Malformed indicator reference '{0}'")]
    #[diagnostic(
        code(prism::domain::malformed_reference),
        help("Indicator references use the 'table#column' form.")
    )]
    MalformedReference(String),

    #[error("Unknown table '{0}'")]
    #[diagnostic(
        code(prism::domain::unknown_table),
        help("Declare the table in the catalog file or fix the reference.")
    )]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    #[diagnostic(code(prism::domain::unknown_column))]
    UnknownColumn { table: String, column: String },

    // --- PORTS ---
    #[error("Collection loading error: {0}")]
    #[diagnostic(code(prism::domain::collection))]
    CollectionError(String),

    #[error("Catalog loading error: {0}")]
    #[diagnostic(code(prism::domain::catalog))]
    CatalogError(String),
}

impl DomainError {
    pub fn not_found(kind: &'static str, slug: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            slug: slug.into(),
        }
    }
}
