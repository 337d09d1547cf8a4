// prism-core/src/domain/catalog/mod.rs

pub mod reference;
pub mod table;

pub use reference::{IndicatorRef, ReferenceResolver, ResolvedIndicator};
pub use table::{Catalog, ColumnDescriptor, TableDescriptor};
