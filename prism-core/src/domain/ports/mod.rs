// src/domain/ports/mod.rs

pub mod catalog;
pub mod collection;

pub use catalog::CatalogSource;
pub use collection::{CollectionEntry, CollectionLoader};
