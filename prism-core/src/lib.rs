// prism-core/src/lib.rs

// 1. Documentation
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Domain
// Dimensions, views, config layering, indicator references, ports.
// Depends on nothing else in the crate.
pub mod domain;

// 2. Infrastructure (Adapters)
// YAML loaders, discovery, atomic file writes.
pub mod infrastructure;

// 3. Application (Use Cases)
// Collection resolution, project build, explain, clean.
pub mod application;

// --- GLOBAL ERROR ---
pub mod error;

pub use error::PrismError;
