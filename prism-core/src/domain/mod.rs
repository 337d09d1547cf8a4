pub mod catalog;
pub mod collection;
pub mod error;
pub mod ports;
pub mod project;
pub mod resolution;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;
