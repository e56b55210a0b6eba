//! # Content-Type Builder Core
//!
//! Core types, traits, and error handling for the Content-Type Builder.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: lifecycle `Status`, `RelationKind`, `ScalarType`, `ForTarget`
//! - **Traits**: `StatusTracked`, the monotonic status transition rule
//! - **Errors**: unified error handling with `BuilderError` and `BuilderResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{BuilderError, BuilderResult};
pub use traits::StatusTracked;
pub use types::{ContentTypeKind, ForTarget, RelationKind, ScalarType, SchemaUid, Status};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
