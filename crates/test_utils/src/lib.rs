//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! cover token test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for holders, amounts and periods
//! - `builders`: Builder patterns for quotes and legacy tokens
//! - `engine`: A `CoverService` wired to in-memory collaborators
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod engine;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use engine::*;
pub use assertions::*;
pub use generators::*;
