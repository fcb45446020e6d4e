//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! rental test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for products, parties and dates
//! - `builders`: A wired in-memory environment and a contract builder
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
