//! Configuration module
//!
//! Loads and validates presentation files: brand copy, destination, phase
//! timings, input keys and the view scripts.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
