//! Core types, errors, run configuration and source validation.
//!
//! Everything else in the crate is built on the row and table types defined
//! here.

mod config;
mod error;
mod types;
mod validation;

pub use config::*;
pub use error::*;
pub use types::*;
pub use validation::*;
