//! Error types produced by the configuration loader.

mod constructors;
mod types;

pub use types::CascadeError;
