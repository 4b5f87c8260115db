//! Test helpers shared across the workspace.
//!
//! - [`figment`] wraps [`::figment::Jail`] so tests get an isolated working
//!   directory and environment.
//! - [`fragments`] writes configuration fragments into scratch directories.

pub mod figment;
pub mod fragments;
