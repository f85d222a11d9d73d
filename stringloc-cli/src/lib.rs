//! CLI library for testing purposes

pub mod check;
pub mod config;
pub mod translate;
pub mod validation;

pub use config::{FileConfig, ResolvedRun, RunArgs, resolve_run};
pub use stringloc::RunConfig;
