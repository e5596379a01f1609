//! CLI command implementations.

pub mod presets;
pub mod run;
pub mod strategies;
pub mod validate;
