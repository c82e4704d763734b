//! CLI command implementations

pub mod actions;
pub mod design;
pub mod interactive;
pub mod json_output;
pub mod process;

mod reporting;
