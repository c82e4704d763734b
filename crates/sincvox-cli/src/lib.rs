//! SincVox CLI library.
//!
//! This crate provides the command implementations behind the `sincvox`
//! binary: run configuration resolution, the processing commands, kernel
//! design, and the interactive action prompt.

pub mod commands;
pub mod settings;
