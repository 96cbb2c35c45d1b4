// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running weighted pose estimation.
//!
//! This module contains the command-line interface logic, including argument
//! parsing and the `estimate` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Console output helpers.
pub mod logging;

/// Estimation command logic.
pub mod run;
