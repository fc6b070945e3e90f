//! Sprout command-line front-end
//!
//! Each command is a "page": protected ones go through the shared page gate
//! before printing anything, and the guest command drives the guest
//! authorization flow with an interactive confirmation.

pub mod error;
pub mod logging;
pub mod pages;
pub mod render;

pub use error::{CliError, CliResult};
