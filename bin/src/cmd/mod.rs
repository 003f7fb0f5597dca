//! CLI subcommand modules.
//!
//! This module contains the implementations for all saham CLI subcommands.

pub(crate) mod metrics;
pub(crate) mod run;
pub(crate) mod sheets;
