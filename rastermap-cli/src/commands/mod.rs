//! CLI subcommands.

pub mod common;
pub mod config;
pub mod locate;
pub mod render;
pub mod simulate;
