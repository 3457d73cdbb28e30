//! `prophet-valuer` library crate.
//!
//! The binary (`prophet`) is a thin wrapper around this library so that:
//!
//! - valuation logic is testable without spawning processes
//! - the TUI and CLI front-ends share one request pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod market;
pub mod narrative;
pub mod report;
pub mod tui;
pub mod valuation;
