//! `macro-report` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the fetch/clean/correlate steps are testable without spawning processes
//! - the network source can be swapped for fixed rows in tests
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod clean;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
