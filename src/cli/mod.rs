//! CLI module
//!
//! Command-line interface for running vendor harvests.
//!
//! # Commands
//!
//! - `bizneo` - recruiters, jobs and applications
//! - `greenhouse <applications|linkedin>`
//! - `gupy <job-templates|email-templates|applications>`
//! - `pandape <data|linkedin>`
//! - `recruitee` - offers, candidates and notes
//! - `lever --opportunities FILE` - opportunity notes

mod commands;
mod runner;

pub use commands::{Cli, Commands, GreenhouseCommand, GupyCommand, PandapeCommand};
pub use runner::Runner;
