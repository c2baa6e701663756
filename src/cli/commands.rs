//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Harvest collections from ATS vendor APIs into local JSON files
#[derive(Parser, Debug)]
#[command(name = "ats-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Harvest configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the output files are written to
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Abort instead of writing partially harvested collections
    #[arg(long, global = true)]
    pub require_complete: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// One subcommand per vendor job
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bizneo recruiters, jobs and applications
    Bizneo,

    /// Greenhouse applications or candidate LinkedIn links
    Greenhouse {
        #[command(subcommand)]
        resource: GreenhouseCommand,
    },

    /// Gupy templates or applications
    Gupy {
        #[command(subcommand)]
        resource: GupyCommand,
    },

    /// PandaPe vacancies and matches
    Pandape {
        #[command(subcommand)]
        mode: PandapeCommand,
    },

    /// Recruitee offers, candidates and notes
    Recruitee,

    /// Lever notes for a list of opportunities
    Lever {
        /// Text file with one opportunity id per line
        #[arg(long)]
        opportunities: PathBuf,
    },
}

/// Greenhouse collections
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreenhouseCommand {
    /// Every application
    Applications,
    /// LinkedIn links of every candidate
    Linkedin,
}

/// Gupy collections
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GupyCommand {
    /// Job templates with all fields
    JobTemplates,
    /// Email templates
    EmailTemplates,
    /// Every job with its applications
    Applications,
}

/// PandaPe outputs
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PandapeCommand {
    /// Vacancies and all matches
    Data,
    /// Matches with social network links
    Linkedin,
}
