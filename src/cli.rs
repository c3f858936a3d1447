// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Each subcommand's
// arguments also know how to turn themselves into the config values the
// rest of the program works with (see config.rs).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::{CheckOptions, DEFAULT_USER_AGENT};
use crate::config::{AnalyzerConfig, ReachabilityMode, ServiceConfig, DEFAULT_SITE_DIR};
use crate::site::INDEX_DOCUMENT;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "docstool",
    version,
    about = "A Developer Experience (DevEx) toolkit for documentation quality assurance",
    long_about = "docstool finds orphaned pages in a generated static site (pages nothing links to), \
                  checks single URLs for reachability, and can serve both as a small HTTP API. \
                  Exit codes make it easy to use as a CI/CD quality gate."
)]
pub struct Cli {
    /// Show debug diagnostics on stderr (DOCSTOOL_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find pages in a generated site that no other page links to
    ///
    /// Example: docstool orphans --site-dir _site --json
    Orphans {
        /// Output the report as JSON instead of a list
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Check a single URL for basic connectivity (HTTP 2xx)
    ///
    /// Example: docstool check-url https://example.com/page/
    CheckUrl {
        /// The full URL to check (e.g., https://example.com/page/)
        url: String,

        /// Timeout in seconds for the request
        #[arg(long, default_value_t = 5)]
        timeout: u64,

        /// Custom User-Agent string
        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve /status, /info and /orphans over HTTP
    ///
    /// Example: docstool serve --port 8000 --site-dir _site
    Serve {
        /// Interface to listen on
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Version reported by /status
        #[arg(long, env = "VERSION", default_value = "1.0.0-dev")]
        service_version: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

// Options shared by everything that runs an orphan analysis
#[derive(Args, Debug)]
pub struct AnalysisArgs {
    /// Generated site directory to analyze
    #[arg(long = "site-dir", env = "DOCSTOOL_SITE_DIR", default_value = DEFAULT_SITE_DIR)]
    pub site_dir: PathBuf,

    /// Landing page, relative to the site directory; never reported as orphaned
    #[arg(long, default_value = INDEX_DOCUMENT)]
    pub entry: String,

    /// How many documents to read at the same time
    #[arg(long, default_value_t = 16)]
    pub workers: usize,

    /// `direct`: any incoming link counts. `transitive`: must be reachable from the entry page
    #[arg(long, value_enum, default_value_t = ReachabilityMode::Direct)]
    pub mode: ReachabilityMode,
}

impl AnalysisArgs {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            entry_point: self.entry.trim_start_matches('/').to_string(),
            workers: self.workers,
            mode: self.mode,
            ..AnalyzerConfig::default()
        }
    }

    pub fn service_config(&self, version: &str) -> ServiceConfig {
        ServiceConfig {
            version: version.to_string(),
            site_dir: self.site_dir.clone(),
            analyzer: self.analyzer_config(),
            ..ServiceConfig::default()
        }
    }
}

pub fn check_options(timeout: u64, user_agent: &str) -> CheckOptions {
    CheckOptions {
        timeout: Duration::from_secs(timeout),
        user_agent: user_agent.to_string(),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pulls the fields of AnalysisArgs into the subcommand
//    - Both `orphans` and `serve` get --site-dir, --entry, --workers, --mode
//      without repeating them
//
// 2. What does env = "VERSION" do?
//    - If --service-version isn't given, clap reads the VERSION variable
//    - If that isn't set either, the default_value is used
//
// 3. Why trim_start_matches('/') on --entry?
//    - Canonical paths never start with '/', so "/index.html" and
//      "index.html" should mean the same page
// -----------------------------------------------------------------------------
