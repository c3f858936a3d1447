// src/config.rs
// =============================================================================
// Configuration values for the analyzer and the HTTP service.
//
// Nothing here is global. main.rs builds these from the command line (and a
// few environment variables, via clap) and passes them down explicitly.
// =============================================================================

use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

use crate::site::INDEX_DOCUMENT;

// Where Jekyll writes the generated site by default
pub const DEFAULT_SITE_DIR: &str = "_site";

/// How far a link has to carry for a page to count as reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReachabilityMode {
    /// A page is reachable if any other page links to it directly
    #[default]
    Direct,
    /// A page is reachable if a chain of links leads to it from the entry point
    Transitive,
}

/// Settings for one orphan analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Canonical path of the landing page, never reported as an orphan
    pub entry_point: String,
    /// How many documents are read at the same time
    pub workers: usize,
    /// Documents larger than this (in bytes) are skipped
    pub max_file_size: u64,
    /// Documents that take longer than this to read are skipped
    pub read_timeout: Duration,
    pub mode: ReachabilityMode,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            entry_point: INDEX_DOCUMENT.to_string(),
            workers: 16,
            max_file_size: 10 * 1024 * 1024,
            read_timeout: Duration::from_secs(5),
            mode: ReachabilityMode::Direct,
        }
    }
}

impl AnalyzerConfig {
    // buffer_unordered(0) would never make progress
    pub fn concurrency(&self) -> usize {
        self.workers.max(1)
    }
}

/// Settings for the HTTP service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub version: String,
    /// Site directory analyzed by GET /orphans
    pub site_dir: PathBuf,
    pub analyzer: AnalyzerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "Jekyll Docs Validator API".to_string(),
            version: "1.0.0-dev".to_string(),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entry_point_is_index() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.entry_point, "index.html");
        assert_eq!(config.mode, ReachabilityMode::Direct);
    }

    #[test]
    fn test_zero_workers_still_makes_progress() {
        let config = AnalyzerConfig {
            workers: 0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(config.concurrency(), 1);
    }
}
