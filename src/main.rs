// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up diagnostics (tracing, on stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with a proper code
//
// Exit codes:
//   orphans:   0 = no orphans,      1 = orphans found
//   check-url: 0 = reachable,       1 = broken or connection failed
//   any:       2 = internal error (bad setup, can't bind, ...)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - single URL reachability check
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - analyzer and service settings
mod logging; // src/logging.rs - tracing setup
mod server; // src/server/ - HTTP endpoints
mod site; // src/site/ - orphaned page detection

use anyhow::Result;
use clap::Parser;
use cli::{AnalysisArgs, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected failure: print the full context chain and exit with 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns the exit code for a command that ran to completion
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Orphans { json, analysis } => handle_orphans(&analysis, json).await,
        Commands::CheckUrl {
            url,
            timeout,
            user_agent,
            json,
        } => handle_check_url(&url, timeout, &user_agent, json).await,
        Commands::Serve {
            host,
            port,
            service_version,
            analysis,
        } => handle_serve(&host, port, &service_version, &analysis).await,
    }
}

// Handles the 'orphans' subcommand
async fn handle_orphans(analysis: &AnalysisArgs, json: bool) -> Result<i32> {
    let config = analysis.analyzer_config();
    let report = site::find_orphans(&analysis.site_dir, &config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_orphans(&report);
    }

    Ok(if report.is_clean() { 0 } else { 1 })
}

// Handles the 'check-url' subcommand
async fn handle_check_url(url: &str, timeout: u64, user_agent: &str, json: bool) -> Result<i32> {
    let options = cli::check_options(timeout, user_agent);

    if !json {
        println!("🔍 Checking URL: {}", url);
    }

    let result = checker::check_url(url, &options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_check_result(&result));
    }

    Ok(result.exit_code())
}

// Handles the 'serve' subcommand
async fn handle_serve(
    host: &str,
    port: u16,
    version: &str,
    analysis: &AnalysisArgs,
) -> Result<i32> {
    let config = analysis.service_config(version);
    let addr = format!("{}:{}", host, port);
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || server::serve(&addr, config, runtime)).await??;

    Ok(0)
}

// Prints the orphan report as a human-readable list
fn print_orphans(report: &site::OrphanReport) {
    println!("📁 Site directory: {}", report.site_directory);

    if report.is_clean() {
        println!("✅ No orphaned pages found");
        return;
    }

    println!("⚠️  {} orphaned page(s):", report.count);
    for page in &report.orphaned_files {
        println!("   {}", page);
    }
}

// One line summary of a URL check
fn format_check_result(result: &checker::LinkCheckResult) -> String {
    let message = result.message.as_deref().unwrap_or("");

    match &result.status {
        checker::LinkStatus::Ok => format!("✅ SUCCESS: URL is reachable. {}", message),
        checker::LinkStatus::Redirect(_) => format!("🔀 WARNING: Redirect detected. {}", message),
        checker::LinkStatus::Broken => {
            format!("❌ FAILED: Link is broken or inaccessible. {}", message)
        }
        checker::LinkStatus::Timeout => format!("⏱️  ERROR: {}", message),
        checker::LinkStatus::SslError => format!("🔒 ERROR: {}", message),
        checker::LinkStatus::TooManyRedirects => format!("🔁 ERROR: {}", message),
        checker::LinkStatus::DnsError => format!("🌐 ERROR: {}", message),
        checker::LinkStatus::Error => format!("⚠️  ERROR: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_check_result() {
        let result = checker::LinkCheckResult {
            url: "https://example.com".to_string(),
            status: checker::LinkStatus::Broken,
            message: Some("HTTP 404".to_string()),
        };
        assert_eq!(
            format_check_result(&result),
            "❌ FAILED: Link is broken or inaccessible. HTTP 404"
        );
    }
}
