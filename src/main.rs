// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the config file (if any) and set up logging
// 3. Build the region/site document from the chosen input
// 4. Check every link and save the annotated document
// 5. Exit with proper code (0 = success, 1 = broken links with --strict,
//    2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use link_warden::cli::{CheckOptions, Cli, Commands, ReportFormat};
use link_warden::config::{CheckerConfig, Config};
use link_warden::document::{self, Document};
use link_warden::logging;
use link_warden::{Orchestrator, RunReport};
use std::path::Path;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    logging::init_logging(&config.logging, cli.log_level.as_deref())?;

    let (document, output, opts) = match cli.command {
        Commands::Check { input, output, opts } => {
            let document = document::load(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            (document, output, opts)
        }
        Commands::Sections { html, output, opts } => {
            let text = read_text(&html)?;
            (document::extract_sections(&text), output, opts)
        }
        Commands::Markdown { file, output, opts } => {
            let text = read_text(&file)?;
            (document::extract_markdown(&text), output, opts)
        }
    };

    opts.apply(&mut config.checker);
    check_and_save(document, &output, &config.checker, &opts).await
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

async fn check_and_save(
    document: Document,
    output: &Path,
    cfg: &CheckerConfig,
    opts: &CheckOptions,
) -> Result<i32> {
    let orchestrator = Orchestrator::new(cfg)?;
    let report = orchestrator.run_report(document).await?;

    document::save(output, &report.document)
        .with_context(|| format!("writing {}", output.display()))?;

    // Keep stdout pure JSON when a JSON report was asked for
    let chatty = opts.report != Some(ReportFormat::Json);
    if chatty {
        println!("Total runtime: {:.2} seconds", report.elapsed.as_secs_f64());
        println!("Wrote results to: {}", output.display());
    }

    match opts.report {
        Some(ReportFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&report.links)?);
        }
        Some(ReportFormat::Table) => print_table(&report),
        None => {}
    }

    if opts.strict && report.broken_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &RunReport) {
    println!();
    println!("{:<60} {:<6} {:<40}", "URL", "CODE", "REASON");
    println!("{}", "=".repeat(106));

    for link in &report.links {
        // Truncate URL if too long for display (by chars, not bytes)
        let url_display = if link.url.chars().count() > 57 {
            format!("{}...", link.url.chars().take(57).collect::<String>())
        } else {
            link.url.clone()
        };
        let code = link
            .verdict
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mark = if link.verdict.ok { "✅" } else { "❌" };

        println!(
            "{:<60} {:<6} {} {:<40}",
            url_display, code, mark, link.verdict.reason
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", report.ok_count());
    println!("   ❌ Broken: {}", report.broken_count());
    println!("   📋 Total: {}", report.links.len());
}
