// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - #[command(flatten)]: reuse one group of flags in several subcommands
// =============================================================================

use crate::config::CheckerConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Check every link in a region/site document and record whether it is reachable",
    long_about = "link-warden reads a list of regions, each holding named sites with a `link`, \
                  probes every link concurrently (HEAD, then a one-byte GET), and writes the \
                  document back out with a `status` verdict added to each site."
)]
pub struct Cli {
    /// Path to a TOML config file (see link-warden.example.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a JSON or YAML region document
    ///
    /// Example: link-warden check links.yaml links-checked.yaml
    Check {
        /// Input document (.yaml/.yml for YAML, JSON otherwise)
        input: PathBuf,

        /// Where to write the annotated document (format from extension)
        output: PathBuf,

        #[command(flatten)]
        opts: CheckOptions,
    },

    /// Extract links from HTML sections, then check them
    ///
    /// Example: link-warden sections sections.html links-out.yaml
    Sections {
        /// HTML page (or fragment) with div.section blocks
        html: PathBuf,

        output: PathBuf,

        #[command(flatten)]
        opts: CheckOptions,
    },

    /// Extract links from Markdown headings, then check them
    ///
    /// Example: link-warden markdown LINKS.md links-out.json
    Markdown {
        /// Markdown file; each heading starts a region
        file: PathBuf,

        output: PathBuf,

        #[command(flatten)]
        opts: CheckOptions,
    },
}

/// Flags shared by every checking subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CheckOptions {
    /// Maximum number of links probed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// How many redirects to follow before giving up
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// Also print per-link results to stdout
    #[arg(long, value_enum)]
    pub report: Option<ReportFormat>,

    /// Exit with code 1 when any link is broken
    #[arg(long)]
    pub strict: bool,
}

impl CheckOptions {
    // Flags win over the config file; unset flags leave it alone
    pub fn apply(&self, cfg: &mut CheckerConfig) {
        if let Some(concurrency) = self.concurrency {
            cfg.concurrency = concurrency;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            cfg.timeout_ms = timeout_ms;
        }
        if let Some(user_agent) = &self.user_agent {
            cfg.user_agent = user_agent.clone();
        }
        if let Some(max_redirects) = self.max_redirects {
            cfg.max_redirects = max_redirects;
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "link-warden",
            "check",
            "in.yaml",
            "out.yaml",
            "--concurrency",
            "8",
            "--report",
            "json",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            Commands::Check { input, output, opts } => {
                assert_eq!(input, PathBuf::from("in.yaml"));
                assert_eq!(output, PathBuf::from("out.yaml"));
                assert_eq!(opts.concurrency, Some(8));
                assert_eq!(opts.report, Some(ReportFormat::Json));
                assert!(opts.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "link-warden",
            "sections",
            "page.html",
            "out.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Sections { .. }));
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["link-warden", "check", "in.yaml"]).is_err());
    }

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let mut cfg = CheckerConfig::default();
        let opts = CheckOptions {
            timeout_ms: Some(250),
            ..CheckOptions::default()
        };
        opts.apply(&mut cfg);

        assert_eq!(cfg.timeout_ms, 250);
        assert_eq!(cfg.concurrency, CheckerConfig::default().concurrency);
    }
}
