// SPDX-License-Identifier: PMPL-1.0-or-later
//! axe-assert CLI - judge saved accessibility audit results
//!
//! Runs the `toHaveNoViolations` matcher over engine result files so audits
//! recorded by a browser run can fail a CI job.

use axe_assert::config::{load_config, ColorChoice, Config};
use axe_assert::report::{generate_report, OutputFormat, Palette};
use axe_assert::results::Impact;
use axe_assert::scanner::{self, ScanSummary};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Accessibility audit results as test assertions
#[derive(Parser)]
#[command(name = "axe-assert")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a result file or every result file under a directory
    Check {
        /// Result file or directory
        path: PathBuf,

        /// Only count violations of these impact levels
        #[arg(long, value_delimiter = ',')]
        impact: Vec<ImpactArg>,

        /// Configuration file (TOML or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Colour failure messages
        #[arg(long)]
        color: Option<ColorArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Impact level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImpactArg {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl From<ImpactArg> for Impact {
    fn from(arg: ImpactArg) -> Self {
        match arg {
            ImpactArg::Minor => Impact::Minor,
            ImpactArg::Moderate => Impact::Moderate,
            ImpactArg::Serious => Impact::Serious,
            ImpactArg::Critical => Impact::Critical,
        }
    }
}

/// Colour CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Failure messages for humans
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("axe_assert=debug")
    } else {
        EnvFilter::new("axe_assert=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, impact, config, color, format, verbose } => {
            init_logging(verbose);

            let mut config = match config {
                Some(p) => load_config(&p)?,
                None => Config::default(),
            };
            if !impact.is_empty() {
                config.impact_levels = impact.into_iter().map(Impact::from).collect();
            }
            if let Some(color) = color {
                config.color = color.into();
            }
            config.color.apply();

            let format: OutputFormat = format.into();
            let palette = match format {
                OutputFormat::Json => Palette::Plain,
                OutputFormat::Text => config.color.palette(),
            };

            let summary = check(&path, &config, palette)?;
            println!("{}", generate_report(&summary, format));

            if summary.has_failures() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn check(path: &Path, config: &Config, palette: Palette) -> anyhow::Result<ScanSummary> {
    if path.is_dir() {
        return Ok(scanner::scan_directory(path, config, palette)?);
    }

    let outcome = scanner::scan_file(path, config, palette)?;
    Ok(ScanSummary { outcomes: vec![outcome] })
}
