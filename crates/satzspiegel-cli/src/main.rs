// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Satzspiegel — PDF layout analysis and template transfer
//
// Entry point. Initialises logging, parses the command line, and drives
// the extract/apply/preview pipelines.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use satzspiegel_core::config::{TablePolicy, TransferOptions};
use satzspiegel_core::profile::LayoutProfile;
use satzspiegel_core::{Result, SatzspiegelError};
use satzspiegel_extract::{PdfSource, ProfileBuilder};
use satzspiegel_render::raster::preview_png;
use satzspiegel_render::TemplateApplier;

#[derive(Parser)]
#[command(name = "satzspiegel")]
#[command(version)]
#[command(about = "Extract a layout profile from a template PDF and replay it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a template's layout profile and print a summary
    Inspect {
        /// Template PDF file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Emit the full profile as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Replay a template's layout onto a new PDF sized to a target document
    Transfer {
        /// Template PDF whose layout is extracted
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        /// Target PDF supplying the page count
        #[arg(short = 'd', long, value_name = "FILE")]
        target: PathBuf,

        /// Output PDF path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Which pages receive a replayed table grid
        #[arg(long, value_enum, default_value = "first-global")]
        table_policy: TablePolicyArg,
    },

    /// Render a preview image of one extracted template page
    Preview {
        /// Template PDF file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Page number to render (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Pixels per point
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Output PNG path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

/// Command line face of [`TablePolicy`]; keeps `clap` out of the core crate.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TablePolicyArg {
    /// Replay the first table found in the template onto leading pages
    FirstGlobal,
    /// Replay each page's own table candidate, if it has one
    PerPage,
}

impl From<TablePolicyArg> for TablePolicy {
    fn from(arg: TablePolicyArg) -> Self {
        match arg {
            TablePolicyArg::FirstGlobal => TablePolicy::FirstGlobal,
            TablePolicyArg::PerPage => TablePolicy::PerPage,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Inspect { template, json } => inspect(&template, json),
        Commands::Transfer {
            template,
            target,
            output,
            table_policy,
        } => transfer(&template, &target, &output, table_policy.into()),
        Commands::Preview {
            template,
            page,
            scale,
            output,
        } => preview(&template, page, scale, &output),
    }
}

fn extract_profile(template: &PathBuf) -> Result<LayoutProfile> {
    let source = PdfSource::open(template)?;
    ProfileBuilder::new().build_with_progress(&source, |done, total| {
        info!(done, total, "page extracted");
    })
}

fn inspect(template: &PathBuf, json: bool) -> Result<()> {
    let profile = extract_profile(template)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("pages: {}", profile.page_count());
    println!("text runs: {}", profile.text_run_count());
    match profile.fonts.dominant() {
        Some((name, size)) => println!("dominant font: {} @ {:.1} pt", name, size),
        None => println!("dominant font: none recorded"),
    }
    for page in &profile.pages {
        let tables = page.tables.len();
        let margins = match page.margins {
            Some(m) => format!(
                "L {:.1} / R {:.1} / T {:.1} / B {:.1}",
                m.left, m.right, m.top, m.bottom
            ),
            None => "empty page".to_string(),
        };
        println!(
            "  page {}: {:.0}x{:.0} pt, {} runs, {} tables, margins {}",
            page.index + 1,
            page.width,
            page.height,
            page.text_runs.len(),
            tables,
            margins
        );
    }
    Ok(())
}

fn transfer(
    template: &PathBuf,
    target: &PathBuf,
    output: &PathBuf,
    table_policy: TablePolicy,
) -> Result<()> {
    let profile = extract_profile(template)?;
    let target_pages = PdfSource::open(target)?.page_count();
    info!(target_pages, "target opened");

    let options = TransferOptions {
        table_policy,
        ..TransferOptions::default()
    };
    TemplateApplier::new(options).apply_to_file(&profile, target_pages, output)?;
    info!(output = %output.display(), "transfer written");
    Ok(())
}

fn preview(template: &PathBuf, page: usize, scale: f32, output: &PathBuf) -> Result<()> {
    let profile = extract_profile(template)?;
    let page_profile = page
        .checked_sub(1)
        .and_then(|i| profile.pages.get(i))
        .ok_or_else(|| SatzspiegelError::Raster {
            page,
            reason: format!("template has {} pages", profile.page_count()),
        })?;

    let png = preview_png(page_profile, scale)?;
    fs::write(output, png).map_err(|e| SatzspiegelError::SinkWrite(e.to_string()))?;
    info!(output = %output.display(), "preview written");
    Ok(())
}
