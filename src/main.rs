// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! angle-renamer: batch copy & rename for sample photo sets
//!
//! Examples:
//!
//! ```text
//! # ./HR250701/<4-digit folders>/* -> ./HR250701/renamed/HR-250701-0001-A.jpg ...
//! angle-renamer --region HR --date 250701 --mode subfolder
//!
//! # ./SY250623/phone_image split at '...-XX.jpg' pilots, 3 angles per group
//! angle-renamer --region SY --date 250623 --mode single_folder --angle_num 3
//!
//! # explicit source folder and image sub folder
//! angle-renamer --region SY --date 250623 --mode single_folder \
//!     --source_dir /path/to/data --image_folder my_images
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use angle_renamer::config::AppConfig;
use angle_renamer::copy::RunReport;
use angle_renamer::{JobRequest, RenameJob, Result};

/// Copy images into `renamed/` as REGION-DATE-GROUP-ANGLE.ext
#[derive(Parser, Debug)]
#[command(name = "angle-renamer")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(
    about = "Batch copy and rename sample images by region, date, group and angle",
    long_about = None
)]
struct Cli {
    /// Region code (2 letters, e.g. HR)
    #[arg(long)]
    region: String,

    /// Date code (6 digits, e.g. 250701)
    #[arg(long)]
    date: String,

    /// subfolder: one 4-digit folder per sample (A-D);
    /// single_folder: one flat folder split at '...-XX.jpg' pilot images
    #[arg(long, value_parser = ["subfolder", "single_folder"])]
    mode: String,

    /// Base folder to process [default: ./{REGION}{DATE}]
    #[arg(long = "source_dir", visible_alias = "source-dir")]
    source_dir: Option<PathBuf>,

    /// Image sub folder used in single_folder mode [default: from config, phone_image]
    #[arg(long = "image_folder", visible_alias = "image-folder")]
    image_folder: Option<String>,

    /// Images per group in single_folder mode, e.g. 3 -> A, B, C [default: from config, 4]
    #[arg(long = "angle_num", visible_alias = "angle-num")]
    angle_num: Option<usize>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Keep files already present in the output folder
    #[arg(long)]
    no_clobber: bool,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Output format for the run report
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(report) if report.failed > 0 => {
            warn!("{} file(s) could not be copied", report.failed);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RunReport> {
    let config = AppConfig::load(&cli.config)?;
    let format = cli.format.clone();
    let source_given = cli.source_dir.is_some();

    let request = JobRequest {
        region: cli.region,
        date: cli.date,
        mode: cli.mode,
        source_dir: cli.source_dir,
        image_folder: cli.image_folder,
        angle_num: cli.angle_num,
        dry_run: cli.dry_run,
        no_clobber: cli.no_clobber,
    };
    let job = RenameJob::from_request(request, &config)?;
    if source_given {
        info!("Using source folder {:?}", job.work_dir);
    } else {
        info!("Using default source folder {:?}", job.work_dir);
    }

    let report = job.run()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::try_parse_from([
            "angle-renamer", "--region", "HR", "--date", "250701", "--mode", "subfolder",
        ])
        .unwrap();
        assert_eq!(cli.mode, "subfolder");
        assert!(cli.source_dir.is_none());
        assert!(cli.angle_num.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_underscore_flags() {
        let cli = Cli::try_parse_from([
            "angle-renamer",
            "--region", "SY",
            "--date", "250623",
            "--mode", "single_folder",
            "--angle_num", "3",
            "--source_dir", "/path/to/data",
            "--image_folder", "my_images",
        ])
        .unwrap();
        assert_eq!(cli.angle_num, Some(3));
        assert_eq!(cli.source_dir, Some(PathBuf::from("/path/to/data")));
        assert_eq!(cli.image_folder.as_deref(), Some("my_images"));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let parsed = Cli::try_parse_from([
            "angle-renamer", "--region", "HR", "--date", "250701", "--mode", "flat",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_requires_region() {
        let parsed =
            Cli::try_parse_from(["angle-renamer", "--date", "250701", "--mode", "subfolder"]);
        assert!(parsed.is_err());
    }
}
