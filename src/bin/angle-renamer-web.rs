// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! angle-renamer web form
//!
//! Serves the rename form on a local port; the form runs the same jobs as
//! the command line tool and shows the per-file log.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use angle_renamer::config::AppConfig;
use angle_renamer::Result;

#[derive(Parser, Debug)]
#[command(name = "angle-renamer-web")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Web form for angle-renamer")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Port to listen on [default: from config, 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { "debug" } else { "info" })
        .with_target(false)
        .init();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(port) = args.port {
        config.web.port = port;
    }
    info!(
        "Form defaults: image folder '{}', {} angle(s)",
        config.image_folder, config.angle_num
    );

    angle_renamer::web::start_server(config).await
}
