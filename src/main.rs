// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use repomd_primary::db::{self, models::Channel};
use repomd_primary::PrimaryConfig;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::info;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr so primary.xml can be written to stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_path } => {
            db::init(&db_path)?;
            println!("Database initialized successfully at: {}", db_path);
            Ok(())
        }
        Commands::Generate {
            channel,
            db_path,
            output,
            config,
        } => cmd_generate(&channel, &db_path, output.as_deref(), config.as_deref()),
        Commands::Channels { db_path } => {
            let conn = db::open(&db_path)?;
            for channel in Channel::list_all(&conn)? {
                let count = match channel.id {
                    Some(id) => Channel::package_count(&conn, id)?,
                    None => 0,
                };
                println!("{}\t{} packages", channel.label, count);
            }
            Ok(())
        }
    }
}

fn cmd_generate(
    channel: &str,
    db_path: &str,
    output: Option<&str>,
    config_path: Option<&str>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => PrimaryConfig::load(Path::new(path))?,
        None => PrimaryConfig::default(),
    };

    let conn = db::open(db_path).with_context(|| format!("Failed to open {}", db_path))?;

    let stats = match output {
        Some(path) => {
            // Only a complete document is renamed into place
            let tmp_path = format!("{}.tmp", path);
            let file = File::create(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path))?;

            match db::export_channel(&conn, channel, config, BufWriter::new(file)) {
                Ok((file, stats)) => {
                    drop(file);
                    fs::rename(&tmp_path, path)
                        .with_context(|| format!("Failed to move output to {}", path))?;
                    stats
                }
                Err(e) => {
                    let _ = fs::remove_file(&tmp_path);
                    return Err(e).with_context(|| format!("Failed to export channel {}", channel));
                }
            }
        }
        None => {
            let stdout = BufWriter::new(io::stdout().lock());
            let (_, stats) = db::export_channel(&conn, channel, config, stdout)
                .with_context(|| format!("Failed to export channel {}", channel))?;
            stats
        }
    };

    info!(
        "Wrote {} of {} declared packages for channel {}",
        stats.packages, stats.declared, channel
    );
    Ok(())
}
