// src/cli.rs
//! CLI definitions for repomd-primary
//!
//! This module contains the command-line interface definitions using clap.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "repomd-primary")]
#[command(author, version)]
#[command(
    about = "Generate primary.xml repository metadata from a package database",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new package database
    Init {
        /// Path to the database file
        #[arg(short, long, default_value = "/var/lib/repomd/packages.db")]
        db_path: String,
    },

    /// Write primary.xml for a channel
    Generate {
        /// Channel label to export
        #[arg(short, long)]
        channel: String,

        /// Path to the database file
        #[arg(short, long, default_value = "/var/lib/repomd/packages.db")]
        db_path: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// TOML file with generation settings
        #[arg(long)]
        config: Option<String>,
    },

    /// List channels in the database
    Channels {
        /// Path to the database file
        #[arg(short, long, default_value = "/var/lib/repomd/packages.db")]
        db_path: String,
    },
}
