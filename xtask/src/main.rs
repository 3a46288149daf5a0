// Desktop tooling: unwrap/expect/panic are acceptable outside the firmware.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod catalog;
mod check;
mod cargo;
mod test;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Card player development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the host build, the no_std library crates, clippy and formatting
    Check,
    /// Run all tests (unit, integration and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Show the track list the player would build from a local card image
    Catalog {
        /// Directory standing in for the SD card root
        card_root: PathBuf,
        /// Music directory on the card (defaults to the player's)
        #[arg(long)]
        music_dir: Option<String>,
        /// Maximum directory depth below the music directory
        #[arg(long)]
        max_depth: Option<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Catalog {
            card_root,
            music_dir,
            max_depth,
        } => catalog::run(&card_root, music_dir.as_deref(), max_depth),
    }
}
