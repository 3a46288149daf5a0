//! xtask catalog: list what the player would find on a local card image.
//!
//! The listing runs the player's own scanner over `LocalFileStorage`, so the
//! order, extension filter, depth limit and capacity are exactly the
//! firmware's. A second walk with `walkdir` reports audio files the player
//! would miss.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use library::{display_name, Catalog, Scanner};
use platform::config::{LibraryConfig, MAX_TRACKS};
use platform::storage_local::LocalFileStorage;
use platform::PlayerConfig;
use walkdir::WalkDir;

/// Entry point called from main.rs
pub fn run(card_root: &Path, music_dir: Option<&str>, max_depth: Option<u8>) -> Result<()> {
    let root = card_root
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("card root is not valid UTF-8"))?;
    anyhow::ensure!(card_root.is_dir(), "{} is not a directory", card_root.display());

    let defaults = PlayerConfig::new().library;
    let music_dir: &'static str = match music_dir {
        Some(dir) => Box::leak(dir.to_owned().into_boxed_str()),
        None => defaults.music_dir,
    };
    let config = LibraryConfig {
        music_dir,
        max_depth: max_depth.unwrap_or(defaults.max_depth),
        ..defaults
    };

    println!();
    println!("{}", format!("📀 Scanning {}", card_root.display()).cyan().bold());
    let catalog = scan(root, &config);
    print_catalog(&catalog);

    let missed = missed_files(card_root, &catalog)?;
    if !missed.is_empty() {
        println!();
        println!(
            "{}",
            format!("⚠ {} audio files not listed (depth or capacity):", missed.len()).yellow()
        );
        for path in &missed {
            println!("    {path}");
        }
    }
    println!();
    Ok(())
}

/// Scan the card the way the firmware does at boot.
pub(crate) fn scan(card_root: &str, config: &LibraryConfig) -> Box<Catalog> {
    let mut storage = LocalFileStorage::new(card_root);
    let mut catalog = Box::new(Catalog::new());
    embassy_futures::block_on(catalog.populate_from(&mut storage, config));
    catalog
}

fn print_catalog(catalog: &Catalog) {
    println!("{}", format!("  {} of {} tracks", catalog.len(), MAX_TRACKS).green());
    for (i, path) in catalog.iter().enumerate() {
        println!("  {:>3}  {:<40} {}", i, display_name(path), path.dimmed());
    }
}

/// Supported files under the card root that did not make it into `catalog`,
/// as card paths, sorted.
pub(crate) fn missed_files(card_root: &Path, catalog: &Catalog) -> Result<Vec<String>> {
    let listed: HashSet<&str> = catalog.iter().collect();
    let mut missed = Vec::new();
    for entry in WalkDir::new(card_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(card_root)
            .context("walked outside the card root")?;
        let card_path = format!("/{}", relative.to_string_lossy().replace('\\', "/"));
        if Scanner::is_supported_path(&card_path) && !listed.contains(card_path.as_str()) {
            missed.push(card_path);
        }
    }
    Ok(missed)
}
