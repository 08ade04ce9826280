//! Check command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use roster_core::{classify, imaging, SignatureStore};

use crate::config::Config;

/// Execute the check command.
pub fn execute(file: PathBuf) -> Result<()> {
    let config = Config::from_env();

    let references = SignatureStore::load(&config.references_path).with_context(|| {
        format!(
            "Failed to load reference signatures from {}",
            config.references_path.display()
        )
    })?;

    let data = std::fs::read(&file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let signature = imaging::compute_signature(&data)?;

    let result = classify(0, &signature, &references, config.threshold)?;
    match result.matched {
        Some(reference) => {
            println!(
                "{} {} {}",
                "match:".green().bold(),
                reference.name,
                format!("(distance {})", reference.distance).dimmed()
            );
        }
        None => println!("{}", "no match".yellow()),
    }

    Ok(())
}
