//! Hash command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use roster_core::imaging;

/// Execute the hash command.
pub fn execute(file: PathBuf, name: Option<String>) -> Result<()> {
    let data = std::fs::read(&file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let signature = imaging::compute_signature(&data)
        .with_context(|| format!("Failed to hash image: {}", file.display()))?;

    match name {
        Some(name) => println!(
            "{}",
            serde_json::json!({ "name": name, "hash": signature.to_hex() })
        ),
        None => println!("{}", signature.to_hex()),
    }

    Ok(())
}
