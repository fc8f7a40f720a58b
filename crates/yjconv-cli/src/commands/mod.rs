//! Command implementations for the yjconv CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! yjconv library for the conversion itself.

pub mod to_json;
pub mod to_yaml;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read the whole input: a file, or stdin when `input` is `None` or `-`.
pub fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
