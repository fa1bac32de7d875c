//! Batch input: one `query,world` pair per line.
//!
//! Blank lines and lines starting with `#` are skipped. Values go through
//! `f32::from_str`, so `NaN`, `inf` and `-inf` are accepted as-is and left
//! to the router.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};

/// Reads the whole input; `-` means stdin.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read batch input from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch input {}", path.display()))
}

/// Parses every data line into a `(query, world)` pair.
pub fn parse_pairs(text: &str) -> anyhow::Result<Vec<(f32, f32)>> {
    let mut pairs = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = index + 1;
        let Some((query, world)) = line.split_once(',') else {
            bail!("line {line_no}: expected `query,world`, got `{line}`");
        };
        let query: f32 = query
            .trim()
            .parse()
            .with_context(|| format!("line {line_no}: invalid query volume `{}`", query.trim()))?;
        let world: f32 = world
            .trim()
            .parse()
            .with_context(|| format!("line {line_no}: invalid world volume `{}`", world.trim()))?;
        pairs.push((query, world));
    }
    Ok(pairs)
}
