pub mod check;
pub mod compose;
pub mod cond;
pub mod parse;
pub mod play;
pub mod scan;
pub mod validate;

use std::path::Path;

use kv_narrative::{ContentPack, Lens, NarrativeConfig};

/// Read a file, naming it in the error.
fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Load and validate a content pack.
fn load_content(path: &Path) -> Result<ContentPack, String> {
    let json = read_file(path)?;
    ContentPack::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Load the engine config, or the defaults when no path is given.
fn load_config(path: Option<&Path>) -> Result<NarrativeConfig, String> {
    match path {
        Some(path) => {
            let json = read_file(path)?;
            NarrativeConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
        }
        None => Ok(NarrativeConfig::default()),
    }
}

fn parse_lens(name: &str) -> Result<Lens, String> {
    Lens::parse(name).ok_or_else(|| {
        format!("unknown lens '{name}' (expected believer, skeptic, haunted or neutral)")
    })
}

/// Parse `Name=level`.
fn parse_skill_arg(arg: &str) -> Result<(String, i32), String> {
    let (name, level) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected Name=level, got '{arg}'"))?;
    let level = level
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("invalid level in '{arg}'"))?;
    Ok((name.trim().to_string(), level))
}

/// Truncate text for a table cell.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
