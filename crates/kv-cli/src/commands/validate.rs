use std::path::Path;

use colored::Colorize;

pub fn run(content: &Path, config: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config)?;
    config.validate().map_err(|e| e.to_string())?;
    let pack = super::load_content(content)?;

    let clues: usize = pack.scenes.iter().map(|s| s.passive_clues.len()).sum();
    let evidence: usize = pack.scenes.iter().map(|s| s.evidence.len()).sum();
    let lines: usize = pack.scenes.iter().map(|s| s.dialogue.len()).sum();

    println!("  {} All checks passed for '{}'.", "✓".green(), content.display());
    println!(
        "  {} scenes, {} passive clues, {} evidence, {} dialogue lines",
        pack.scenes.len(),
        clues,
        evidence,
        lines
    );
    println!(
        "  {} verbs, {} contradiction patterns",
        config.verbs.len(),
        config.liar.patterns.len()
    );
    Ok(())
}
