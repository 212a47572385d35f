use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use kv_core::EvidenceLog;
use kv_mechanics::{DiceSource, FixedDice};
use kv_narrative::LiarEngine;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// How the gating check is rolled.
pub struct Gate<'a> {
    pub level: i32,
    pub dice: Option<&'a str>,
    pub seed: u64,
    pub ungated: bool,
}

pub fn run(dialogue: &str, evidence: &Path, gate: Gate<'_>, config: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config)?;
    let engine = LiarEngine::new(&config.liar).map_err(|e| e.to_string())?;
    let json = super::read_file(evidence)?;
    let log = EvidenceLog::from_json(&json).map_err(|e| format!("{}: {e}", evidence.display()))?;

    if gate.ungated {
        let found = engine.scan(dialogue, &log);
        if found.is_empty() {
            println!("  No contradictions.");
            return Ok(());
        }
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Pattern", "Matched", "Evidence", "Explanation"]);
        for c in &found {
            table.add_row(vec![
                c.pattern_id.clone(),
                c.matched.clone(),
                c.evidence_id.clone(),
                super::truncate(&c.message, 60),
            ]);
        }
        println!("{table}");
        return Ok(());
    }

    let mut dice: Box<dyn DiceSource> = match gate.dice {
        Some(faces) => Box::new(FixedDice::parse(faces).map_err(|e| e.to_string())?),
        None => Box::new(StdRng::seed_from_u64(gate.seed)),
    };
    let interrupts = engine.check_contradictions(dialogue, &log, gate.level, dice.as_mut());
    if interrupts.is_empty() {
        println!("  No interrupts.");
        return Ok(());
    }
    for interrupt in &interrupts {
        println!(
            "  {} {} ({}, {})",
            format!("[{}]", interrupt.skill.to_uppercase()).red().bold(),
            interrupt.explanation,
            interrupt.severity,
            interrupt.check
        );
    }
    Ok(())
}
