use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use kv_mechanics::{DiceSource, FixedDice, difficulty_label, roll_check};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn run(level: i32, difficulty: i32, dice: Option<&str>, seed: Option<u64>) -> Result<(), String> {
    let mut source: Box<dyn DiceSource> = match (dice, seed) {
        (Some(faces), _) => Box::new(FixedDice::parse(faces).map_err(|e| e.to_string())?),
        (None, Some(seed)) => Box::new(StdRng::seed_from_u64(seed)),
        (None, None) => Box::new(StdRng::from_os_rng()),
    };
    let outcome = roll_check(level, difficulty, source.as_mut());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Dice", "Natural", "Skill", "Total", "Difficulty", "Margin"]);
    table.add_row(vec![
        format!("{} + {}", outcome.die1, outcome.die2),
        outcome.natural_roll.to_string(),
        outcome.skill_level.to_string(),
        outcome.total.to_string(),
        format!("{} ({})", difficulty, difficulty_label(difficulty)),
        format!("{:+}", outcome.margin()),
    ]);
    println!("{table}");

    let verdict = match (outcome.success, outcome.is_critical()) {
        (true, true) => "CRITICAL SUCCESS".green().bold(),
        (true, false) => "SUCCESS".green(),
        (false, true) => "CRITICAL FAILURE".red().bold(),
        (false, false) => "FAILURE".red(),
    };
    println!("  {verdict}");
    Ok(())
}
