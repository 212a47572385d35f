//! Interactive play over stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use kv_mechanics::FixedDice;
use kv_narrative::{InvestigationSession, SessionConfig, TurnEvent};
use tracing::debug;

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// How the session starts.
pub struct Setup<'a> {
    pub seed: u64,
    pub lens: &'a str,
    pub skills: &'a [String],
    pub dice: Option<&'a str>,
}

pub fn run(content: &Path, setup: Setup<'_>, config: Option<&Path>) -> Result<(), String> {
    let narrative = super::load_config(config)?;
    let pack = super::load_content(content)?;
    let mut session_config = SessionConfig::new()
        .with_narrative(narrative)
        .with_seed(setup.seed)
        .with_lens(super::parse_lens(setup.lens)?);
    for arg in setup.skills {
        let (name, level) = super::parse_skill_arg(arg)?;
        session_config = session_config.with_skill(&name, level);
    }
    if let Some(faces) = setup.dice {
        let dice = FixedDice::parse(faces).map_err(|e| e.to_string())?;
        session_config = session_config.with_dice(dice.faces());
    }
    let mut session = InvestigationSession::new(pack, session_config).map_err(|e| e.to_string())?;

    println!("{}", "Kaltvik. Type 'help' for commands, 'quit' to leave.".dimmed());
    println!();
    print_event(&session.describe());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\n> ");
        stdout.flush().map_err(|e| e.to_string())?;
        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).map_err(|e| e.to_string())?;
        if read == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }
        if input.eq_ignore_ascii_case("status") {
            println!("{}", session.psyche().summary());
            continue;
        }
        let report = session.turn(input);
        for event in &report.events {
            print_event(event);
        }
    }

    debug!(session = %session.id(), scene = %session.scene_id(), "session ended");
    println!();
    println!(
        "  {} turns, {} evidence collected, {} fractures.",
        session.journal().len(),
        session.evidence().len(),
        session.fractures().len()
    );
    Ok(())
}

fn print_event(event: &TurnEvent) {
    let text = event.to_string();
    match event {
        TurnEvent::Interrupt(_) => println!("{}", text.red().bold()),
        TurnEvent::Clue(_) => println!("{}", text.cyan()),
        TurnEvent::EvidenceCollected { .. } => println!("{}", text.green()),
        TurnEvent::Feedback(_) => println!("{}", text.magenta().italic()),
        TurnEvent::Unrecognized(_) | TurnEvent::Undispatched(_) => println!("{}", text.yellow()),
        TurnEvent::Notice(_) | TurnEvent::Recovery(_) => println!("{}", text.dimmed()),
        _ => println!("{text}"),
    }
}
