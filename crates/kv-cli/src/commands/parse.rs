use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use kv_narrative::CommandParser;

pub fn run(
    text: &str,
    content: Option<&Path>,
    scene: Option<&str>,
    config: Option<&Path>,
) -> Result<(), String> {
    let config = super::load_config(config)?;
    let mut parser = CommandParser::new(&config);

    if let Some(path) = content {
        let pack = super::load_content(path)?;
        let scene_id = scene
            .or_else(|| pack.start_scene())
            .ok_or("content pack has no scenes")?;
        let scene = pack
            .scene(scene_id)
            .ok_or_else(|| format!("no scene '{scene_id}' in {}", path.display()))?;
        parser.set_scene_synonyms(&scene.synonyms);
    }

    let report = parser.parse_detailed(text);

    if report.intents.is_empty() {
        println!("  Nothing understood.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Verb", "Target"]);
        for (i, intent) in report.intents.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                intent.verb.clone(),
                super::truncate(intent.target_str(), 60),
            ]);
        }
        println!("{table}");
    }

    for unknown in &report.unrecognized {
        match &unknown.suggestion {
            Some(verb) => println!(
                "  {} '{}' (did you mean '{}'?)",
                "unrecognized:".yellow(),
                unknown.fragment,
                verb
            ),
            None => println!("  {} '{}'", "unrecognized:".yellow(), unknown.fragment),
        }
    }
    Ok(())
}
