use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use kv_core::{GameSnapshot, MentalReadings};
use kv_narrative::compose::FORCE_FLAG;
use kv_narrative::{FractureKind, Highlighter, TextComposer};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Player state the scene is rendered against.
#[derive(Args)]
pub struct StateArgs {
    /// Lens: believer, skeptic, haunted, neutral
    #[arg(long, default_value = "neutral")]
    lens: String,

    /// Sanity (0-100)
    #[arg(long, default_value = "100")]
    sanity: i32,

    /// Stress
    #[arg(long, default_value = "0")]
    stress: i32,

    /// Doubt
    #[arg(long, default_value = "0")]
    doubt: i32,

    /// Obsession
    #[arg(long, default_value = "0")]
    obsession: i32,

    /// Attention meter
    #[arg(long, default_value = "0")]
    attention: i32,

    /// Thermal vision on
    #[arg(long)]
    thermal: bool,

    /// Skill as Name=level (repeatable)
    #[arg(long = "skill")]
    skills: Vec<String>,

    /// Evidence tag held (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Force a fracture of this kind
    #[arg(long)]
    fracture: Option<String>,

    /// RNG seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Engine config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also show the undistorted text and what changed
    #[arg(long)]
    explain: bool,
}

impl StateArgs {
    fn snapshot(&self) -> Result<GameSnapshot, String> {
        let mut snapshot = GameSnapshot {
            attention: self.attention,
            thermal_mode: self.thermal,
            mental: MentalReadings {
                sanity: self.sanity.clamp(0, 100),
                stress: self.stress.max(0),
                doubt: self.doubt.max(0),
                obsession: self.obsession.max(0),
                paranoia: 0,
            },
            ..GameSnapshot::default()
        };
        for arg in &self.skills {
            let (name, level) = super::parse_skill_arg(arg)?;
            snapshot = snapshot.with_skill(&name, level);
        }
        for tag in &self.tags {
            snapshot = snapshot.with_evidence_tag(tag.clone());
        }
        if let Some(kind) = &self.fracture {
            let kind = FractureKind::parse(kind).ok_or_else(|| format!("unknown fracture kind '{kind}'"))?;
            snapshot = snapshot.with_flag(FORCE_FLAG, kind.name());
        }
        Ok(snapshot)
    }
}

pub fn run(content: &Path, scene_id: &str, state: &StateArgs) -> Result<(), String> {
    let config = super::load_config(state.config.as_deref())?;
    let pack = super::load_content(content)?;
    let lens = super::parse_lens(&state.lens)?;
    let snapshot = state.snapshot()?;
    let scene = pack.scene_or_placeholder(scene_id);

    let composer = TextComposer::new(&config);
    let mut rng = StdRng::seed_from_u64(state.seed);
    let composed = composer.compose(&scene.id, &scene.text, lens, &snapshot, &mut rng);
    let highlighter = Highlighter::new(pack.keywords.as_slice()).map_err(|e| e.to_string())?;

    if !scene.title.is_empty() {
        println!("{}", scene.title.bold());
        println!();
    }
    println!("{}", highlighter.highlight(&composed.full_text));

    if state.explain {
        println!();
        println!("{}", "--- layered text ---".dimmed());
        println!("{}", composed.raw_text);
        let distortions: Vec<String> = composed
            .distortions
            .iter()
            .map(|d| format!("{d:?}"))
            .collect();
        println!();
        println!("  inserts:     {}", list_or_none(&composed.inserts_applied));
        println!("  distortions: {}", list_or_none(&distortions));
        println!(
            "  lens:        {}",
            composed.lens_used.map_or("none".to_string(), |l| l.to_string())
        );
        println!(
            "  fracture:    {}",
            composed.fracture.map_or("none".to_string(), |k| k.to_string())
        );
    }
    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
