//! Integration tests for the kv-cli binary commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONTENT: &str = r#"{
    "start": "diner",
    "keywords": ["aurora", "aurora borealis"],
    "scenes": [
        {
            "id": "diner",
            "title": "Nordlys Diner",
            "text": {
                "base": "Neon hums over empty booths. The aurora borealis bleeds through the window.",
                "inserts": [
                    {"id": "blood", "text": "A smear of blood on the counter.",
                     "condition": "skill(Forensics) >= 3", "position": "AFTER_BASE"}
                ]
            },
            "synonyms": {"objects": {"ingrid": ["waitress"]}},
            "passive_clues": [
                {"clue_id": "calendar", "text": "The calendar stops at October."}
            ],
            "evidence": [
                {"id": "witness_01", "description": "A trucker saw a tall man by the pumps.",
                 "category": "testimony", "tags": ["witness_seen"]}
            ],
            "dialogue": [
                {"id": "alibi", "speaker": "ingrid",
                 "text": "I was alone. No one else was around that night."}
            ],
            "exits": {"north": "lighthouse"}
        },
        {"id": "lighthouse", "text": "The lamp is dark.", "exits": {"south": "diner"}}
    ]
}"#;

const EVIDENCE: &str = r#"[
    {"id": "witness_01", "description": "A trucker saw a tall man by the pumps.",
     "category": "testimony", "tags": ["witness_seen"]}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("content.json"), CONTENT).unwrap();
        fs::write(dir.path().join("evidence.json"), EVIDENCE).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn kv() -> Command {
    Command::cargo_bin("kv").unwrap()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_fixed_dice_success() {
    kv().args(["check", "0", "6", "--dice", "3,4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"))
        .stdout(predicate::str::contains("3 + 4"));
}

#[test]
fn check_double_ones_fail() {
    kv().args(["check", "10", "2", "--dice", "1,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CRITICAL FAILURE"));
}

#[test]
fn check_bad_dice_errors() {
    kv().args(["check", "3", "8", "--dice", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_compound_command() {
    kv().args(["parse", "look at desk then take book"])
        .assert()
        .success()
        .stdout(predicate::str::contains("look"))
        .stdout(predicate::str::contains("desk"))
        .stdout(predicate::str::contains("take"))
        .stdout(predicate::str::contains("book"));
}

#[test]
fn parse_uses_scene_synonyms() {
    let fx = Fixture::new();
    kv().args(["parse", "talk to waitress", "--content"])
        .arg(fx.path("content.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ingrid"));
}

#[test]
fn parse_suggests_close_verb() {
    kv().args(["parse", "grabb lantern"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing understood"))
        .stdout(predicate::str::contains("did you mean 'take'"));
}

// ---------------------------------------------------------------------------
// cond
// ---------------------------------------------------------------------------

#[test]
fn cond_prints_canonical_form() {
    kv().args(["cond", "skill(Logic) >= 3 and flag(met_priest)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok:"))
        .stdout(predicate::str::contains("met_priest"));
}

#[test]
fn cond_json_tree() {
    kv().args(["cond", "has_tag(witness_seen)", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"has_tag\""));
}

#[test]
fn cond_reports_errors() {
    kv().args(["cond", "skill(Logic) >="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: condition has"));
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[test]
fn scan_catches_lie() {
    let fx = Fixture::new();
    kv().args(["scan", "I was alone. No one else was around that night.", "--dice", "6,6", "--evidence"])
        .arg(fx.path("evidence.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[SKEPTICISM]"))
        .stdout(predicate::str::contains("witness_01"));
}

#[test]
fn scan_ungated_lists_matches() {
    let fx = Fixture::new();
    kv().args(["scan", "No one was there.", "--ungated", "--evidence"])
        .arg(fx.path("evidence.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("witness_seen"));
}

#[test]
fn scan_innocent_dialogue() {
    let fx = Fixture::new();
    kv().args(["scan", "Coffee's fresh.", "--evidence"])
        .arg(fx.path("evidence.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No interrupts"));
}

#[test]
fn scan_missing_file_errors() {
    kv().args(["scan", "hello", "--evidence", "/nonexistent/evidence.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// compose
// ---------------------------------------------------------------------------

#[test]
fn compose_highlights_longest_keyword() {
    let fx = Fixture::new();
    kv().arg("compose")
        .arg(fx.path("content.json"))
        .arg("diner")
        .assert()
        .success()
        .stdout(predicate::str::contains("**aurora borealis**"))
        .stdout(predicate::str::contains("Nordlys Diner"));
}

#[test]
fn compose_applies_skill_insert() {
    let fx = Fixture::new();
    kv().arg("compose")
        .arg(fx.path("content.json"))
        .args(["diner", "--skill", "Forensics=3", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A smear of blood"))
        .stdout(predicate::str::contains("inserts:     blood"));
}

#[test]
fn compose_forced_fracture() {
    let fx = Fixture::new();
    kv().arg("compose")
        .arg(fx.path("content.json"))
        .args(["lighthouse", "--fracture", "wrong_name", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("continues...]"))
        .stdout(predicate::str::contains("fracture:    wrong_name"));
}

#[test]
fn compose_missing_scene_degrades() {
    let fx = Fixture::new();
    kv().arg("compose")
        .arg(fx.path("content.json"))
        .arg("attic")
        .assert()
        .success()
        .stdout(predicate::str::contains("[No text defined for attic]"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_good_pack() {
    let fx = Fixture::new();
    kv().arg("validate")
        .arg(fx.path("content.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"))
        .stdout(predicate::str::contains("2 scenes"));
}

#[test]
fn validate_rejects_malformed_condition() {
    let fx = Fixture::new();
    let bad = fx.path("bad.json");
    fs::write(
        &bad,
        r#"{"scenes": [{"id": "cellar", "passive_clues": [
            {"clue_id": "stain", "visible_when": "flag(x) >"}
        ]}]}"#,
    )
    .unwrap();
    kv().arg("validate")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed condition"))
        .stderr(predicate::str::contains("stain"));
}

#[test]
fn validate_rejects_bad_config() {
    let fx = Fixture::new();
    let config = fx.path("config.json");
    fs::write(&config, r#"{"fracture": {"probability": 1.5}}"#).unwrap();
    kv().arg("validate")
        .arg(fx.path("content.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fracture.probability"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_scripted_session() {
    let fx = Fixture::new();
    kv().arg("play")
        .arg(fx.path("content.json"))
        .args(["--skill", "Skepticism=6"])
        .write_stdin("take witness_01\ngo north\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collected witness_01"))
        .stdout(predicate::str::contains("The lamp is dark."))
        .stdout(predicate::str::contains("2 turns, 1 evidence collected"));
}

#[test]
fn play_scripted_dice_catch_lie() {
    let fx = Fixture::new();
    kv().arg("play")
        .arg(fx.path("content.json"))
        .args(["--skill", "Skepticism=3", "--dice", "6,5"])
        .write_stdin("take witness_01\ntalk to waitress\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[SKEPTICISM]"))
        .stdout(predicate::str::contains("witness_01: A trucker saw"));
}

#[test]
fn play_rejects_unknown_lens() {
    let fx = Fixture::new();
    kv().arg("play")
        .arg(fx.path("content.json"))
        .args(["--lens", "cynic"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown lens"));
}
