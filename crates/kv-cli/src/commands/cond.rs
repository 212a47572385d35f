use colored::Colorize;
use kv_dsl::render_diagnostics;

pub fn run(expr: &str, json: bool) -> Result<(), String> {
    match kv_dsl::parse_condition(expr) {
        Ok(condition) => {
            println!("  {} {condition}", "ok:".green());
            if json {
                let tree = serde_json::to_string_pretty(&condition).map_err(|e| e.to_string())?;
                println!("{tree}");
            }
            Ok(())
        }
        Err(diagnostics) => {
            eprint!("{}", render_diagnostics(expr, "<expr>", &diagnostics));
            let errors = diagnostics.len();
            Err(format!(
                "condition has {} error{}",
                errors,
                if errors == 1 { "" } else { "s" }
            ))
        }
    }
}
