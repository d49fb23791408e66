//! History CLI command

use anyhow::Result;

use super::output::Output;
use crate::storage::Project;

pub fn run(output: &Output, limit: usize, failed_only: bool) -> Result<()> {
    let project = Project::open_current()?;
    let history = project.history();
    output.verbose_ctx("history", &format!("Reading {}", history.path().display()));

    let attempts = history.recent(limit, failed_only)?;

    if output.is_json() {
        output.data(&attempts);
        return Ok(());
    }

    if attempts.is_empty() {
        println!("No warm-up attempts recorded.");
        return Ok(());
    }

    println!("{:<10} {:<17} {:<6} {:<25} WARM-UP", "ID", "DATE", "STATUS", "WORKOUTS");
    println!("{}", "-".repeat(90));
    for attempt in &attempts {
        let status = if attempt.passed { "ok" } else { "FAILED" };
        let warmup = if attempt.passed {
            attempt.warmups.join(", ")
        } else {
            "-".to_string()
        };
        println!(
            "{:<10} {:<17} {:<6} {:<25} {}",
            attempt.id.to_string(),
            attempt.date.format("%Y-%m-%d %H:%M"),
            status,
            attempt.workouts.join(", "),
            warmup
        );
    }

    Ok(())
}
