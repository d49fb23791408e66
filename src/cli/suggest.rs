//! Warm-up suggestion for a workout selection
//!
//! Resolves the selected workouts against the catalog, searches for minimal
//! covering warm-ups, picks one of them at random and records the attempt.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;

use super::app::{make_rng, SearchArgs};
use super::catalog_cmd::{current_project, resolve_catalog};
use super::output::Output;
use crate::domain::{find_warmups, SearchError, WarmupAttempt};
use crate::storage::Config;

pub fn run(output: &Output, selected: &[String], catalog: Option<&Path>, args: &SearchArgs) -> Result<()> {
    let project = current_project()?;
    let catalog = resolve_catalog(output, catalog, project.as_ref())?;

    let config = match &project {
        Some(project) => project.config().clone(),
        None => Config::load()?,
    };
    let (params, seed) = args.resolve(config.search());
    let record = project
        .as_ref()
        .filter(|_| config.project.record_history)
        .map(|p| p.history());

    let workouts = catalog.resolve_workouts(selected)?;
    let matrix = catalog.coverage_for(&workouts)?;
    output.verbose_ctx(
        "suggest",
        &format!(
            "Coverage matrix: {} warm-ups x {} categories, max_moves={}, max_out={}, seed={:?}",
            matrix.movement_count(),
            matrix.category_count(),
            params.max_moves,
            params.max_out,
            seed
        ),
    );

    let mut rng = make_rng(seed);
    let start = Instant::now();
    let result = find_warmups(&matrix, params, &mut rng);
    let ex_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let options = match result {
        Ok(options) => options,
        Err(err @ SearchError::InvalidParameter(_)) => return Err(err.into()),
        Err(err) => {
            if let Some(history) = &record {
                history.append(&WarmupAttempt::failed(workouts.clone(), Some(ex_time_ms)))?;
                output.verbose_ctx("suggest", "Recorded failed attempt");
            }
            return Err(err).with_context(|| {
                format!("Could not build a warm-up for {}", workouts.join(", "))
            });
        }
    };

    let chosen = options
        .choose(&mut rng)
        .cloned()
        .context("Search returned no warm-ups")?;
    output.verbose_ctx(
        "suggest",
        &format!("{} option(s) found in {:.2} ms", options.len(), ex_time_ms),
    );

    let attempt = WarmupAttempt::passed(
        workouts.clone(),
        chosen.movements().to_vec(),
        options.len(),
        ex_time_ms,
    );
    if let Some(history) = &record {
        history.append(&attempt)?;
        output.verbose_ctx("suggest", &format!("Recorded attempt {}", attempt.id));
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "workouts": workouts,
            "warmup": chosen,
            "options": options,
            "ex_time_ms": ex_time_ms,
            "seed": seed,
            "attempt": record.as_ref().map(|_| attempt.id.to_string()),
        }));
    } else {
        println!("Warm-up for {}:", workouts.join(", "));
        for movement in chosen.movements() {
            println!("  - {}", movement);
        }

        let others: Vec<Vec<String>> = options
            .iter()
            .filter(|o| **o != chosen)
            .map(|o| o.movements().to_vec())
            .collect();
        if !others.is_empty() {
            println!();
            println!("Other options ({}):", others.len());
            output.options(&others);
        }
    }

    Ok(())
}
