//! Run the coverage search on a matrix file

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use super::app::{make_rng, SearchArgs};
use super::catalog_cmd::current_project;
use super::output::Output;
use crate::domain::find_warmups;
use crate::storage::{load_matrix, Config};

pub fn run(output: &Output, path: &Path, args: &SearchArgs) -> Result<()> {
    let config = match current_project()? {
        Some(project) => project.config().clone(),
        None => Config::load()?,
    };
    let (params, seed) = args.resolve(config.search());

    let matrix = load_matrix(path)?;
    output.verbose_ctx(
        "solve",
        &format!(
            "Loaded {} movements x {} categories from {}",
            matrix.movement_count(),
            matrix.category_count(),
            path.display()
        ),
    );

    let mut rng = make_rng(seed);
    let start = Instant::now();
    let options = find_warmups(&matrix, params, &mut rng)
        .with_context(|| format!("No covering warm-up for {}", path.display()))?;
    let ex_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    if output.is_json() {
        output.data(&serde_json::json!({
            "movements": matrix.movement_count(),
            "categories": matrix.categories(),
            "max_moves": params.max_moves,
            "max_out": params.max_out,
            "seed": seed,
            "ex_time_ms": ex_time_ms,
            "options": options,
        }));
    } else {
        println!(
            "Minimal warm-ups covering {} categories ({} found):",
            matrix.category_count(),
            options.len()
        );
        let options: Vec<Vec<String>> = options.into_iter().map(|o| o.into_vec()).collect();
        output.options(&options);
    }

    Ok(())
}
