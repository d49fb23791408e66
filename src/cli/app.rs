//! Main CLI application structure

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{catalog_cmd, history_cmd, solve, suggest};
use crate::domain::SearchParams;
use crate::storage::{Config, Project, SearchConfig};

#[derive(Parser)]
#[command(name = "warmup")]
#[command(author, version, about = "Plan short warm-ups that cover every movement category of a workout")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Search bounds shared by `suggest` and `solve`
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Longest warm-up to accept
    #[arg(long, short = 'm')]
    pub max_moves: Option<usize>,

    /// Branching cap at the first search level
    #[arg(long)]
    pub max_out: Option<usize>,

    /// Random seed for reproducible results
    #[arg(long, env = "WARMUP_SEED")]
    pub seed: Option<u64>,
}

impl SearchArgs {
    /// Applies the flags over configured defaults
    pub fn resolve(&self, config: &SearchConfig) -> (SearchParams, Option<u64>) {
        (
            config.params(self.max_moves, self.max_out),
            self.seed.or(config.seed),
        )
    }
}

/// Seeded generator, or one seeded from entropy
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new warm-up project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List workout movements that have linked warm-ups
    Workouts {
        /// Catalog file to use instead of the project's
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
    },

    /// Suggest a warm-up for one or more workout movements
    Suggest {
        /// Workout movements, e.g. "Snatch" "Pull-up"
        #[arg(required = true)]
        workouts: Vec<String>,

        /// Catalog file to use instead of the project's
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Find minimal warm-ups for a coverage matrix file
    Solve {
        /// Movement → categories mapping (toml, json or yaml)
        matrix: std::path::PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Inspect and edit the movement catalog
    #[command(subcommand)]
    Catalog(catalog_cmd::CatalogCommands),

    /// Show past warm-up attempts
    History {
        /// Number of attempts to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,

        /// Only show failed attempts
        #[arg(long)]
        failed: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warmup_cli={}", level)));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()
            .map(|global| OutputFormat::from(global.default_format))
            .unwrap_or_default(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("warmup starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .warmup directory at: {}", project.project_dir().display()),
            );
            output.success(&format!("Initialized warm-up project at {}", project.root().display()));
        }

        Commands::Workouts { catalog } => catalog_cmd::workouts(&output, catalog.as_deref())?,

        Commands::Suggest { workouts, catalog, search } => {
            output.verbose_ctx("suggest", &format!("Workouts: {:?}", workouts));
            suggest::run(&output, &workouts, catalog.as_deref(), &search)?
        }

        Commands::Solve { matrix, search } => solve::run(&output, &matrix, &search)?,

        Commands::Catalog(cmd) => catalog_cmd::run(cmd, &output)?,

        Commands::History { limit, failed } => history_cmd::run(&output, limit, failed)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rand::Rng;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_flags_override_config() {
        let args = SearchArgs {
            max_moves: Some(3),
            max_out: None,
            seed: None,
        };
        let config = SearchConfig {
            seed: Some(5),
            ..SearchConfig::default()
        };

        let (params, seed) = args.resolve(&config);
        assert_eq!(params, SearchParams::new(3, 7));
        assert_eq!(seed, Some(5));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: u64 = make_rng(Some(1)).gen();
        let b: u64 = make_rng(Some(1)).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_suggest_command() {
        let cli = Cli::try_parse_from(["warmup", "suggest", "Snatch", "Pull-up", "--max-moves", "4"])
            .unwrap();
        match cli.command {
            Commands::Suggest { workouts, search, .. } => {
                assert_eq!(workouts, vec!["Snatch", "Pull-up"]);
                assert_eq!(search.max_moves, Some(4));
            }
            _ => panic!("expected suggest"),
        }
    }
}
