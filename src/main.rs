use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use instant::Instant;

use gridfill::grid::Grid;
use gridfill::report::GridExport;
use gridfill::slots::extract_slots;
use gridfill::solver::{CancelToken, Deadline, SolveConfig, SolveProgress, Solver};
use gridfill::word_list::WordList;

/// Crossword grid fill solver
#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ", built ", env!("BUILD_TIMESTAMP"), ")"), about, long_about = None)]
struct Cli {
    /// Path to the grid file (one row per line, comma-separated cell
    /// tokens: `#` block, `.` empty, `A`-`Z` letter, integer number)
    grid: String,

    /// Path to the word list file (`word;score` or bare words per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/wordlist.dict")
    )]
    word_list: String,

    /// Minimum score filter for scored word lists
    #[arg(short = 'm', long, default_value_t = 50)]
    min_score: i32,

    /// Number of complete fills to collect before stopping
    #[arg(short = 'n', long, default_value_t = 1)]
    max_solutions: usize,

    /// RNG seed; fixing it makes the fill reproducible
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Print the grid/slot export as JSON instead of solving
    #[arg(long)]
    export_grid: bool,

    /// Verbose solver logging
    #[arg(short, long)]
    debug: bool,
}

/// Entry point: delegate to [`try_main`] and translate errors into a
/// nonzero exit code so scripts can detect failure.
fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Stderr logging for the CLI. `RUST_LOG` wins when set; `--debug` only
/// moves the default filter.
fn init_logging(debug_enabled: bool) {
    let default_filter = if debug_enabled { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // 1. Load and validate the grid.
    let grid_text = std::fs::read_to_string(&cli.grid)
        .map_err(|e| format!("failed to read grid from '{}': {e}", cli.grid))?;
    let grid = Grid::parse(&grid_text)?;

    if cli.export_grid {
        let slots = extract_slots(&grid);
        println!("{}", GridExport::new(&grid, &slots).to_json()?);
        return Ok(());
    }

    // 2. Load the word list, falling back to the built-in list when the
    //    file is unreadable.
    let t_load = Instant::now();
    let words = match WordList::load_from_path(&cli.word_list, cli.min_score) {
        Ok(wl) => wl,
        Err(e) => {
            log::warn!("{e}; using the built-in fallback list");
            WordList::fallback()
        }
    };
    let load_secs = t_load.elapsed().as_secs_f64();

    // 3. Solve. A timeout, when requested, rides on the cancellation token
    //    via the progress callback.
    let cancel = CancelToken::new();
    let deadline = cli.timeout_secs.map(|secs| Deadline::after(Duration::from_secs(secs)));
    let watchdog = cancel.clone();
    let config = SolveConfig {
        max_solutions: cli.max_solutions,
        rng_seed: cli.seed,
        cancel,
        on_progress: deadline.map(|d| {
            Box::new(move |_: &SolveProgress| {
                if d.passed() {
                    watchdog.cancel();
                }
            }) as Box<dyn FnMut(&SolveProgress)>
        }),
        ..Default::default()
    };

    let solver = Solver::new();
    let solution = solver.solve(&grid, &words, config)?;

    // 4. Print the fill on stdout.
    for row in &solution.filled {
        println!("{row}");
    }
    println!();
    for (number, word) in &solution.across {
        println!("{number}A: {word}");
    }
    for (number, word) in &solution.down {
        println!("{number}D: {word}");
    }

    // 5. Diagnostics on stderr.
    let stats = &solution.stats;
    eprintln!(
        "Loaded {} words in {load_secs:.3}s; filled in {:.3}s ({} recursive calls, {} AC-3 revisions, seed {}).",
        words.len(),
        stats.elapsed.as_secs_f64(),
        stats.recursive_calls,
        stats.ac3_revisions,
        stats.rng_seed,
    );
    if !solution.alternates.is_empty() {
        eprintln!("{} additional fill(s) found.", solution.alternates.len());
    }

    Ok(())
}
