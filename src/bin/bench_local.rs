//! `bench_local.rs` — quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing for a handful of grids on *your* machine.
//! - Loads the word list once, then fills each grid several times and
//!   reports the median.
//! - Every run uses a fixed seed so the numbers are comparable.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:       `cargo run --bin bench_local --release`
//! - Multiple repeats:      `cargo run --bin bench_local --release -- -r 5`
//! - Print the fills:       `cargo run --bin bench_local --release -- -p`
//! - See all flags:         `cargo run --bin bench_local -- --help`
//!
//! NOTES
//! -----
//! - This is *not* Criterion. It's quick and convenient, not statistically
//!   rigorous. Use the same machine and `--release` for comparable numbers.
//! - Grids live in `cases()` below; I/O stays outside the timed section.
//! - One warm-up run per grid is done (not included in timing).
//! - We report the *median* over repeats (more robust than mean for small N).

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;

use gridfill::grid::Grid;
use gridfill::solver::{solve_grid, SolveConfig};
use gridfill::word_list::WordList;

/// Local benchmark runner: load the word list once, time several grids.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the word list file
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/wordlist.dict")
    )]
    word_list: String,

    /// Minimum score filter
    #[arg(short = 'm', long, default_value_t = 50)]
    min_score: i32,

    /// Number of repeats per grid (median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 3)]
    num_repeats: usize,

    /// Print each grid's fill after timing
    #[arg(short = 'p', long = "print", default_value_t = false)]
    print_fills: bool,
}

/// Every timed run uses the same seed, so repeats measure the same search.
const BENCH_SEED: u64 = 0xC0FFEE;

struct Case {
    name: &'static str,
    grid: &'static str,
}

fn cases() -> Vec<Case> {
    vec![
        Case { name: "corner 3x3", grid: "1,.,.\n.,#,.\n.,.,#" },
        Case { name: "mini 4x4", grid: "1,2,3,#\n4,.,.,5\n6,.,.,.\n#,7,.,." },
        Case { name: "open 4x4", grid: "1,2,3,4\n5,.,.,.\n6,.,.,.\n7,.,.,." },
    ]
}

/// Robust central tendency for small samples; 0.0 when every run failed.
fn median(samples: &mut [f64]) -> f64 {
    samples.sort_unstable_by(f64::total_cmp);
    let mid = samples.len() / 2;
    match samples.len() {
        0 => 0.0,
        n if n % 2 == 0 => (samples[mid - 1] + samples[mid]) / 2.0,
        _ => samples[mid],
    }
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load the word list once. This I/O is *not* included in the timings.
    eprintln!("Loading word list from: {}", cli.word_list);
    let t_load = Instant::now();
    let words = WordList::load_from_path(&cli.word_list, cli.min_score)?;
    eprintln!("Loaded {} words in {:.3}s", words.len(), t_load.elapsed().as_secs_f64());

    let mut summary: Vec<(&str, f64, u64)> = Vec::new();

    for case in cases() {
        eprintln!("\n[{}]", case.name);
        let grid = match Grid::parse(case.grid) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("  ✗ Bad grid: {e}");
                continue;
            }
        };

        let config = || SolveConfig { rng_seed: Some(BENCH_SEED), ..Default::default() };

        // Warm-up run to touch code paths and caches; timing ignored.
        if let Err(e) = solve_grid(&grid, &words, config()) {
            eprintln!("  ✗ Warm-up failed: {e}");
            continue;
        }

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last_calls = 0u64;
        let mut last_fill: Vec<String> = Vec::new();
        for rep in 0..cli.num_repeats {
            let t_solve = Instant::now();
            match solve_grid(black_box(&grid), &words, config()) {
                Ok(solution) => {
                    let secs = t_solve.elapsed().as_secs_f64();
                    last_calls = black_box(solution.stats.recursive_calls);
                    last_fill = solution.filled;
                    times.push(secs);
                    eprintln!(
                        "  run {:>2}/{:>2}: {secs:.4}s ({last_calls} calls)",
                        rep + 1,
                        cli.num_repeats
                    );
                }
                Err(e) => eprintln!("  ✗ Run {}/{} failed: {e}", rep + 1, cli.num_repeats),
            }
        }

        if cli.print_fills {
            for row in &last_fill {
                println!("{row}");
            }
            println!();
        }

        summary.push((case.name, median(&mut times), last_calls));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<12} | {:>10} | {:>9}", "grid", "median (s)", "rec calls");
    eprintln!("{:-<12}-+-{:-<10}-+-{:-<9}", "", "", "");
    for (name, med, calls) in &summary {
        eprintln!("{name:<12} | {med:>10.4} | {calls:>9}");
    }

    Ok(())
}
