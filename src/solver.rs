//! `solver` — the full solve pipeline and its backtracking search.
//!
//! A solve is a linear pass: slot extraction → overlap constraints → domain
//! initialization → AC-3 → depth-first search → solution report. The search
//! picks slots by minimum-remaining-values with degree and seeded-random
//! tie-breaks, orders candidate words by ascending letter-frequency score
//! (a least-constraining-value approximation), forward-checks neighbor
//! domains on every tentative assignment, and restores them verbatim on
//! backtrack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use instant::Instant;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::ac3;
use crate::domains::init_domains;
use crate::errors::SolveError;
use crate::grid::Grid;
use crate::overlaps::Overlaps;
use crate::report::{build_solution, Solution};
use crate::slots::extract_slots;
use crate::word_list::{WordId, WordList};

/// Hard cap on how many complete fills one solve will collect, regardless
/// of what the configuration asks for.
pub const MAX_SOLUTIONS: usize = 100;

/// Default number of recursive calls between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1024;

/// Cooperative cancellation handle.
///
/// Cheap to clone; all clones observe the same flag. The solver polls it at
/// every recursion entry and every AC-3 dequeue and unwinds cleanly when it
/// fires, restoring every domain snapshot it owns on the way out.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A wall-clock cutoff, for layering a timeout over [`CancelToken`]
/// (typically: a progress callback that cancels once the deadline passes).
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self { at: Instant::now() + limit }
    }

    pub fn passed(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Snapshot handed to the progress callback.
#[derive(Debug, Clone, Copy)]
pub struct SolveProgress {
    pub recursive_calls: u64,
    /// Slots currently assigned on the search path.
    pub assigned: usize,
    pub slot_count: usize,
}

/// Per-solve configuration.
///
/// The progress callback is invoked synchronously from the solver's own
/// call stack every `progress_interval` recursive calls; it must not
/// reenter the solver (a reentrant `solve` on the same instance fails with
/// `Busy`).
pub struct SolveConfig<'cb> {
    /// How many complete fills to collect before stopping (clamped to
    /// `1..=MAX_SOLUTIONS`). The first fill found is always the one
    /// reported as primary.
    pub max_solutions: usize,
    /// Fixing the seed makes the whole solve reproducible; `None` draws one
    /// from OS entropy.
    pub rng_seed: Option<u64>,
    pub cancel: CancelToken,
    pub progress_interval: u64,
    pub on_progress: Option<Box<dyn FnMut(&SolveProgress) + 'cb>>,
}

impl Default for SolveConfig<'_> {
    fn default() -> Self {
        Self {
            max_solutions: 1,
            rng_seed: None,
            cancel: CancelToken::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            on_progress: None,
        }
    }
}

/// Counters reported alongside a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveStats {
    pub recursive_calls: u64,
    pub ac3_revisions: u64,
    pub elapsed: Duration,
    /// Seed actually used, so any run can be reproduced.
    pub rng_seed: u64,
}

/// A crossword fill solver.
///
/// The instance itself is almost stateless: it only tracks whether a solve
/// is currently in flight, to refuse concurrent `solve` calls. All
/// per-solve state lives on the call stack, so independent instances can
/// run in parallel against one shared [`WordList`].
#[derive(Debug, Default)]
pub struct Solver {
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a solve unwinds, by any path.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solve the grid against the dictionary.
    ///
    /// # Errors
    ///
    /// - `NoSlots` if the grid yields no slot of length ≥ 2.
    /// - `NoSolution` if the search space is exhausted.
    /// - `Cancelled` if the configured token fires mid-solve.
    /// - `Busy` if another solve is already running on this instance.
    ///
    /// (`InvalidGrid` / `InvalidDictionary` are rejected earlier, when the
    /// `Grid` and `WordList` are constructed.)
    pub fn solve(
        &self,
        grid: &Grid,
        words: &WordList,
        config: SolveConfig<'_>,
    ) -> Result<Solution, SolveError> {
        let _guard = self.acquire()?;
        let start = Instant::now();

        let slots = extract_slots(grid);
        if slots.is_empty() {
            return Err(SolveError::NoSlots);
        }
        debug!("extracted {} slots", slots.len());

        let overlaps = Overlaps::build(&slots);
        let mut domains = init_domains(&slots, &grid.prefilled(), words);

        let ac3_outcome = ac3::enforce(&mut domains, &overlaps, words, &config.cancel)?;
        if !ac3_outcome.arc_consistent {
            // Informational only: the emptied domain will dead-end the
            // search on its own.
            info!("AC-3 emptied a domain; continuing into search");
        }

        let seed = config.rng_seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        // Run-to-run diversity: candidate order within a domain carries no
        // meaning after AC-3, and LCV re-sorts per step anyway.
        for domain in &mut domains {
            domain.shuffle(&mut rng);
        }

        let slot_count = domains.len();
        let mut search = Search {
            overlaps: &overlaps,
            words,
            domains,
            assignment: vec![None; slot_count],
            assigned: 0,
            found: Vec::new(),
            max_solutions: config.max_solutions.clamp(1, MAX_SOLUTIONS),
            cancel: config.cancel,
            progress_interval: config.progress_interval.max(1),
            on_progress: config.on_progress,
            rng,
            recursive_calls: 0,
        };
        search.run()?;

        if search.found.is_empty() {
            return Err(SolveError::NoSolution);
        }
        let stats = SolveStats {
            recursive_calls: search.recursive_calls,
            ac3_revisions: ac3_outcome.revisions,
            elapsed: start.elapsed(),
            rng_seed: seed,
        };
        debug!(
            "solved: {} fill(s) in {} recursive calls ({:?})",
            search.found.len(),
            stats.recursive_calls,
            stats.elapsed
        );
        Ok(build_solution(grid, &slots, &search.found, words, stats))
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, SolveError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(SolveError::Busy);
        }
        Ok(BusyGuard { flag: &self.in_flight })
    }
}

/// One-shot convenience wrapper around [`Solver::solve`].
///
/// # Errors
///
/// Same conditions as [`Solver::solve`] (minus `Busy`, which a fresh
/// instance cannot hit).
pub fn solve_grid(
    grid: &Grid,
    words: &WordList,
    config: SolveConfig<'_>,
) -> Result<Solution, SolveError> {
    Solver::new().solve(grid, words, config)
}

/// Mutable search state for one solve. Lives for the duration of the
/// recursion and is dropped before the solution report is built.
struct Search<'a, 'cb> {
    overlaps: &'a Overlaps,
    words: &'a WordList,
    domains: Vec<Vec<WordId>>,
    /// Chosen word per slot; `None` while unassigned.
    assignment: Vec<Option<WordId>>,
    assigned: usize,
    /// Complete fills collected so far (one `WordId` per slot).
    found: Vec<Vec<WordId>>,
    max_solutions: usize,
    cancel: CancelToken,
    progress_interval: u64,
    on_progress: Option<Box<dyn FnMut(&SolveProgress) + 'cb>>,
    rng: StdRng,
    recursive_calls: u64,
}

/// Saved neighbor domains for one forward-check, restored on backtrack.
type Snapshots = Vec<(usize, Vec<WordId>)>;

impl Search<'_, '_> {
    /// Depth-first search. `Ok(true)` means the solution quota is met and
    /// the whole recursion should unwind.
    fn run(&mut self) -> Result<bool, SolveError> {
        self.recursive_calls += 1;
        self.tick_progress();
        if self.cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        if self.assigned == self.assignment.len() {
            if let Some(fill) = self.assignment.iter().copied().collect::<Option<Vec<_>>>() {
                self.found.push(fill);
            }
            return Ok(self.found.len() >= self.max_solutions);
        }

        let slot = self.select_slot();
        for word in self.order_values(slot) {
            if !self.agrees_with_assigned(slot, word) {
                continue;
            }
            let Some(saved) = self.forward_check(slot, word) else {
                continue;
            };

            self.assignment[slot] = Some(word);
            self.assigned += 1;
            let outcome = self.run();
            self.assignment[slot] = None;
            self.assigned -= 1;
            // Restore before propagating anything, including cancellation,
            // so every frame leaves the domains exactly as it found them.
            self.restore(saved);

            if outcome? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// MRV, then highest degree, then a uniform random pick among ties.
    fn select_slot(&mut self) -> usize {
        let mut ties: Vec<usize> = Vec::new();
        let mut best_size = usize::MAX;
        let mut best_degree = 0;

        for slot in 0..self.assignment.len() {
            if self.assignment[slot].is_some() {
                continue;
            }
            let size = self.domains[slot].len();
            let degree = self.overlaps.degree(slot);
            if size < best_size || (size == best_size && degree > best_degree) {
                best_size = size;
                best_degree = degree;
                ties.clear();
                ties.push(slot);
            } else if size == best_size && degree == best_degree {
                ties.push(slot);
            }
        }

        debug_assert!(!ties.is_empty(), "select_slot called with all slots assigned");
        ties[self.rng.gen_range(0..ties.len())]
    }

    /// Candidates for a slot, least-constraining first: shuffled for tie
    /// diversity, then stably sorted by ascending letter-frequency sum.
    fn order_values(&mut self, slot: usize) -> Vec<WordId> {
        let mut values = self.domains[slot].clone();
        values.shuffle(&mut self.rng);
        values.sort_by_key(|&id| self.words.frequency_score(id));
        values
    }

    /// Check `word` against every already-assigned crossing slot.
    fn agrees_with_assigned(&self, slot: usize, word: WordId) -> bool {
        let bytes = self.words.word(word).as_bytes();
        self.overlaps.neighbors(slot).iter().all(|&(n, ref pairs)| {
            match self.assignment[n] {
                Some(other) => {
                    let other_bytes = self.words.word(other).as_bytes();
                    pairs.iter().all(|&(i, j)| bytes[i] == other_bytes[j])
                }
                None => true,
            }
        })
    }

    /// Narrow every unassigned neighbor to the words compatible with
    /// `word` at the shared cells. Returns the snapshots to restore on
    /// backtrack, or `None` (with everything already restored) if some
    /// neighbor was left empty.
    fn forward_check(&mut self, slot: usize, word: WordId) -> Option<Snapshots> {
        let words = self.words;
        let bytes = words.word(word).as_bytes();
        let mut saved: Snapshots = Vec::new();

        let overlaps = self.overlaps;
        for &(n, ref pairs) in overlaps.neighbors(slot) {
            if self.assignment[n].is_some() {
                continue;
            }
            let narrowed: Vec<WordId> = self.domains[n]
                .iter()
                .copied()
                .filter(|&cand| {
                    let cand_bytes = words.word(cand).as_bytes();
                    pairs.iter().all(|&(i, j)| bytes[i] == cand_bytes[j])
                })
                .collect();
            let wiped = narrowed.is_empty();
            saved.push((n, std::mem::replace(&mut self.domains[n], narrowed)));
            if wiped {
                self.restore(saved);
                return None;
            }
        }
        Some(saved)
    }

    fn restore(&mut self, saved: Snapshots) {
        for (slot, domain) in saved {
            self.domains[slot] = domain;
        }
    }

    fn tick_progress(&mut self) {
        if self.recursive_calls % self.progress_interval != 0 {
            return;
        }
        let progress = SolveProgress {
            recursive_calls: self.recursive_calls,
            assigned: self.assigned,
            slot_count: self.assignment.len(),
        };
        if let Some(cb) = self.on_progress.as_mut() {
            cb(&progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoke_grid() -> Grid {
        Grid::parse("1,.,.\n.,#,.\n.,.,#").unwrap()
    }

    fn seeded(seed: u64) -> SolveConfig<'static> {
        SolveConfig { rng_seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn solves_the_smoke_grid() {
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();
        let solution = solve_grid(&smoke_grid(), &words, seeded(7)).unwrap();

        let across = &solution.assignment["1ACROSS"];
        let down = &solution.assignment["1DOWN"];
        assert_eq!(across.as_bytes()[0], down.as_bytes()[0], "shared cell must agree");
        assert!(solution.stats.recursive_calls > 0);
    }

    #[test]
    fn prefilled_pattern_is_honored() {
        let grid = Grid::parse("1,A,.\n.,.,.\n.,.,.").unwrap();
        let words = WordList::new(["CAT", "CAR", "BAT"]).unwrap();
        let solution = solve_grid(&grid, &words, seeded(3)).unwrap();
        assert_eq!(solution.assignment["1ACROSS"].as_bytes()[1], b'A');
    }

    #[test]
    fn no_slots_is_reported() {
        let grid = Grid::parse("#,#\n#,#").unwrap();
        let words = WordList::fallback();
        let err = solve_grid(&grid, &words, SolveConfig::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoSlots));
    }

    #[test]
    fn missing_lengths_mean_no_solution() {
        // One across slot of length 2, dictionary has no 2-letter words.
        let grid = Grid::parse("1,.\n#,#").unwrap();
        let words = WordList::new(["CAT", "HOUSE"]).unwrap();
        let err = solve_grid(&grid, &words, SolveConfig::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }

    #[test]
    fn incompatible_overlap_is_no_solution_after_search() {
        // 1ACROSS ends where 2DOWN starts; AB's B never starts a word.
        let grid = Grid::parse("1,2\n.,.").unwrap();
        let words = WordList::new(["AB"]).unwrap();
        let err = solve_grid(&grid, &words, SolveConfig::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }

    #[test]
    fn pre_cancelled_token_aborts() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let config = SolveConfig { cancel, ..Default::default() };
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();
        let err = solve_grid(&smoke_grid(), &words, config).unwrap_err();
        assert!(matches!(err, SolveError::Cancelled));
    }

    #[test]
    fn same_seed_same_fill() {
        let words = WordList::new(["CAT", "CAR", "COT", "TAR", "TAB", "COO", "ACT"]).unwrap();
        let a = solve_grid(&smoke_grid(), &words, seeded(42)).unwrap();
        let b = solve_grid(&smoke_grid(), &words, seeded(42)).unwrap();
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.stats.recursive_calls, b.stats.recursive_calls);
    }

    #[test]
    fn max_solutions_collects_alternates() {
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();
        let config = SolveConfig { max_solutions: 10, rng_seed: Some(1), ..Default::default() };
        let solution = solve_grid(&smoke_grid(), &words, config).unwrap();
        assert!(!solution.alternates.is_empty(), "this grid has several fills");
        for alt in &solution.alternates {
            assert_ne!(*alt, solution.assignment);
        }
    }

    #[test]
    fn progress_callback_fires_and_can_cancel() {
        let cancel = CancelToken::new();
        let cancel_from_hook = cancel.clone();
        let mut calls_seen = 0u64;
        {
            let config = SolveConfig {
                cancel,
                progress_interval: 1,
                on_progress: Some(Box::new(|p: &SolveProgress| {
                    calls_seen = p.recursive_calls;
                    if p.recursive_calls >= 2 {
                        cancel_from_hook.cancel();
                    }
                })),
                rng_seed: Some(5),
                ..Default::default()
            };
            let words =
                WordList::new(["CAT", "CAR", "COT", "TAR", "TAB", "ACT", "TOT", "OAT"]).unwrap();
            let err = solve_grid(&smoke_grid(), &words, config).unwrap_err();
            assert!(matches!(err, SolveError::Cancelled));
        }
        assert!(calls_seen >= 2);
    }

    #[test]
    fn busy_while_a_solve_is_in_flight() {
        let solver = Solver::new();
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();
        let grid = smoke_grid();

        let mut nested: Option<SolveError> = None;
        let config = SolveConfig {
            progress_interval: 1,
            rng_seed: Some(9),
            on_progress: Some(Box::new(|_: &SolveProgress| {
                if nested.is_none() {
                    nested = solver.solve(&grid, &words, SolveConfig::default()).err();
                }
            })),
            ..Default::default()
        };
        solver.solve(&grid, &words, config).unwrap();
        assert!(matches!(nested, Some(SolveError::Busy)));
    }

    #[test]
    fn flag_clears_after_each_outcome() {
        let solver = Solver::new();
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();

        // Error path: cancelled solve must release the instance.
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = solver
            .solve(&smoke_grid(), &words, SolveConfig { cancel, ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, SolveError::Cancelled));

        // Success path right after.
        assert!(solver.solve(&smoke_grid(), &words, SolveConfig::default()).is_ok());
        assert!(solver.solve(&smoke_grid(), &words, SolveConfig::default()).is_ok());
    }
}
