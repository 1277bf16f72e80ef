//! `ac3` — arc-consistency pruning over slot domains.
//!
//! Before search starts, every directed arc `(a, b)` is revised until a
//! fixpoint: a word stays in `domain[a]` only while each of its overlaps
//! with `b` has some supporting word left in `domain[b]`. A wiped-out
//! domain makes the pass report inconsistency, but the caller proceeds to
//! search anyway — the empty domain dead-ends the search immediately, and
//! treating the wipeout as informational keeps AC-3 failure non-terminal.

use std::collections::VecDeque;

use log::debug;

use crate::errors::SolveError;
use crate::overlaps::Overlaps;
use crate::solver::CancelToken;
use crate::word_list::{WordId, WordList};

/// What an AC-3 pass did to the domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ac3Outcome {
    /// False if some domain was emptied (the CSP is already unsatisfiable).
    pub arc_consistent: bool,
    /// Number of `revise` invocations, for stats.
    pub revisions: u64,
    /// Total candidates pruned across all domains.
    pub removed: usize,
}

/// Run AC-3 to a fixpoint over `domains`, in place.
///
/// The queue starts with every directed arc in slot-index order and is
/// FIFO throughout, so the final domains are deterministic.
///
/// # Errors
///
/// `Cancelled` if the token fires; domains are left in their partially
/// pruned state (pruning only removes words that can never participate in a
/// solution, so a later search over the partial state is still sound).
pub fn enforce(
    domains: &mut [Vec<WordId>],
    overlaps: &Overlaps,
    words: &WordList,
    cancel: &CancelToken,
) -> Result<Ac3Outcome, SolveError> {
    let mut queue: VecDeque<(usize, usize)> = VecDeque::with_capacity(overlaps.arc_count());
    for a in 0..domains.len() {
        for &(b, _) in overlaps.neighbors(a) {
            queue.push_back((a, b));
        }
    }

    let mut outcome = Ac3Outcome { arc_consistent: true, revisions: 0, removed: 0 };

    while let Some((a, b)) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        outcome.revisions += 1;
        let removed = revise(domains, a, b, overlaps, words);
        if removed == 0 {
            continue;
        }
        outcome.removed += removed;

        if domains[a].is_empty() {
            debug!("AC-3 emptied domain of slot {a}");
            outcome.arc_consistent = false;
            // Keep draining: other arcs may still prune usefully, and the
            // queue only shrinks once nothing changes.
        }
        for &(x, _) in overlaps.neighbors(a) {
            if x != b {
                queue.push_back((x, a));
            }
        }
    }

    debug!(
        "AC-3 done: {} revisions, {} candidates removed, consistent={}",
        outcome.revisions, outcome.removed, outcome.arc_consistent
    );
    Ok(outcome)
}

/// Remove words from `domain[a]` that lost all support in `domain[b]`.
///
/// A word `w` survives iff every overlap `(i, j)` between the slots has at
/// least one word left in `domain[b]` whose letter at `j` equals `w[i]`.
/// Returns the number of words removed.
fn revise(
    domains: &mut [Vec<WordId>],
    a: usize,
    b: usize,
    overlaps: &Overlaps,
    words: &WordList,
) -> usize {
    let Some(pairs) = overlaps.between(a, b) else {
        return 0;
    };

    // Letters available at each constrained position of b, as 26-bit masks.
    let support: Vec<u32> = pairs
        .iter()
        .map(|&(_, j)| {
            domains[b]
                .iter()
                .fold(0u32, |mask, &w| mask | 1 << (words.word(w).as_bytes()[j] - b'A'))
        })
        .collect();

    let before = domains[a].len();
    domains[a].retain(|&w| {
        let bytes = words.word(w).as_bytes();
        pairs
            .iter()
            .zip(&support)
            .all(|(&(i, _), &mask)| mask & 1 << (bytes[i] - b'A') != 0)
    });
    before - domains[a].len()
}
