//! `report` — turn a raw slot→word assignment into caller-facing output.
//!
//! The search works in dense indices and word ids; this module maps the
//! result back to stable slot names, across/down lists sorted by number,
//! and a per-cell letter projection for writing onto the grid. It also
//! holds the serde export types the editor consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};
use crate::slots::{Direction, Slot};
use crate::solver::SolveStats;
use crate::word_list::{WordId, WordList};

/// A completed solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Primary fill: slot name → word.
    pub assignment: BTreeMap<String, String>,
    /// Further fills when `max_solutions > 1`, in discovery order.
    pub alternates: Vec<BTreeMap<String, String>>,
    /// `(number, word)` pairs sorted by number ascending.
    pub across: Vec<(u32, String)>,
    pub down: Vec<(u32, String)>,
    /// Primary fill projected onto the grid: one char per cell, `#` for
    /// blocks, `.` for open cells no slot covers.
    pub filled: Vec<String>,
    pub stats: SolveStats,
}

/// Assemble a [`Solution`] from the fills the search collected.
/// `fills` must be non-empty; the first entry becomes the primary.
pub(crate) fn build_solution(
    grid: &Grid,
    slots: &[Slot],
    fills: &[Vec<WordId>],
    words: &WordList,
    stats: SolveStats,
) -> Solution {
    let named: Vec<BTreeMap<String, String>> = fills
        .iter()
        .map(|fill| {
            slots
                .iter()
                .zip(fill)
                .map(|(slot, &id)| (slot.name(), words.word(id).to_string()))
                .collect()
        })
        .collect();

    let primary = &fills[0];
    let mut across = Vec::new();
    let mut down = Vec::new();
    for (slot, &id) in slots.iter().zip(primary) {
        let pair = (slot.number, words.word(id).to_string());
        match slot.direction {
            Direction::Across => across.push(pair),
            Direction::Down => down.push(pair),
        }
    }
    across.sort_by_key(|&(n, _)| n);
    down.sort_by_key(|&(n, _)| n);

    let filled = project(grid, slots, primary, words)
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect();

    let mut named = named;
    let assignment = named.remove(0);
    Solution { assignment, alternates: named, across, down, filled, stats }
}

/// Project assigned words onto the grid, one char per cell.
///
/// Overlapping cells are written more than once but always agree, by
/// construction of the search. Cells outside every slot render as their
/// pre-filled letter, or `.` when open, or `#` when blocked.
pub fn project(
    grid: &Grid,
    slots: &[Slot],
    fill: &[WordId],
    words: &WordList,
) -> Vec<Vec<char>> {
    let mut out: Vec<Vec<char>> = (0..grid.rows())
        .map(|r| {
            (0..grid.cols())
                .map(|c| match grid.get(r, c) {
                    Cell::Block => '#',
                    Cell::Letter(b) => b as char,
                    _ => '.',
                })
                .collect()
        })
        .collect();

    for (slot, &id) in slots.iter().zip(fill) {
        for (&(r, c), b) in slot.cells.iter().zip(words.word(id).bytes()) {
            out[r][c] = b as char;
        }
    }
    out
}

/// New grid with the primary fill's letters fixed into every open cell, so
/// the result can be fed back into the solver. Blocks and number labels are
/// left alone (labels still mark the slot starts).
pub fn apply_to_grid(grid: &Grid, slots: &[Slot], fill: &[WordId], words: &WordList) -> Grid {
    let mut next = grid.clone();
    for (slot, &id) in slots.iter().zip(fill) {
        for (&(r, c), b) in slot.cells.iter().zip(words.word(id).bytes()) {
            if grid.get(r, c) == Cell::Empty {
                next = next.with_letter(r, c, b);
            }
        }
    }
    next
}

/// Grid snapshot in the editor's interchange shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridExport {
    /// 2D array of cell tokens (`"#"`, `"."`, `"A"`, `"12"`, …).
    pub grid: Vec<Vec<String>>,
    /// Slot name → list of `[r, c]` positions.
    pub slots: BTreeMap<String, Vec<(usize, usize)>>,
}

impl GridExport {
    pub fn new(grid: &Grid, slots: &[Slot]) -> GridExport {
        GridExport {
            grid: grid.to_token_rows(),
            slots: slots.iter().map(|s| (s.name(), s.cells.clone())).collect(),
        }
    }

    /// # Errors
    ///
    /// Serialization itself is infallible for this shape; the `Result` is
    /// `serde_json`'s contract.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Word list export: a JSON array of uppercase strings.
///
/// # Errors
///
/// See [`GridExport::to_json`].
pub fn words_to_json(words: &WordList) -> serde_json::Result<String> {
    serde_json::to_string(words.words())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::extract_slots;

    fn smoke() -> (Grid, Vec<Slot>, WordList) {
        let grid = Grid::parse("1,.,.\n.,#,.\n.,.,#").unwrap();
        let slots = extract_slots(&grid);
        let words = WordList::new(["CAT", "CAR", "TAR", "TAB"]).unwrap();
        (grid, slots, words)
    }

    fn id_of(words: &WordList, w: &str) -> WordId {
        words.of_length(w.len()).iter().copied().find(|&id| words.word(id) == w).unwrap()
    }

    #[test]
    fn projection_writes_both_slots() {
        let (grid, slots, words) = smoke();
        let fill = vec![id_of(&words, "CAR"), id_of(&words, "CAT")];
        let out = project(&grid, &slots, &fill, &words);
        assert_eq!(out[0], vec!['C', 'A', 'R']);
        assert_eq!(out[1], vec!['A', '#', '.']);
        assert_eq!(out[2], vec!['T', '.', '#']);
    }

    #[test]
    fn across_and_down_lists_are_sorted() {
        let grid = Grid::parse("1,2,3\n4,.,.\n5,.,.").unwrap();
        let slots = extract_slots(&grid);
        let words = WordList::new(["ARC", "CAB", "RAT", "BOA", "OAR", "ASH"]).unwrap();
        // Fill values are irrelevant to ordering; reuse one word everywhere.
        let id = id_of(&words, "ARC");
        let fill = vec![id; slots.len()];
        let stats = SolveStats {
            recursive_calls: 1,
            ac3_revisions: 0,
            elapsed: std::time::Duration::ZERO,
            rng_seed: 0,
        };
        let solution = build_solution(&grid, &slots, &[fill], &words, stats);
        let across_numbers: Vec<u32> = solution.across.iter().map(|&(n, _)| n).collect();
        let down_numbers: Vec<u32> = solution.down.iter().map(|&(n, _)| n).collect();
        assert_eq!(across_numbers, vec![1, 4, 5]);
        assert_eq!(down_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn apply_to_grid_pins_open_cells_only() {
        let (grid, slots, words) = smoke();
        let fill = vec![id_of(&words, "CAR"), id_of(&words, "CAT")];
        let refilled = apply_to_grid(&grid, &slots, &fill, &words);
        // Number label survives; open cells become fixed letters.
        assert_eq!(refilled.get(0, 0), Cell::Number(1));
        assert_eq!(refilled.get(0, 1), Cell::Letter(b'A'));
        assert_eq!(refilled.get(2, 0), Cell::Letter(b'T'));
        assert_eq!(refilled.get(1, 1), Cell::Block);
    }

    #[test]
    fn grid_export_round_trips_through_json() {
        let (grid, slots, _) = smoke();
        let export = GridExport::new(&grid, &slots);
        assert_eq!(export.grid[0], vec!["1", ".", "."]);
        assert_eq!(export.slots["1ACROSS"], vec![(0, 0), (0, 1), (0, 2)]);

        let json = export.to_json().unwrap();
        let back: GridExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, export);
    }

    #[test]
    fn words_export_is_uppercase_json() {
        let words = WordList::new(["knot", "heel"]).unwrap();
        assert_eq!(words_to_json(&words).unwrap(), r#"["HEEL","KNOT"]"#);
    }
}
