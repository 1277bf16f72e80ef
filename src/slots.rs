//! `slots` — slot discovery from grid geometry.
//!
//! A slot is a maximal run of open cells in one direction, starting at a
//! numbered cell. Numbered cells that open no run of length ≥ 2 contribute
//! nothing; length-1 runs are silently discarded.

use std::fmt;

use log::warn;

use crate::grid::{Cell, Grid};

/// Orientation of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Step offsets `(dr, dc)` for walking a slot.
    fn step(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "ACROSS"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// One entry of the puzzle: an ordered run of cell positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub number: u32,
    pub direction: Direction,
    /// `(r, c)` positions in reading order along the slot.
    pub cells: Vec<(usize, usize)>,
}

impl Slot {
    /// The stable external identifier, e.g. `"4DOWN"`.
    pub fn name(&self) -> String {
        format!("{}{}", self.number, self.direction)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Scan the grid row-major and emit all slots of length ≥ 2.
///
/// Across slots of a numbered cell are emitted before its down slot, so the
/// result is ordered by (number, direction) as long as the numbering itself
/// is in reading order. Numbering violations (duplicates, out-of-order
/// labels) are accepted but logged as warnings; the number is only an
/// identifier to the solver.
pub fn extract_slots(grid: &Grid) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut last_number = 0u32;

    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            let Cell::Number(number) = grid.get(r, c) else {
                continue;
            };

            if number <= last_number {
                warn!("grid numbering not increasing in reading order: {number} at ({r}, {c}) after {last_number}");
            }
            last_number = last_number.max(number);

            // Across: opens only when the left neighbor is a boundary or block.
            if c == 0 || grid.get(r, c - 1).is_block() {
                if let Some(slot) = walk(grid, r, c, number, Direction::Across) {
                    slots.push(slot);
                }
            }
            // Down: independent of the across check.
            if r == 0 || grid.get(r - 1, c).is_block() {
                if let Some(slot) = walk(grid, r, c, number, Direction::Down) {
                    slots.push(slot);
                }
            }
        }
    }

    slots
}

/// Collect open cells from `(r, c)` in `direction` until a block or the
/// boundary. Returns `None` for runs shorter than 2.
fn walk(grid: &Grid, r: usize, c: usize, number: u32, direction: Direction) -> Option<Slot> {
    let (dr, dc) = direction.step();
    let mut cells = Vec::new();
    let (mut cr, mut cc) = (r, c);
    while grid.is_open(cr, cc) {
        cells.push((cr, cc));
        cr += dr;
        cc += dc;
    }
    if cells.len() < 2 {
        return None;
    }
    Some(Slot { number, direction, cells })
}
