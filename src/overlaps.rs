//! `overlaps` — binary constraints between crossing slots.
//!
//! Two slots that share a cell constrain each other: the letters at the
//! shared position must agree. We store, per slot, a sorted neighbor list
//! with the index pairs of every shared cell, in both directions.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::slots::Slot;

/// Index pairs of the cells a slot pair shares.
///
/// `(i, j)` means position `i` of the owning slot coincides with position
/// `j` of the neighbor. Almost always a single pair, so the list is stored
/// inline.
pub type OverlapList = SmallVec<[(usize, usize); 2]>;

/// All crossing constraints for a slot set, addressed by slot index.
#[derive(Debug, Clone, Default)]
pub struct Overlaps {
    /// `by_slot[a]` = neighbors of `a`, sorted by neighbor index.
    by_slot: Vec<Vec<(usize, OverlapList)>>,
}

impl Overlaps {
    /// Build the constraint graph by inverting the slot list into a
    /// cell → occupants map and pairing up every shared cell.
    pub fn build(slots: &[Slot]) -> Overlaps {
        let mut occupants: HashMap<(usize, usize), SmallVec<[(usize, usize); 2]>> = HashMap::new();
        for (slot_idx, slot) in slots.iter().enumerate() {
            for (cell_idx, &pos) in slot.cells.iter().enumerate() {
                occupants.entry(pos).or_default().push((slot_idx, cell_idx));
            }
        }

        let mut by_slot: Vec<HashMap<usize, OverlapList>> = vec![HashMap::new(); slots.len()];
        for sharers in occupants.values() {
            // Every unordered pair of occupants of this cell, both directions.
            for (k, &(a, ia)) in sharers.iter().enumerate() {
                for &(b, ib) in &sharers[k + 1..] {
                    by_slot[a].entry(b).or_default().push((ia, ib));
                    by_slot[b].entry(a).or_default().push((ib, ia));
                }
            }
        }

        // HashMap iteration order is arbitrary; sort everything so the rest
        // of the pipeline is deterministic.
        let by_slot = by_slot
            .into_iter()
            .map(|neighbors| {
                let mut list: Vec<(usize, OverlapList)> = neighbors.into_iter().collect();
                list.sort_unstable_by_key(|&(b, _)| b);
                for (_, pairs) in &mut list {
                    pairs.sort_unstable();
                }
                list
            })
            .collect();

        Overlaps { by_slot }
    }

    /// Neighbors of slot `a` with their overlap index pairs, sorted by
    /// neighbor index.
    pub fn neighbors(&self, a: usize) -> &[(usize, OverlapList)] {
        &self.by_slot[a]
    }

    /// Overlap pairs between `a` and `b`, if the slots cross.
    pub fn between(&self, a: usize, b: usize) -> Option<&OverlapList> {
        self.by_slot[a]
            .binary_search_by_key(&b, |&(n, _)| n)
            .ok()
            .map(|i| &self.by_slot[a][i].1)
    }

    /// Number of slots this slot crosses.
    pub fn degree(&self, a: usize) -> usize {
        self.by_slot[a].len()
    }

    /// Total number of directed arcs, i.e. the initial AC-3 queue length.
    pub fn arc_count(&self) -> usize {
        self.by_slot.iter().map(Vec::len).sum()
    }

    pub fn slot_count(&self) -> usize {
        self.by_slot.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::slots::extract_slots;

    fn overlaps_for(text: &str) -> (Vec<Slot>, Overlaps) {
        let grid = Grid::parse(text).unwrap();
        let slots = extract_slots(&grid);
        let overlaps = Overlaps::build(&slots);
        (slots, overlaps)
    }

    #[test]
    fn crossing_slots_share_their_start_cell() {
        let (slots, overlaps) = overlaps_for("1,.,.\n.,#,.\n.,.,#");
        assert_eq!(slots.len(), 2);
        let pairs = overlaps.between(0, 1).unwrap();
        assert_eq!(pairs.as_slice(), &[(0, 0)]);
    }

    #[test]
    fn mirror_invariant_holds() {
        let (slots, overlaps) = overlaps_for("1,2,3\n4,.,.\n5,.,.");
        for a in 0..slots.len() {
            for &(b, ref pairs) in overlaps.neighbors(a) {
                let mirrored = overlaps.between(b, a).expect("reverse arc missing");
                for &(i, j) in pairs {
                    assert!(
                        mirrored.contains(&(j, i)),
                        "({i}, {j}) in [{a}][{b}] lacks ({j}, {i}) in [{b}][{a}]"
                    );
                }
                assert_eq!(pairs.len(), mirrored.len());
            }
        }
    }

    #[test]
    fn open_grid_full_crossings() {
        // Open 3x3 with every slot start numbered: 3 across + 3 down.
        let (slots, overlaps) = overlaps_for("1,2,3\n4,.,.\n5,.,.");
        // 1ACROSS 1DOWN 2DOWN 3DOWN 4ACROSS 5ACROSS
        assert_eq!(slots.len(), 6);
        let across: Vec<usize> = (0..slots.len())
            .filter(|&i| slots[i].name().ends_with("ACROSS"))
            .collect();
        for &a in &across {
            assert_eq!(overlaps.degree(a), 3, "each across slot crosses all three downs");
        }
        assert_eq!(overlaps.arc_count(), 18);
    }

    #[test]
    fn parallel_slots_do_not_touch() {
        let (slots, overlaps) = overlaps_for("1,.,.\n#,#,#\n2,.,.");
        assert_eq!(slots.len(), 2);
        assert!(overlaps.between(0, 1).is_none());
        assert_eq!(overlaps.degree(0), 0);
    }
}
