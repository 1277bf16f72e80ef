//! `domains` — initial candidate sets, one per slot.
//!
//! Each slot starts with every dictionary word of its length that agrees
//! with the grid's pre-filled letters along the slot. Slots whose filter
//! comes up empty keep their (empty) domain: unsolvability is detected by
//! arc consistency or search, not here.

use std::collections::BTreeMap;

use log::debug;

use crate::slots::Slot;
use crate::word_list::{WordId, WordList};

/// A slot's fixed-letter pattern: one entry per position, `Some(letter)`
/// where the grid pins the cell and `None` where any letter goes.
pub(crate) fn pattern_for(slot: &Slot, prefilled: &BTreeMap<(usize, usize), u8>) -> Vec<Option<u8>> {
    slot.cells.iter().map(|pos| prefilled.get(pos).copied()).collect()
}

fn matches(word: &str, pattern: &[Option<u8>]) -> bool {
    debug_assert_eq!(word.len(), pattern.len());
    word.bytes().zip(pattern).all(|(b, p)| p.map_or(true, |fixed| b == fixed))
}

/// Build the initial domain for every slot from the length-bucketed
/// dictionary and the pre-filled letters.
pub fn init_domains(
    slots: &[Slot],
    prefilled: &BTreeMap<(usize, usize), u8>,
    words: &WordList,
) -> Vec<Vec<WordId>> {
    let domains: Vec<Vec<WordId>> = slots
        .iter()
        .map(|slot| {
            let pattern = pattern_for(slot, prefilled);
            words
                .of_length(slot.len())
                .iter()
                .copied()
                .filter(|&id| matches(words.word(id), &pattern))
                .collect()
        })
        .collect();

    for (slot, domain) in slots.iter().zip(&domains) {
        debug!("{}: {} initial candidates", slot.name(), domain.len());
    }

    domains
}
