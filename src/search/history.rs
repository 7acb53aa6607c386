use std::collections::{HashMap, hash_map::Entry};

use crate::prelude::*;

/// Piece placement packed into 64 nibbles, sixteen squares per word.
/// Side to move, castling, en passant and clocks are not part of it, so
/// positions that differ only in those share a fingerprint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionFingerprint([u64; 4]);

impl PositionFingerprint {
    pub fn from_state(state: &BoardState) -> Self {
        let mut packed = [0u64; 4];
        for (sq, info) in state.mailbox().iter().enumerate() {
            if let Some(info) = info {
                packed[sq / 16] |= info.code() << ((sq % 16) * 4);
            }
        }
        Self(packed)
    }
}

/// Visit counts of the positions on the current search path.
///
/// Entries are removed once their count drops back to zero, so a history
/// that has seen balanced increments and decrements compares equal to the
/// one it started as.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PositionHistory {
    counts: HashMap<PositionFingerprint, u32>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, fingerprint: PositionFingerprint) {
        *self.counts.entry(fingerprint).or_default() += 1;
    }

    pub fn decrement(&mut self, fingerprint: PositionFingerprint) {
        match self.counts.entry(fingerprint) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                }
            }
            Entry::Vacant(_) => {
                warn!("Decrementing a fingerprint that was never recorded: {fingerprint:?}");
                debug_assert!(false, "unbalanced PositionHistory::decrement");
            }
        }
    }

    pub fn count(&self, fingerprint: &PositionFingerprint) -> u32 {
        self.counts.get(fingerprint).copied().unwrap_or(0)
    }

    /// Whether the position is on the current search path. Positions that
    /// were entered and left again are forgotten.
    #[inline(always)]
    pub fn contains(&self, fingerprint: &PositionFingerprint) -> bool {
        self.counts.contains_key(fingerprint)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct fingerprints with a non-zero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
