//! Count-down join point for the side image loads of one compute.
use crate::side::SideKey;

/// Tracks which requested sides have settled (loaded or failed).
///
/// Loads may settle in any order. The gate opens exactly once the number
/// of settled sides equals the number requested.
#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    requested: [bool; 4],
    settled: [bool; 4],
}

impl LoadGate {
    pub fn new(sides: impl IntoIterator<Item = SideKey>) -> Self {
        let mut gate = Self::default();
        for side in sides {
            gate.requested[side.index()] = true;
        }
        gate
    }

    pub fn expected(&self) -> usize {
        self.requested.iter().filter(|r| **r).count()
    }

    pub fn settled_count(&self) -> usize {
        self.settled.iter().filter(|s| **s).count()
    }

    /// Record a settled load. Returns `false` for sides that were not
    /// requested or already settled, which the caller ignores.
    pub fn settle(&mut self, side: SideKey) -> bool {
        let index = side.index();
        if !self.requested[index] || self.settled[index] {
            return false;
        }
        self.settled[index] = true;
        true
    }

    pub fn is_open(&self) -> bool {
        self.settled_count() == self.expected()
    }

    /// Requested sides still outstanding, in canonical order.
    pub fn outstanding(&self) -> Vec<SideKey> {
        SideKey::ALL
            .into_iter()
            .filter(|side| self.requested[side.index()] && !self.settled[side.index()])
            .collect()
    }
}
