//! Garment sides and the fixed four-slot artwork record.
use crate::source::ImageSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four printable garment sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideKey {
    Front,
    Back,
    Left,
    Right,
}

impl SideKey {
    /// Canonical iteration order. Also the draw order of side layers.
    pub const ALL: [SideKey; 4] = [SideKey::Front, SideKey::Back, SideKey::Left, SideKey::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            SideKey::Front => "front",
            SideKey::Back => "back",
            SideKey::Left => "left",
            SideKey::Right => "right",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SideKey::Front => 0,
            SideKey::Back => 1,
            SideKey::Left => 2,
            SideKey::Right => 3,
        }
    }
}

impl fmt::Display for SideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SideKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(SideKey::Front),
            "back" => Ok(SideKey::Back),
            "left" => Ok(SideKey::Left),
            "right" => Ok(SideKey::Right),
            _ => Err(s.to_string()),
        }
    }
}

/// Artwork per side. Exactly four slots; `None` means no artwork.
///
/// Owned by the session controller. The compositor only reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideImageSet {
    slots: [Option<ImageSource>; 4],
}

impl SideImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the artwork for one side. Empty sources clear the slot.
    pub fn set(&mut self, side: SideKey, source: ImageSource) {
        self.slots[side.index()] = if source.is_empty() { None } else { Some(source) };
    }

    pub fn clear(&mut self, side: SideKey) {
        self.slots[side.index()] = None;
    }

    pub fn clear_all(&mut self) {
        self.slots = Default::default();
    }

    pub fn get(&self, side: SideKey) -> Option<&ImageSource> {
        self.slots[side.index()].as_ref()
    }

    /// Present sides in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (SideKey, &ImageSource)> + '_ {
        SideKey::ALL
            .into_iter()
            .filter_map(|side| self.get(side).map(|source| (side, source)))
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
