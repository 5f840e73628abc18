//! Placeholder maps — where the interactive elements of a region sit.
//!
//! Painting a piece of art yields one [`Placeholder`] per MCI marker, in
//! the order the markers appear in the source. Indices are contiguous and
//! start at 1, so a map with `N` entries answers every index in `1..=N`.
//!
//! Positions come out of the renderer relative to the art's first line.
//! The form engine knows where on screen the region was painted and shifts
//! the map with [`PlaceholderMap::offset`] before binding fields.

use std::fmt;

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

/// One MCI marker found in a piece of art.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// 1-based position among the art's markers, in source order.
    pub index: usize,
    /// Two-letter MCI code (`ET`, `TL`, `MT`, ...).
    pub code: String,
    /// The number written after the code (`%ET2` → 2). Informational;
    /// binding goes by `index`.
    pub tag: u32,
    /// Screen row (0-indexed).
    pub row: u16,
    /// Screen column (0-indexed, display columns).
    pub col: u16,
    /// Width in display columns (the marker's own width).
    pub width: u16,
    /// Height in rows. Markers are one row tall; configs may extend it.
    pub height: u16,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} %{}{} @ {},{} ({}x{})",
            self.index, self.code, self.tag, self.row, self.col, self.width, self.height
        )
    }
}

// ---------------------------------------------------------------------------
// PlaceholderMap
// ---------------------------------------------------------------------------

/// Ordered, immutable mapping from placeholder index to position and size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<Placeholder>,
}

impl PlaceholderMap {
    /// Build a map from placeholders listed in source order.
    ///
    /// Indices are reassigned `1..=N` from the list order so the contiguity
    /// guarantee holds no matter what the caller put in `index`.
    #[must_use]
    pub fn new(entries: Vec<Placeholder>) -> Self {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                p.index = i + 1;
                p
            })
            .collect();
        Self { entries }
    }

    /// Number of placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a placeholder by its 1-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Placeholder> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Whether `index` names a placeholder in this map.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Placeholders in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Placeholder> {
        self.entries.iter()
    }

    /// A copy of this map with every row moved down by `rows`.
    #[must_use]
    pub fn offset(&self, rows: u16) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|p| Placeholder {
                    row: p.row.saturating_add(rows),
                    ..p.clone()
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlaceholderMap {
    type Item = &'a Placeholder;
    type IntoIter = std::slice::Iter<'a, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
