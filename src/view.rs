//! Presentation-side transforms: row ordering and status highlighting.
//!
//! Sorting is view-only. The fetched list keeps its arrival order so that
//! pagination can append to it; the table sorts a copy on every draw.

use crate::api::Character;

/// Column the table is sorted by. `None` keeps arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Name,
    Origin,
}

impl SortKey {
    /// Next option in selector order (None, Name, Origin), wrapping.
    pub fn next(self) -> SortKey {
        match self {
            SortKey::None => SortKey::Name,
            SortKey::Name => SortKey::Origin,
            SortKey::Origin => SortKey::None,
        }
    }

    /// Previous option in selector order, wrapping.
    pub fn prev(self) -> SortKey {
        match self {
            SortKey::None => SortKey::Origin,
            SortKey::Name => SortKey::None,
            SortKey::Origin => SortKey::Name,
        }
    }
}

/// Copy of `characters` ordered by `key`. Lexicographic and stable, so
/// rows with equal keys keep their arrival order.
pub fn sorted_characters(characters: &[Character], key: SortKey) -> Vec<Character> {
    let mut rows = characters.to_vec();
    match key {
        SortKey::None => {}
        SortKey::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Origin => rows.sort_by(|a, b| a.origin.name.cmp(&b.origin.name)),
    }
    rows
}

/// Row highlight derived from a character's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTreatment {
    Alive,
    Dead,
    Neutral,
}

/// Map a status string to its highlight. Anything that is not exactly
/// alive or dead (unknown, typos, future values) gets the neutral look.
pub fn row_treatment(status: &str) -> RowTreatment {
    match status.to_lowercase().as_str() {
        "alive" => RowTreatment::Alive,
        "dead" => RowTreatment::Dead,
        _ => RowTreatment::Neutral,
    }
}
