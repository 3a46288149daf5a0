//! Track list window: which catalog entries are visible and how.

use heapless::{String, Vec};
use library::{display_name, TrackCatalog};
use platform::storage::MAX_NAME_LEN;

/// Lines visible at once.
pub const VISIBLE_LINES: usize = 7;
/// Line the selection settles on once the list starts following it.
pub const FOLLOW_LINE: usize = 3;

/// One visible line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    /// Catalog index
    pub index: usize,
    /// File name without directory or extension
    pub name: String<MAX_NAME_LEN>,
    /// Highlighted by the cursor
    pub selected: bool,
    /// Currently streaming
    pub playing: bool,
    /// Text x offset (only the selected line scrolls)
    pub x: i32,
}

/// First catalog index shown for a selection.
pub fn window_start(selected: usize) -> usize {
    selected.saturating_sub(FOLLOW_LINE)
}

/// Copy at most `N` bytes of `s`, cut at a character boundary.
pub(crate) fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    let mut out = String::new();
    let _ = out.push_str(s.get(..end).unwrap_or(""));
    out
}

/// Build the visible lines.
///
/// `selected_x` is the scroll offset of the selected line; every other
/// line sits at `rest_x`.
pub fn visible_lines<const N: usize>(
    catalog: &TrackCatalog<N>,
    selected: usize,
    playing: Option<usize>,
    selected_x: i32,
    rest_x: i32,
) -> Vec<ListLine, VISIBLE_LINES> {
    let start = window_start(selected);
    catalog
        .iter()
        .enumerate()
        .skip(start)
        .take(VISIBLE_LINES)
        .map(|(index, path)| ListLine {
            index,
            name: truncated(display_name(path)),
            selected: index == selected,
            playing: playing == Some(index),
            x: if index == selected { selected_x } else { rest_x },
        })
        .collect()
}

/// Scroll bar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollBar {
    /// Selected index
    pub selected: usize,
    /// Catalog size
    pub count: usize,
}

impl ScrollBar {
    /// Thumb offset within a track of `height` pixels.
    pub fn thumb_top(&self, height: u32) -> u32 {
        let height = u64::from(height);
        let selected = u64::try_from(self.selected).unwrap_or(u64::MAX);
        let count = u64::try_from(self.count).unwrap_or(u64::MAX);
        let top = height
            .saturating_mul(selected)
            .checked_div(count)
            .unwrap_or(0);
        u32::try_from(top).unwrap_or(u32::MAX)
    }
}
