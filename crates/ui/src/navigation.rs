//! Navigation state: the visible page and the delete-confirmation dialog.
//!
//! The dialog is an overlay, not a page: while it is open every other key
//! keeps working, and only the confirm/cancel keys look at it.

use crate::screen::Page;

/// Page and dialog visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    page: Page,
    delete_dialog: bool,
}

impl Navigator {
    /// Start on the track list with no dialog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page currently shown.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Switch between the track list and the metadata page.
    ///
    /// Returns `true` when the metadata page was entered.
    pub fn toggle_metadata(&mut self) -> bool {
        self.page = self.page.toggled();
        self.page == Page::Metadata
    }

    /// Returns `true` while the delete dialog is shown.
    #[must_use]
    pub fn delete_dialog_open(&self) -> bool {
        self.delete_dialog
    }

    /// Open the delete dialog. No-op if it is already open or there is
    /// nothing to delete.
    pub fn open_delete_dialog(&mut self, track_count: usize) -> bool {
        if self.delete_dialog || track_count == 0 {
            return false;
        }
        self.delete_dialog = true;
        true
    }

    /// Close the delete dialog; returns `true` if it was open.
    pub fn close_delete_dialog(&mut self) -> bool {
        core::mem::replace(&mut self.delete_dialog, false)
    }
}
