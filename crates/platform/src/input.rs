//! Input device abstraction
//!
//! The keyboard controller reports edge events: one [`InputEvent::KeyPress`]
//! per physical press, never repeated while the key is held.

/// Input device trait for the keyboard
pub trait InputDevice {
    /// Wait for next input event (async, power-efficient)
    fn wait_for_event(&mut self) -> impl core::future::Future<Output = InputEvent>;

    /// Poll for event (non-blocking)
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Input events from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Key went down
    KeyPress(Key),
}

/// Logical keys understood by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Cycle Sequential → Random → SingleRepeat
    CycleMode,
    /// Display on/off
    ScreenToggle,
    /// Show/hide the metadata page
    MetadataPage,
    /// Move the list cursor up
    ListUp,
    /// Move the list cursor down
    ListDown,
    /// Skip to the next track
    NextTrack,
    /// Skip to the previous track
    PrevTrack,
    /// Play the highlighted track
    Confirm,
    /// Open the delete dialog
    Delete,
    /// Confirm deletion in the dialog
    ConfirmDelete,
    /// Dismiss the delete dialog
    CancelDelete,
    /// Capture the screen
    Screenshot,
    /// Pause/resume
    PlayPause,
    /// Volume +1
    VolumeUp,
    /// Volume -1
    VolumeDown,
    /// Volume +5, wrapping back to 5
    VolumeStep,
    /// Next backlight level
    Brightness,
}

impl Key {
    /// Map a character reported by the keyboard controller to a key.
    ///
    /// Enter arrives as `'\n'` or `'\r'`.
    pub fn from_char(c: char) -> Option<Self> {
        let key = match c {
            'm' => Self::CycleMode,
            's' => Self::ScreenToggle,
            'i' => Self::MetadataPage,
            ';' => Self::ListUp,
            '.' => Self::ListDown,
            'n' => Self::NextTrack,
            'p' => Self::PrevTrack,
            '\n' | '\r' => Self::Confirm,
            'd' => Self::Delete,
            'y' => Self::ConfirmDelete,
            'c' => Self::CancelDelete,
            'f' => Self::Screenshot,
            'a' => Self::PlayPause,
            '=' => Self::VolumeUp,
            '-' => Self::VolumeDown,
            'v' => Self::VolumeStep,
            'l' => Self::Brightness,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keymap_covers_player_keys() {
        assert_eq!(Key::from_char('n'), Some(Key::NextTrack));
        assert_eq!(Key::from_char('\n'), Some(Key::Confirm));
        assert_eq!(Key::from_char('\r'), Some(Key::Confirm));
        assert_eq!(Key::from_char('y'), Some(Key::ConfirmDelete));
        assert_eq!(Key::from_char('x'), None);
        assert_eq!(Key::from_char('N'), None);
    }
}
