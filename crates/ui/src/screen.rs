//! Page identifiers: which full-screen view the UI shows.

/// The two pages the player can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Scrolling track list with the transport panel.
    #[default]
    TrackList,
    /// Tags and cover art of the playing track.
    Metadata,
}

impl Page {
    /// The other page.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::TrackList => Self::Metadata,
            Self::Metadata => Self::TrackList,
        }
    }

    /// Header label.
    pub fn label(self) -> &'static str {
        match self {
            Self::TrackList => "LIST",
            Self::Metadata => "ID3",
        }
    }
}
