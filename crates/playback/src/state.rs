//! Playback state machine.
//!
//! `PlaybackState` is the explicit replacement for a pair of "is playing" /
//! "stopped" flags. The decode context only ever holds `Idle`, `Playing` or
//! `Paused`; `Switching` is what the UI shows between sending a switch
//! request and hearing back from the decode context.

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// No stream is open (boot, failed open, empty catalog).
    #[default]
    Idle,
    /// A stream is open and the decode context steps it.
    Playing,
    /// A stream is open but not stepped; position is preserved.
    Paused,
    /// A switch request is in flight.
    Switching,
}

/// How a successful switch sets the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resume {
    /// Always start playing (confirm key, deletion of a playing track,
    /// auto-advance).
    Force,
    /// Start playing unless the player was paused, in which case the new
    /// track opens paused (next/prev keys).
    Preserve,
}

/// Pause/resume command sent to the decode context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    /// `Playing → Paused`
    Pause,
    /// `Paused → Playing`
    Resume,
}

impl PlaybackState {
    /// State after a track opened successfully, given the state before.
    ///
    /// Transitions:
    /// - any + `Force`            → `Playing`
    /// - `Paused` + `Preserve`    → `Paused`
    /// - other + `Preserve`       → `Playing`
    pub fn after_switch(self, resume: Resume) -> Self {
        match (self, resume) {
            (Self::Paused, Resume::Preserve) => Self::Paused,
            _ => Self::Playing,
        }
    }

    /// Apply a transport command.
    ///
    /// Transitions:
    /// - `Playing` + `Pause`  → `Paused`
    /// - `Paused`  + `Resume` → `Playing`
    /// - anything else        → unchanged
    pub fn apply(self, command: Transport) -> Self {
        match (self, command) {
            (Self::Playing, Transport::Pause) => Self::Paused,
            (Self::Paused, Transport::Resume) => Self::Playing,
            (state, _) => state,
        }
    }

    /// The command that toggles play/pause from this state, if any.
    pub fn toggle(self) -> Option<Transport> {
        match self {
            Self::Playing => Some(Transport::Pause),
            Self::Paused => Some(Transport::Resume),
            Self::Idle | Self::Switching => None,
        }
    }

    /// `true` while audio is actually being streamed.
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    /// Short label for the transport indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "STOP",
            Self::Playing => "PLAY",
            Self::Paused => "PAUSE",
            Self::Switching => "...",
        }
    }
}

/// How the next track is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayMode {
    /// In catalog order, wrapping around
    #[default]
    Sequential,
    /// Uniformly random
    Random,
    /// End of track restarts the same track
    SingleRepeat,
}

impl PlayMode {
    /// Next mode in the cycle `Sequential → Random → SingleRepeat → Sequential`.
    pub fn next(self) -> Self {
        match self {
            Self::Sequential => Self::Random,
            Self::Random => Self::SingleRepeat,
            Self::SingleRepeat => Self::Sequential,
        }
    }

    /// Three-letter mode label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sequential => "SEQ",
            Self::Random => "RND",
            Self::SingleRepeat => "ONE",
        }
    }
}

/// Direction of a manual step through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards higher indices
    Forward,
    /// Towards lower indices
    Backward,
}
