//! Single-slot mailboxes between the UI and decode contexts.
//!
//! Each mailbox is an [`embassy_sync::signal::Signal`]: sending overwrites
//! whatever is still pending and the receiver consumes it at most once with
//! `try_take`. Only the latest desired track, volume or mode matters, so a
//! queue would only replay stale requests.
//!
//! ```text
//!   UI context                                decode context
//!   ──────────                                ──────────────
//!   switch    ── SwitchRequest ──────────────▶ stop, reset, open
//!   volume    ── Volume ─────────────────────▶ engine.set_volume
//!   mode      ── PlayMode ───────────────────▶ end-of-track policy
//!   transport ── Transport ──────────────────▶ Playing ⇄ Paused
//!   catalog   ── CatalogChange ──────────────▶ renumber / stop
//!             ◀──────────────── PlaybackStatus ── status
//! ```

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use heapless::String;
use library::TrackPath;
use platform::Volume;

use crate::cover::CoverArt;
use crate::metadata::TrackTags;
use crate::state::{PlayMode, PlaybackState, Resume, Transport};

/// Request to tear down the current stream and open another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRequest {
    /// Catalog index when the request was made
    pub index: usize,
    /// Track to open; its index is looked up again when the switch runs
    pub path: TrackPath,
    /// How the state is set once the track opens
    pub resume: Resume,
    /// Sequence number, echoed back in [`PlaybackStatus::switch_seq`]
    pub seq: u32,
}

/// Catalog edit the decode context must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogChange {
    /// The entry at this index was deleted; later entries moved down one
    Deleted(usize),
    /// The last track was deleted
    Emptied,
}

/// Stream format reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioInfo {
    /// Samples per second; 0 when nothing is open
    pub sample_rate: u32,
    /// Bits per sample
    pub bits: u8,
}

impl AudioInfo {
    /// Label such as `44.1/16` or `48/24`; empty when nothing is open.
    pub fn label(&self) -> String<12> {
        let mut out = String::new();
        if self.sample_rate == 0 {
            return out;
        }
        let khz = self.sample_rate / 1000;
        let tenths = (self.sample_rate % 1000) / 100;
        // 12 bytes hold "4294967.2/255".
        let _ = if tenths == 0 {
            write!(out, "{khz}/{}", self.bits)
        } else {
            write!(out, "{khz}.{tenths}/{}", self.bits)
        };
        out
    }
}

/// What the decode context last published.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    /// `Idle`, `Playing` or `Paused`
    pub state: PlaybackState,
    /// Catalog index of the open (or last attempted) track
    pub playing: usize,
    /// Tags of the open track
    pub tags: TrackTags,
    /// Cover art of the open track
    pub cover: CoverArt,
    /// Engine stream format
    pub audio: AudioInfo,
    /// `seq` of the last switch request handled
    pub switch_seq: u32,
    /// End-of-track advances so far (wrapping)
    pub auto_advances: u32,
}

/// All mailboxes shared by the two contexts.
pub struct Mailboxes<M: RawMutex> {
    /// UI → decode: open another track
    pub switch: Signal<M, SwitchRequest>,
    /// UI → decode: apply a volume
    pub volume: Signal<M, Volume>,
    /// UI → decode: play mode for end-of-track advance
    pub mode: Signal<M, PlayMode>,
    /// UI → decode: pause or resume
    pub transport: Signal<M, Transport>,
    /// UI → decode: catalog edited
    pub catalog: Signal<M, CatalogChange>,
    /// decode → UI: latest status snapshot
    pub status: Signal<M, PlaybackStatus>,
}

impl<M: RawMutex> Mailboxes<M> {
    /// Empty mailboxes; usable in a `static`.
    pub const fn new() -> Self {
        Self {
            switch: Signal::new(),
            volume: Signal::new(),
            mode: Signal::new(),
            transport: Signal::new(),
            catalog: Signal::new(),
            status: Signal::new(),
        }
    }
}

impl<M: RawMutex> Default for Mailboxes<M> {
    fn default() -> Self {
        Self::new()
    }
}
