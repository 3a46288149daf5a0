//! Playback controller: the UI context's half of the player.
//!
//! The controller owns the selection, the play mode and the volume, and a
//! mirror of the last [`PlaybackStatus`] the decode context published. It
//! never touches the engine: every action that needs the decode context is
//! sent through a [`Mailboxes`] slot.
//!
//! The index arithmetic lives in free functions so both contexts (and the
//! property tests) share exactly one implementation.

use embassy_sync::blocking_mutex::raw::RawMutex;
use library::{DeleteOutcome, SharedCatalog};
use platform::Volume;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

use crate::mailbox::{CatalogChange, Mailboxes, PlaybackStatus, SwitchRequest};
use crate::state::{Direction, PlayMode, PlaybackState, Resume};

/// Step `index` one position in `direction`, wrapping within `count`.
///
/// Returns 0 for an empty catalog.
pub fn wrap_step(index: usize, direction: Direction, count: usize) -> usize {
    let Some(last) = count.checked_sub(1) else {
        return 0;
    };
    let index = index.min(last);
    match direction {
        Direction::Forward if index >= last => 0,
        Direction::Forward => index.saturating_add(1),
        Direction::Backward if index == 0 => last,
        Direction::Backward => index.saturating_sub(1),
    }
}

/// Uniform index in `0..count` that differs from `exclude`.
///
/// Draws once from the `count - 1` other values, so it never loops.
/// Returns 0 when `count <= 1`.
pub fn random_excluding(rng: &mut impl RngCore, count: usize, exclude: usize) -> usize {
    let Some(others) = count.checked_sub(1).filter(|n| *n > 0) else {
        return 0;
    };
    let pick = rng.gen_range(0..others);
    if pick >= exclude {
        pick.saturating_add(1)
    } else {
        pick
    }
}

/// Next selection for a manual next/prev key.
///
/// Sequential and SingleRepeat step from `selected` with wraparound; Random
/// picks any index other than `playing`.
pub fn advance(
    direction: Direction,
    mode: PlayMode,
    selected: usize,
    playing: usize,
    count: usize,
    rng: &mut impl RngCore,
) -> usize {
    match mode {
        PlayMode::Random => random_excluding(rng, count, playing),
        PlayMode::Sequential | PlayMode::SingleRepeat => wrap_step(selected, direction, count),
    }
}

/// Next playing index when a track ends on its own.
///
/// Sequential wraps to the start, Random may repeat the same track,
/// SingleRepeat stays.
pub fn after_track_end(mode: PlayMode, playing: usize, count: usize, rng: &mut impl RngCore) -> usize {
    if count == 0 {
        return 0;
    }
    match mode {
        PlayMode::Sequential => wrap_step(playing, Direction::Forward, count),
        PlayMode::Random => rng.gen_range(0..count),
        PlayMode::SingleRepeat => playing.min(count.saturating_sub(1)),
    }
}

/// UI-side playback state.
pub struct PlaybackController<'a, M: RawMutex> {
    mailboxes: &'a Mailboxes<M>,
    selected: usize,
    mode: PlayMode,
    volume: Volume,
    status: PlaybackStatus,
    next_seq: u32,
    pending_switch: Option<u32>,
}

impl<'a, M: RawMutex> PlaybackController<'a, M> {
    /// Controller with nothing selected and nothing playing.
    pub fn new(mailboxes: &'a Mailboxes<M>, volume: Volume) -> Self {
        Self {
            mailboxes,
            selected: 0,
            mode: PlayMode::default(),
            volume,
            status: PlaybackStatus::default(),
            next_seq: 0,
            pending_switch: None,
        }
    }

    /// Highlighted catalog index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Catalog index the decode context reports as playing.
    pub fn playing(&self) -> usize {
        self.status.playing
    }

    /// Current play mode.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Current volume.
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Last status received from the decode context.
    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    /// State to display: `Switching` while a switch is in flight.
    pub fn state(&self) -> PlaybackState {
        if self.pending_switch.is_some() {
            PlaybackState::Switching
        } else {
            self.status.state
        }
    }

    /// Returns `true` when audio is playing or about to.
    pub fn is_active(&self) -> bool {
        matches!(self.state(), PlaybackState::Playing | PlaybackState::Switching)
    }

    /// Move the highlight without switching tracks.
    pub fn move_selection(&mut self, direction: Direction, count: usize) {
        self.selected = wrap_step(self.selected, direction, count);
    }

    /// Cycle `Sequential → Random → SingleRepeat` and tell the decode context.
    pub fn cycle_mode(&mut self) -> PlayMode {
        self.mode = self.mode.next();
        self.mailboxes.mode.signal(self.mode);
        debug!("play mode {}", self.mode.label());
        self.mode
    }

    /// Next/prev key: pick the next selection per mode and switch to it,
    /// keeping a paused player paused.
    pub fn step_track<R: RawMutex, const N: usize>(
        &mut self,
        direction: Direction,
        catalog: &SharedCatalog<R, N>,
        rng: &mut impl RngCore,
    ) -> bool {
        let count = catalog.len();
        if count == 0 {
            return false;
        }
        self.selected = advance(direction, self.mode, self.selected, self.status.playing, count, rng);
        self.request_switch(catalog, Resume::Preserve)
    }

    /// Ask the decode context to open the selected track.
    ///
    /// Returns `false` when the selection does not resolve to a path.
    pub fn request_switch<R: RawMutex, const N: usize>(
        &mut self,
        catalog: &SharedCatalog<R, N>,
        resume: Resume,
    ) -> bool {
        let Some(path) = catalog.path(self.selected) else {
            warn!("switch to {} ignored: no such track", self.selected);
            return false;
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        debug!("switch #{} to {}", self.next_seq, path.as_str());
        self.mailboxes.switch.signal(SwitchRequest {
            index: self.selected,
            path,
            resume,
            seq: self.next_seq,
        });
        self.pending_switch = Some(self.next_seq);
        true
    }

    /// Toggle between Playing and Paused. No-op while Idle or Switching.
    pub fn toggle_pause(&mut self) -> bool {
        let Some(command) = self.state().toggle() else {
            return false;
        };
        self.mailboxes.transport.signal(command);
        self.status.state = self.status.state.apply(command);
        true
    }

    /// Set the volume; the decode context is only told about changes.
    pub fn set_volume(&mut self, volume: Volume) -> bool {
        if volume == self.volume {
            return false;
        }
        self.volume = volume;
        self.mailboxes.volume.signal(volume);
        true
    }

    /// Re-send the current volume (boot).
    pub fn push_volume(&self) {
        self.mailboxes.volume.signal(self.volume);
    }

    /// Follow a successful deletion of the entry at `deleted`.
    ///
    /// Deleting the playing track switches to the track now at its index:
    /// forced when the player was active, otherwise with the current state
    /// preserved (a paused player opens it paused, an idle one starts it).
    pub fn apply_delete<R: RawMutex, const N: usize>(
        &mut self,
        deleted: usize,
        outcome: DeleteOutcome,
        catalog: &SharedCatalog<R, N>,
    ) {
        match outcome {
            DeleteOutcome::ActiveTrackDeleted { cursor, resume } => {
                self.selected = cursor.selected;
                self.status.playing = cursor.playing;
                self.mailboxes.catalog.signal(CatalogChange::Deleted(deleted));
                let resume = if resume { Resume::Force } else { Resume::Preserve };
                self.request_switch(catalog, resume);
            }
            DeleteOutcome::Shifted { cursor } => {
                self.selected = cursor.selected;
                self.status.playing = cursor.playing;
                self.mailboxes.catalog.signal(CatalogChange::Deleted(deleted));
            }
            DeleteOutcome::Emptied => {
                self.selected = 0;
                self.pending_switch = None;
                self.mailboxes.switch.reset();
                self.mailboxes.catalog.signal(CatalogChange::Emptied);
                self.status.playing = 0;
                self.status.state = PlaybackState::Idle;
            }
        }
    }

    /// Take the latest status from the decode context.
    ///
    /// An auto-advance moves the selection onto the new playing track.
    /// Returns `true` when anything visible changed.
    pub fn sync(&mut self) -> bool {
        let Some(status) = self.mailboxes.status.try_take() else {
            return false;
        };
        let mut changed = false;
        if status.auto_advances != self.status.auto_advances {
            self.selected = status.playing;
            changed = true;
        }
        if self.pending_switch == Some(status.switch_seq) {
            self.pending_switch = None;
            changed = true;
        }
        if status != self.status {
            self.status = status;
            changed = true;
        }
        changed
    }
}
