//! Decode context: the half of the player that owns the engine.
//!
//! Each [`DecodeContext::step`] drains the UI mailboxes in a fixed order
//! (catalog edits, mode, volume, transport, switch), then gives the engine
//! one unit of work if a stream is playing, then publishes a status snapshot
//! if anything changed. The playing index, the playback state and the
//! [`MetadataStore`] are written nowhere else.

use embassy_sync::blocking_mutex::raw::RawMutex;
use library::{renumber_after_delete, Cursor, SharedCatalog, TrackPath};
use platform::config::CoverConfig;
use platform::{DecodeEngine, Storage};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::bridge::DecoderBridge;
use crate::controller::after_track_end;
use crate::cover;
use crate::mailbox::{AudioInfo, CatalogChange, Mailboxes, PlaybackStatus, SwitchRequest};
use crate::metadata::MetadataStore;
use crate::state::{PlayMode, PlaybackState};

/// Decode-side player state and its collaborators.
pub struct DecodeContext<'a, M: RawMutex, const N: usize, E, S, R> {
    mailboxes: &'a Mailboxes<M>,
    catalog: &'a SharedCatalog<M, N>,
    engine: E,
    storage: S,
    rng: R,
    config: CoverConfig,
    state: PlaybackState,
    playing: usize,
    mode: PlayMode,
    metadata: MetadataStore,
    current: Option<TrackPath>,
    switch_seq: u32,
    auto_advances: u32,
    audio: AudioInfo,
    dirty: bool,
}

impl<'a, M, const N: usize, E, S, R> DecodeContext<'a, M, N, E, S, R>
where
    M: RawMutex,
    E: DecodeEngine,
    S: Storage,
    R: RngCore,
{
    /// Idle context; the engine is centred.
    pub fn new(
        mailboxes: &'a Mailboxes<M>,
        catalog: &'a SharedCatalog<M, N>,
        mut engine: E,
        storage: S,
        rng: R,
        config: CoverConfig,
    ) -> Self {
        engine.set_balance(0);
        Self {
            mailboxes,
            catalog,
            engine,
            storage,
            rng,
            config,
            state: PlaybackState::Idle,
            playing: 0,
            mode: PlayMode::default(),
            metadata: MetadataStore::new(),
            current: None,
            switch_seq: 0,
            auto_advances: 0,
            audio: AudioInfo::default(),
            dirty: false,
        }
    }

    /// Current state (never `Switching`).
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Catalog index of the open track.
    pub fn playing(&self) -> usize {
        self.playing
    }

    /// End-of-track policy in use.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Tags and cover of the open track.
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Path of the open track.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine, mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Snapshot of everything the UI renders.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            playing: self.playing,
            tags: self.metadata.tags().clone(),
            cover: self.metadata.cover().clone(),
            audio: self.audio,
            switch_seq: self.switch_seq,
            auto_advances: self.auto_advances,
        }
    }

    /// Run one decode step.
    ///
    /// Returns `true` while a stream is playing, so the caller can pick the
    /// short busy yield over the idle period.
    pub async fn step(&mut self) -> bool {
        if let Some(change) = self.mailboxes.catalog.try_take() {
            self.follow_catalog(change);
        }
        if let Some(mode) = self.mailboxes.mode.try_take() {
            self.mode = mode;
        }
        if let Some(volume) = self.mailboxes.volume.try_take() {
            self.engine.set_volume(volume);
        }
        if let Some(command) = self.mailboxes.transport.try_take() {
            let next = self.state.apply(command);
            if next != self.state {
                debug!("{} -> {}", self.state.label(), next.label());
                self.state = next;
                self.dirty = true;
            }
        }
        if let Some(request) = self.mailboxes.switch.try_take() {
            self.switch(request).await;
        }
        if self.state.is_playing() {
            self.pump().await;
        }
        self.publish();
        self.state.is_playing()
    }

    fn follow_catalog(&mut self, change: CatalogChange) {
        match change {
            CatalogChange::Deleted(index) => {
                let listed = self.current.as_ref().and_then(|p| self.catalog.position(p));
                self.playing = match listed {
                    Some(position) => position,
                    None => {
                        let cursor = Cursor {
                            selected: self.playing,
                            playing: self.playing,
                        };
                        renumber_after_delete(index, self.catalog.len(), cursor, false)
                            .cursor()
                            .playing
                    }
                };
            }
            CatalogChange::Emptied => {
                self.teardown();
                self.state = PlaybackState::Idle;
                self.playing = 0;
            }
        }
        self.dirty = true;
    }

    fn teardown(&mut self) {
        self.engine.stop();
        self.metadata.reset();
        self.current = None;
        self.dirty = true;
    }

    async fn open(&mut self, index: usize, path: TrackPath, on_success: PlaybackState) {
        match self.engine.open(&path).await {
            Ok(()) => {
                info!("playing #{} {}", index, path.as_str());
                self.state = on_success;
                self.current = Some(path);
            }
            Err(e) => {
                warn!("cannot open {}: {:?}", path.as_str(), e);
                self.state = PlaybackState::Idle;
            }
        }
    }

    async fn switch(&mut self, request: SwitchRequest) {
        let previous = self.state;
        self.teardown();
        self.switch_seq = request.seq;
        // Deletions may have moved or removed the track since the request.
        let Some(index) = self.catalog.position(&request.path) else {
            warn!("{} is no longer listed", request.path.as_str());
            self.state = PlaybackState::Idle;
            self.playing = self.playing.min(self.catalog.len().saturating_sub(1));
            return;
        };
        let on_success = previous.after_switch(request.resume);
        self.open(index, request.path, on_success).await;
        // A failed open leaves the playing index where it was.
        if self.current.is_some() {
            self.playing = index;
        }
    }

    async fn pump(&mut self) {
        let mut bridge = DecoderBridge::new(&mut self.metadata);
        let result = self.engine.step(&mut bridge).await;
        let report = bridge.finish();

        if let Err(e) = result {
            warn!("decode failed: {:?}", e);
            self.teardown();
            self.state = PlaybackState::Idle;
            return;
        }
        if report.changed {
            self.dirty = true;
        }
        if report.image_located && self.config.cache {
            self.cache_cover().await;
        }
        if report.track_ended {
            self.on_track_end().await;
        }
    }

    /// Advance per play mode once the engine reports end of file.
    ///
    /// The playing index moves before the open is attempted, so a missing
    /// file leaves the player idle on the new index.
    async fn on_track_end(&mut self) {
        let count = self.catalog.len();
        let next = after_track_end(self.mode, self.playing, count, &mut self.rng);
        let path = self.catalog.path(next);
        self.teardown();
        self.playing = next;
        self.auto_advances = self.auto_advances.wrapping_add(1);
        match path {
            Some(path) => self.open(next, path, PlaybackState::Playing).await,
            None => {
                debug!("catalog empty at end of track");
                self.state = PlaybackState::Idle;
            }
        }
    }

    async fn cache_cover(&mut self) {
        let (Some(location), Some(path)) = (self.metadata.cover().location(), self.current.as_ref())
        else {
            return;
        };
        let mut file = match self.storage.open_file(path).await {
            Ok(file) => file,
            Err(e) => {
                warn!("cover cache: cannot open {}: {:?}", path.as_str(), e);
                return;
            }
        };
        match cover::materialize(&mut file, location, self.config.cache_limit).await {
            Ok(Some(buffer)) => {
                if self.metadata.set_materialized(location, buffer) {
                    self.dirty = true;
                }
            }
            Ok(None) => debug!("cover not cached ({} bytes)", location.len),
            Err(e) => warn!("cover cache read failed: {:?}", e),
        }
    }

    fn publish(&mut self) {
        let audio = AudioInfo {
            sample_rate: self.engine.sample_rate(),
            bits: self.engine.bits_per_sample(),
        };
        if audio != self.audio {
            self.audio = audio;
            self.dirty = true;
        }
        if self.dirty {
            self.dirty = false;
            self.mailboxes.status.signal(self.status());
        }
    }
}
