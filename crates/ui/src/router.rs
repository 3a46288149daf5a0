//! Input router and UI session: everything the UI context owns.
//!
//! Keys are edge events: one call to [`UiSession::handle_key`] per press.
//! Each handler reports whether the frame needs redrawing; frames with no
//! change are skipped.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;
use library::{display_name, Cursor, SharedCatalog};
use platform::config::PlayerConfig;
use platform::storage::MAX_NAME_LEN;
use platform::{Key, PowerMonitor, Storage};
use playback::metadata::LONG_FIELD_LEN;
use playback::{CoverArt, Direction, Mailboxes, PlaybackController, PlaybackState, Resume};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::backlight::Backlight;
use crate::battery::BatteryGauge;
use crate::clock::TrackClock;
use crate::list::{truncated, visible_lines, ScrollBar};
use crate::navigation::Navigator;
use crate::now_playing::{album_or_placeholder, artist_or_placeholder, NowPlayingState};
use crate::screen::Page;
use crate::scroll::{text_width, FrameCounter, ScrollAnimator, LIST_FIELD};
use crate::spectrum::Spectrum;
use crate::view::{StatusPanel, TagPanel, View};

/// Side effect the UI task performs on behalf of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Capture the screen into the screenshot directory
    Screenshot,
    /// Drive the backlight at this PWM duty
    Backlight(u8),
}

/// Result of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The frame changed
    pub redraw: bool,
    /// Work for the UI task
    pub effect: Option<Effect>,
}

impl KeyOutcome {
    fn redraw(redraw: bool) -> Self {
        Self {
            redraw,
            effect: None,
        }
    }

    fn with(effect: Effect) -> Self {
        Self {
            redraw: true,
            effect: Some(effect),
        }
    }
}

/// UI context state: controller, navigation, animations.
pub struct UiSession<'a, M: RawMutex, const N: usize, R> {
    controller: PlaybackController<'a, M>,
    catalog: &'a SharedCatalog<M, N>,
    nav: Navigator,
    backlight: Backlight,
    list_scroll: ScrollAnimator,
    now_playing: NowPlayingState,
    frames: FrameCounter,
    spectrum: Spectrum,
    clock: TrackClock,
    battery: BatteryGauge,
    rng: R,
    config: PlayerConfig,
}

impl<'a, M: RawMutex, const N: usize, R: RngCore> UiSession<'a, M, N, R> {
    /// Session on the track list at the configured volume and brightness.
    pub fn new(
        mailboxes: &'a Mailboxes<M>,
        catalog: &'a SharedCatalog<M, N>,
        rng: R,
        config: PlayerConfig,
        now: Instant,
    ) -> Self {
        Self {
            controller: PlaybackController::new(mailboxes, config.initial_volume),
            catalog,
            nav: Navigator::new(),
            backlight: Backlight::new(config.initial_brightness),
            list_scroll: ScrollAnimator::new(LIST_FIELD, now),
            now_playing: NowPlayingState::new(now),
            frames: FrameCounter::new(config.scroll.throttle_frames),
            spectrum: Spectrum::new(),
            clock: TrackClock::new(),
            battery: BatteryGauge::new(),
            rng,
            config,
        }
    }

    /// The playback controller.
    pub fn controller(&self) -> &PlaybackController<'a, M> {
        &self.controller
    }

    /// Page and dialog state.
    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// Backlight state.
    pub fn backlight(&self) -> &Backlight {
        &self.backlight
    }

    /// Rendering is suppressed while this is `false`.
    pub fn screen_on(&self) -> bool {
        self.backlight.is_on()
    }

    /// Send the initial volume and start the first track, if any.
    ///
    /// Returns `true` when a track was requested.
    pub fn start(&mut self) -> bool {
        self.controller.push_volume();
        if self.catalog.is_empty() {
            info!("no tracks found");
            return false;
        }
        self.controller.request_switch(self.catalog, Resume::Force)
    }

    /// Apply one key press.
    pub async fn handle_key<S: Storage>(&mut self, key: Key, storage: &mut S, now: Instant) -> KeyOutcome {
        let count = self.catalog.len();
        match key {
            Key::CycleMode => {
                self.controller.cycle_mode();
                KeyOutcome::redraw(true)
            }
            Key::ScreenToggle => KeyOutcome::with(Effect::Backlight(self.backlight.toggle_screen())),
            Key::MetadataPage => {
                if self.nav.toggle_metadata() {
                    self.now_playing.enter(now);
                }
                KeyOutcome::redraw(true)
            }
            Key::ListUp => {
                self.controller.move_selection(Direction::Backward, count);
                KeyOutcome::redraw(true)
            }
            Key::ListDown => {
                self.controller.move_selection(Direction::Forward, count);
                KeyOutcome::redraw(true)
            }
            Key::NextTrack => {
                self.controller.step_track(Direction::Forward, self.catalog, &mut self.rng);
                KeyOutcome::redraw(true)
            }
            Key::PrevTrack => {
                self.controller.step_track(Direction::Backward, self.catalog, &mut self.rng);
                KeyOutcome::redraw(true)
            }
            Key::Confirm => {
                self.controller.request_switch(self.catalog, Resume::Force);
                KeyOutcome::redraw(true)
            }
            Key::Delete => KeyOutcome::redraw(self.nav.open_delete_dialog(count)),
            Key::ConfirmDelete => {
                if !self.nav.close_delete_dialog() {
                    return KeyOutcome::default();
                }
                self.delete_selected(storage).await;
                KeyOutcome::redraw(true)
            }
            Key::CancelDelete => {
                let closed = self.nav.close_delete_dialog();
                if closed {
                    debug!("delete cancelled");
                }
                KeyOutcome::redraw(closed)
            }
            Key::Screenshot => KeyOutcome::with(Effect::Screenshot),
            Key::PlayPause => KeyOutcome::redraw(self.controller.toggle_pause()),
            Key::VolumeUp => {
                let volume = self.controller.volume().louder();
                KeyOutcome::redraw(self.controller.set_volume(volume))
            }
            Key::VolumeDown => {
                let volume = self.controller.volume().quieter();
                KeyOutcome::redraw(self.controller.set_volume(volume))
            }
            Key::VolumeStep => {
                let volume = self.controller.volume().coarse_step();
                KeyOutcome::redraw(self.controller.set_volume(volume))
            }
            Key::Brightness => match self.backlight.cycle() {
                Some(duty) => KeyOutcome::with(Effect::Backlight(duty)),
                None => KeyOutcome::default(),
            },
        }
    }

    async fn delete_selected<S: Storage>(&mut self, storage: &mut S) {
        let cursor = Cursor {
            selected: self.controller.selected(),
            playing: self.controller.playing(),
        };
        let active = self.controller.is_active();
        match self.catalog.delete_at(storage, cursor.selected, cursor, active).await {
            Ok(outcome) => self.controller.apply_delete(cursor.selected, outcome, self.catalog),
            Err(e) => warn!("delete of #{} failed: {}", cursor.selected, e),
        }
    }

    /// One UI frame without input: take the decode status, advance the
    /// animations and resolve a newly located cover.
    ///
    /// Returns `true` when the frame needs redrawing.
    pub async fn tick<S: Storage>(&mut self, storage: &mut S, now: Instant) -> bool {
        let mut redraw = self.controller.sync();
        let scroll_frame = self.frames.tick();

        match self.nav.page() {
            Page::TrackList => {
                let selected = self.controller.selected();
                redraw |= self.list_scroll.focus(selected, now);
                let width = self
                    .catalog
                    .read(|c| c.get(selected).map_or(0, |p| text_width(display_name(p))));
                redraw |= self.list_scroll.tick(now, scroll_frame, width, &self.config.scroll);
            }
            Page::Metadata => {
                let status = self.controller.status();
                redraw |= self.now_playing.tick(
                    now,
                    scroll_frame,
                    status.playing,
                    &status.tags,
                    &self.config.scroll,
                );
                let path = self.catalog.path(status.playing);
                redraw |= self
                    .now_playing
                    .refresh_cover(
                        storage,
                        path.as_deref(),
                        status.playing,
                        (status.switch_seq, status.auto_advances),
                        &status.cover,
                        &self.config.cover,
                    )
                    .await;
            }
        }

        let playing = self.controller.state() == PlaybackState::Playing;
        let status = self.controller.status();
        redraw |= self.clock.tick(now, (status.switch_seq, status.auto_advances), playing);
        redraw |= self.spectrum.tick(
            now,
            playing,
            self.config.timing.spectrum_period,
            &mut self.rng,
        );
        redraw
    }

    /// Refresh the battery reading on the configured cadence.
    ///
    /// Returns `true` when the displayed percentage changed.
    pub fn update_battery(&mut self, monitor: &impl PowerMonitor, now: Instant) -> bool {
        self.battery.tick(monitor, now, self.config.timing.battery_period)
    }

    /// Snapshot for the renderer.
    pub fn view(&self) -> View {
        let selected = self.controller.selected();
        let status = self.controller.status();
        let playing = match status.state {
            PlaybackState::Idle => None,
            _ => Some(status.playing),
        };

        let (lines, count, delete_prompt, fallback_title) = self.catalog.read(|c| {
            let lines = visible_lines(c, selected, playing, self.list_scroll.position(), LIST_FIELD.initial);
            let prompt = self
                .nav
                .delete_dialog_open()
                .then(|| c.get(selected).map(|p| truncated::<MAX_NAME_LEN>(display_name(p))))
                .flatten();
            let title = c
                .get(status.playing)
                .map(|p| truncated::<LONG_FIELD_LEN>(display_name(p)))
                .unwrap_or_default();
            (lines, c.len(), prompt, title)
        });

        let tags = &status.tags;
        let title = if tags.title.is_empty() {
            fallback_title
        } else {
            tags.title.clone()
        };
        let (cover_bytes, source) = match &status.cover {
            CoverArt::Materialized { buffer, .. } => (Some(buffer.clone()), None),
            CoverArt::Deferred(_) => (None, self.catalog.path(status.playing)),
            CoverArt::Absent => (None, None),
        };

        View {
            page: self.nav.page(),
            lines,
            scrollbar: ScrollBar { selected, count },
            delete_prompt,
            status: StatusPanel {
                state: self.controller.state(),
                mode: self.controller.mode(),
                volume: self.controller.volume(),
                brightness: self.backlight.level(),
                audio: status.audio.label(),
                spectrum: *self.spectrum.bars(),
                elapsed: matches!(self.controller.state(), PlaybackState::Playing | PlaybackState::Paused)
                    .then(|| self.clock.label().clone()),
                battery: self.battery.percent(),
            },
            tags: TagPanel {
                title,
                artist: truncated(artist_or_placeholder(tags)),
                album: truncated(album_or_placeholder(tags)),
                album_x: self.now_playing.album_x(),
                year: tags.year.clone(),
                genre: tags.genre.clone(),
                cover: self.now_playing.cover(),
                cover_bytes,
                source,
            },
        }
    }
}
