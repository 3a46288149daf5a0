//! UI context: keys in, frames out.
//!
//! Every frame drains the key queue, lets the session take the latest
//! decode status and advance its animations, then renders when anything
//! visible changed. With the screen off nothing is rendered, but keys and
//! status are still processed. The battery is read on its own, slower
//! cadence.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use platform::{InputDevice, InputEvent, PlayerConfig, PowerMonitor, Storage};
use rand::RngCore;
use tracing::{debug, warn};
use ui::{Effect, UiSession};

use crate::hal::PlayerDisplay;

/// The UI context and the collaborators it owns.
pub struct UiTask<'a, M: RawMutex, const N: usize, R, S, I, D, P> {
    session: UiSession<'a, M, N, R>,
    storage: S,
    input: I,
    display: D,
    power: P,
    period: Duration,
    screenshot_dir: &'static str,
    dirty: bool,
    frames_rendered: u32,
}

impl<'a, M, const N: usize, R, S, I, D, P> UiTask<'a, M, N, R, S, I, D, P>
where
    M: RawMutex,
    R: RngCore,
    S: Storage,
    I: InputDevice,
    D: PlayerDisplay,
    P: PowerMonitor,
{
    /// Wrap a session; `config` supplies the frame period and screenshot
    /// directory.
    pub fn new(
        session: UiSession<'a, M, N, R>,
        storage: S,
        input: I,
        display: D,
        power: P,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            session,
            storage,
            input,
            display,
            power,
            period: config.timing.ui_period,
            screenshot_dir: config.screenshot_dir,
            dirty: true,
            frames_rendered: 0,
        }
    }

    /// The session.
    pub fn session(&self) -> &UiSession<'a, M, N, R> {
        &self.session
    }

    /// The display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Frames drawn so far.
    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }

    /// Light the panel, send the initial volume and start the first track.
    pub fn start(&mut self) {
        self.display.set_backlight(self.session.backlight().duty());
        self.session.start();
        self.dirty = true;
    }

    /// One frame at `now`. Returns `true` when it was rendered.
    pub async fn frame(&mut self, now: Instant) -> bool {
        while let Some(InputEvent::KeyPress(key)) = self.input.poll_event() {
            let outcome = self.session.handle_key(key, &mut self.storage, now).await;
            self.dirty |= outcome.redraw;
            if let Some(effect) = outcome.effect {
                self.apply(effect).await;
            }
        }
        self.dirty |= self.session.tick(&mut self.storage, now).await;
        self.dirty |= self.session.update_battery(&self.power, now);

        if !self.dirty || !self.session.screen_on() {
            return false;
        }
        self.dirty = false;
        let view = self.session.view();
        if let Err(e) = self.display.render(&view).await {
            warn!("render failed: {:?}", e);
            return false;
        }
        self.frames_rendered = self.frames_rendered.wrapping_add(1);
        true
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Backlight(duty) => {
                debug!("backlight duty {}", duty);
                self.display.set_backlight(duty);
            }
            Effect::Screenshot => match self.display.capture(self.screenshot_dir).await {
                Ok(()) => debug!("screenshot saved to {}", self.screenshot_dir),
                Err(e) => warn!("screenshot failed: {:?}", e),
            },
        }
    }

    /// Start, then run frames at the configured period forever.
    pub async fn run(mut self) {
        self.start();
        loop {
            self.frame(Instant::now()).await;
            Timer::after(self.period).await;
        }
    }
}
