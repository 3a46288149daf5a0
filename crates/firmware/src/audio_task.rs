//! Decode context loop.
//!
//! Steps the [`DecodeContext`] and yields between steps: briefly while a
//! stream is playing so the engine keeps the codec fed, for the idle period
//! otherwise.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use platform::config::TimingConfig;
use platform::{DecodeEngine, Storage};
use playback::DecodeContext;
use rand::RngCore;

/// The decode context and its pacing.
pub struct AudioTask<'a, M: RawMutex, const N: usize, E, S, R> {
    decoder: DecodeContext<'a, M, N, E, S, R>,
    busy: Duration,
    idle: Duration,
}

impl<'a, M, const N: usize, E, S, R> AudioTask<'a, M, N, E, S, R>
where
    M: RawMutex,
    E: DecodeEngine,
    S: Storage,
    R: RngCore,
{
    /// Wrap a decode context with the busy and idle yields from `timing`.
    pub fn new(decoder: DecodeContext<'a, M, N, E, S, R>, timing: &TimingConfig) -> Self {
        Self {
            decoder,
            busy: timing.decode_busy,
            idle: timing.decode_idle,
        }
    }

    /// The decode context.
    pub fn decoder(&self) -> &DecodeContext<'a, M, N, E, S, R> {
        &self.decoder
    }

    /// The decode context, mutably.
    pub fn decoder_mut(&mut self) -> &mut DecodeContext<'a, M, N, E, S, R> {
        &mut self.decoder
    }

    /// One step; returns how long to yield before the next.
    pub async fn tick(&mut self) -> Duration {
        if self.decoder.step().await {
            self.busy
        } else {
            self.idle
        }
    }

    /// Step forever.
    pub async fn run(mut self) {
        loop {
            let pause = self.tick().await;
            Timer::after(pause).await;
        }
    }
}
