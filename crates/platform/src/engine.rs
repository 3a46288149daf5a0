//! Decode engine abstraction
//!
//! The MP3/WAV bitstream decoder is an external collaborator. It owns the
//! open audio stream and pushes PCM to the codec; the player core only tells
//! it which file to open and when to do another unit of work.
//!
//! Engine callbacks are not asynchronous events on another thread: the engine
//! invokes the [`EngineListener`] passed to [`DecodeEngine::step`] from inside
//! that call, on the decode context's own stack.

use crate::audio_types::Volume;

/// Callbacks made by the decode engine while it works.
pub trait EngineListener {
    /// One free-text metadata line (`"Title: Foo"`, `"TIT2=Foo"`, ...).
    ///
    /// Raw bytes: the line may start with a UTF-16 byte-order mark.
    fn on_metadata_line(&mut self, line: &[u8]);

    /// An embedded cover image was found at `position` in the open file.
    ///
    /// `len` is the declared byte length, 0 if unknown.
    fn on_image_located(&mut self, position: u64, len: u64);

    /// The stream reached its natural end.
    fn on_end_of_file(&mut self);
}

/// External MP3/WAV decode engine.
pub trait DecodeEngine {
    /// Error type
    type Error: core::fmt::Debug;

    /// Open `path` from storage and prepare it for streaming.
    fn open(&mut self, path: &str) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Tear down the current stream. No-op when nothing is open.
    fn stop(&mut self);

    /// Perform one bounded unit of decode/playback work.
    fn step<L: EngineListener>(
        &mut self,
        listener: &mut L,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Apply output volume
    fn set_volume(&mut self, volume: Volume);

    /// Apply left/right balance (-16..=16, 0 = centre)
    fn set_balance(&mut self, balance: i8);

    /// Sample rate of the open stream in Hz, 0 if not yet known
    fn sample_rate(&self) -> u32;

    /// Bits per sample of the open stream, 0 if not yet known
    fn bits_per_sample(&self) -> u8;
}
