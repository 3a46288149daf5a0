//! Keyboard input over a bounded channel.
//!
//! The keyboard driver (I2C keyboard controller on the board, a terminal or
//! a test on the desktop) pushes characters through a [`KeySender`]; the UI
//! context reads them through [`KeyboardInput`], which implements
//! [`platform::InputDevice`].
//!
//! # Overflow handling
//!
//! [`KeySender::press_char`] never waits. If the UI context stalls and the
//! queue reaches [`KEY_QUEUE_DEPTH`], further presses are dropped and logged
//! rather than blocking the driver.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use platform::{InputDevice, InputEvent, Key};
use tracing::{debug, warn};

/// Presses that may queue before drops begin.
pub const KEY_QUEUE_DEPTH: usize = 16;

/// Producer half, owned by the keyboard driver.
pub struct KeySender<'a, M: RawMutex> {
    tx: Sender<'a, M, InputEvent, KEY_QUEUE_DEPTH>,
}

impl<'a, M: RawMutex> KeySender<'a, M> {
    /// Sender feeding `channel`.
    pub fn new(channel: &'a Channel<M, InputEvent, KEY_QUEUE_DEPTH>) -> Self {
        Self {
            tx: channel.sender(),
        }
    }

    /// Queue a logical key. Returns `false` when the queue is full.
    pub fn press(&self, key: Key) -> bool {
        if self.tx.try_send(InputEvent::KeyPress(key)).is_err() {
            warn!("key queue full, press dropped");
            return false;
        }
        true
    }

    /// Map a keyboard character and queue it.
    ///
    /// Unmapped characters are ignored and return `false`.
    pub fn press_char(&self, c: char) -> bool {
        match Key::from_char(c) {
            Some(key) => self.press(key),
            None => {
                debug!("unmapped key {}", u32::from(c));
                false
            }
        }
    }
}

/// Consumer half, owned by the UI context.
pub struct KeyboardInput<'a, M: RawMutex> {
    rx: Receiver<'a, M, InputEvent, KEY_QUEUE_DEPTH>,
}

impl<'a, M: RawMutex> KeyboardInput<'a, M> {
    /// Input reading from `channel`.
    pub fn new(channel: &'a Channel<M, InputEvent, KEY_QUEUE_DEPTH>) -> Self {
        Self {
            rx: channel.receiver(),
        }
    }
}

impl<M: RawMutex> InputDevice for KeyboardInput<'_, M> {
    async fn wait_for_event(&mut self) -> InputEvent {
        self.rx.receive().await
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.rx.try_receive().ok()
    }
}
