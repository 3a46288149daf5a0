//! Statics shared by the two contexts.
//!
//! `CriticalSectionRawMutex` keeps every access safe whichever executor or
//! interrupt priority the contexts end up on. Each lock is held for a copy
//! or a signal, never across an `.await`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use library::SharedCatalog;
use platform::config::MAX_TRACKS;
use platform::InputEvent;
use playback::Mailboxes;

use crate::input::KEY_QUEUE_DEPTH;

/// Mutex flavour used by every shared static.
pub type PlayerMutex = CriticalSectionRawMutex;

/// Single-slot mailboxes between the UI and decode contexts.
pub static MAILBOXES: Mailboxes<PlayerMutex> = Mailboxes::new();

/// The track catalog.
pub static CATALOG: SharedCatalog<PlayerMutex, MAX_TRACKS> = SharedCatalog::new();

/// Key presses from the keyboard driver to the UI context.
pub static KEYS: Channel<PlayerMutex, InputEvent, KEY_QUEUE_DEPTH> = Channel::new();
