//! Card player firmware: the two execution contexts and the boot sequence.
//!
//! # Architecture
//!
//! ```text
//! UiTask (keys, pages, animations, rendering)
//!         ↓ Mailboxes (switch / volume / mode / transport / catalog)
//!         ↑ Mailboxes (status snapshot)
//! AudioTask (DecodeContext: engine, metadata, cover art)
//!
//! SharedCatalog: written by UiTask (deletion), read by AudioTask (end of track)
//! ```
//!
//! Both tasks are plain structs over the `platform` traits, so the same code
//! runs on the board and against the in-memory mocks. [`shared`] holds the
//! statics a board's entry point hands to them.
//!
//! # Features
//!
//! - `std` - std-backed storage and mocks from `platform` (desktop and tests)
//! - `defmt` - `defmt::Format` derives for on-target logging

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(async_fn_in_trait)]

pub mod audio_task;
pub mod boot;
pub mod hal;
pub mod input;
pub mod shared;
pub mod ui_task;

pub use audio_task::AudioTask;
pub use boot::{checked_config, prepare, BootReport};
pub use hal::PlayerDisplay;
pub use input::{KeyboardInput, KeySender, KEY_QUEUE_DEPTH};
pub use shared::{PlayerMutex, CATALOG, KEYS, MAILBOXES};
pub use ui_task::UiTask;

/// Run both contexts until power-off.
pub async fn run_player<U, A>(ui: U, audio: A)
where
    U: core::future::Future<Output = ()>,
    A: core::future::Future<Output = ()>,
{
    embassy_futures::join::join(ui, audio).await;
}
