//! Boot sequence.
//!
//! Order:
//!   1. Validate the compiled-in configuration (fall back to defaults)
//!   2. Scan the music directory, falling back to the card root
//!   3. Create the screenshot directory if absent
//!   4. Hand off to the tasks; `UiTask::start` sends the initial volume and
//!      the forced switch to the first track
//!
//! Nothing here is fatal: a card that cannot be read boots into an empty,
//! idle player.

use embassy_sync::blocking_mutex::raw::RawMutex;
use library::{SharedCatalog, TrackCatalog};
use platform::{PlayerConfig, Storage};
use tracing::{info, warn};

/// What the boot sequence found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// Tracks in the catalog
    pub tracks: usize,
    /// The screenshot directory exists
    pub screenshot_dir: bool,
}

/// `config` if it validates, the compiled-in defaults otherwise.
pub fn checked_config(config: PlayerConfig) -> PlayerConfig {
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("invalid config ({}), using defaults", e);
            PlayerConfig::new()
        }
    }
}

/// Scan the card into `catalog` and prepare the screenshot directory.
pub async fn prepare<S: Storage, M: RawMutex, const N: usize>(
    storage: &mut S,
    catalog: &SharedCatalog<M, N>,
    config: &PlayerConfig,
) -> BootReport {
    let mut scanned = TrackCatalog::<N>::new();
    let tracks = scanned.populate_from(storage, &config.library).await;
    catalog.replace(scanned);

    let screenshot_dir = ensure_dir(storage, config.screenshot_dir).await;
    info!("boot: {} tracks, screenshots {}", tracks, if screenshot_dir { "on" } else { "off" });
    BootReport {
        tracks,
        screenshot_dir,
    }
}

async fn ensure_dir<S: Storage>(storage: &mut S, path: &str) -> bool {
    match storage.exists(path).await {
        Ok(true) => return true,
        Ok(false) => {}
        Err(e) => warn!("cannot stat {}: {:?}", path, e),
    }
    match storage.create_dir(path).await {
        Ok(()) => {
            info!("created {}", path);
            true
        }
        Err(e) => {
            warn!("cannot create {}: {:?}", path, e);
            false
        }
    }
}
