//! Decoder bridge: engine callbacks into the metadata store.
//!
//! A bridge lives for exactly one [`DecodeEngine::step`] call. Callbacks
//! run on the decode context's stack, so the store is borrowed mutably for
//! the duration of the step and no locking is involved.
//!
//! [`DecodeEngine::step`]: platform::DecodeEngine::step

use platform::EngineListener;
use tracing::debug;

use crate::metadata::MetadataStore;

/// What happened during one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeReport {
    /// A tag or the cover location changed
    pub changed: bool,
    /// A new cover image was located
    pub image_located: bool,
    /// The stream reached its natural end
    pub track_ended: bool,
}

/// [`EngineListener`] that records into a [`MetadataStore`].
pub struct DecoderBridge<'a> {
    metadata: &'a mut MetadataStore,
    report: BridgeReport,
}

impl<'a> DecoderBridge<'a> {
    /// Bridge for one step.
    pub fn new(metadata: &'a mut MetadataStore) -> Self {
        Self {
            metadata,
            report: BridgeReport::default(),
        }
    }

    /// Finish the step.
    pub fn finish(self) -> BridgeReport {
        self.report
    }
}

impl EngineListener for DecoderBridge<'_> {
    fn on_metadata_line(&mut self, line: &[u8]) {
        if self.metadata.on_metadata_line(line) {
            self.report.changed = true;
        }
    }

    fn on_image_located(&mut self, position: u64, len: u64) {
        debug!("cover at {} ({} bytes)", position, len);
        self.metadata.on_image_located(position, len);
        self.report.changed = true;
        self.report.image_located = true;
    }

    fn on_end_of_file(&mut self) {
        self.report.track_ended = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_land_in_store() {
        let mut store = MetadataStore::new();
        let mut bridge = DecoderBridge::new(&mut store);
        bridge.on_metadata_line(b"TIT2 Freddie Freeloader");
        bridge.on_image_located(512, 2048);
        bridge.on_end_of_file();
        let report = bridge.finish();
        assert!(report.changed && report.image_located && report.track_ended);
        assert_eq!(store.tags().title.as_str(), "Freddie Freeloader");
        assert!(store.cover().location().is_some());
    }

    #[test]
    fn ignored_lines_report_no_change() {
        let mut store = MetadataStore::new();
        let mut bridge = DecoderBridge::new(&mut store);
        bridge.on_metadata_line(b"Encoder: LAME3.100");
        assert_eq!(bridge.finish(), BridgeReport::default());
    }
}
