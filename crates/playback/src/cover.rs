//! Cover art: deferred location, optional materialized bytes, and resolution
//! for display.
//!
//! The decode context only records where an embedded image lives. Bytes are
//! read when something asks for them: the UI when the metadata page is shown,
//! or the decode context when caching is enabled.

use alloc::sync::Arc;
use alloc::vec;

use platform::config::CoverConfig;
use platform::storage::File;

use crate::image::{self, Dimensions, ImageFormat, MAX_SIGNATURE_LEN};

/// Where an embedded image sits in the audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoverLocation {
    /// Byte offset of the picture payload (may include padding before the image)
    pub position: u64,
    /// Declared payload length; 0 when unknown
    pub len: u64,
}

impl CoverLocation {
    /// Bytes to sniff: the declared length when known and shorter than
    /// `window`, otherwise `window`.
    pub fn sniff_len(&self, window: usize) -> usize {
        match usize::try_from(self.len) {
            Ok(len) if len > 0 && len < window => len,
            _ => window,
        }
    }
}

/// Shared, read-only cover bytes.
///
/// Cloning shares the allocation; it is released when the last clone drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverBuffer(Arc<[u8]>);

impl CoverBuffer {
    /// Wrap bytes already read.
    pub fn new(bytes: Arc<[u8]>) -> Self {
        Self(bytes)
    }

    /// The image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of live handles to this buffer.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

/// Cover-art state of the current track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverArt {
    /// No image reported
    #[default]
    Absent,
    /// Location known, bytes not read
    Deferred(CoverLocation),
    /// Bytes read into memory
    Materialized {
        /// Where the bytes came from
        location: CoverLocation,
        /// The bytes
        buffer: CoverBuffer,
    },
}

impl CoverArt {
    /// Location of the image, if any.
    pub fn location(&self) -> Option<CoverLocation> {
        match self {
            Self::Absent => None,
            Self::Deferred(location) | Self::Materialized { location, .. } => Some(*location),
        }
    }
}

/// A cover image located for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedCover {
    /// Container format
    pub format: ImageFormat,
    /// Absolute file offset of the image signature
    pub offset: u64,
    /// Header-declared size, when it could be read
    pub dimensions: Option<Dimensions>,
}

const SNIFF_CHUNK: usize = 512;
const OVERLAP: usize = MAX_SIGNATURE_LEN.saturating_sub(1);

/// Search `window` bytes from `location.position` for an image signature.
///
/// Reads in chunks that overlap by one byte less than the longest
/// signature, so a signature straddling two chunks is still found, and a
/// match is only accepted once every signature that could start before it
/// has been seen.
pub async fn sniff<F: File>(
    file: &mut F,
    location: CoverLocation,
    window: usize,
) -> Result<Option<(u64, ImageFormat)>, F::Error> {
    let mut buf = [0u8; SNIFF_CHUNK];
    let mut start = 0usize;
    while start < window {
        file.seek(location.position.saturating_add(start as u64)).await?;
        let want = window.saturating_sub(start).min(SNIFF_CHUNK);
        let Some(dst) = buf.get_mut(..want) else {
            break;
        };
        let n = file.read_full(dst).await?;
        let chunk = buf.get(..n).unwrap_or(&[]);
        let last = n < want || start.saturating_add(n) >= window;

        if let Some((offset, format)) = image::find_start(chunk) {
            if last || offset.saturating_add(MAX_SIGNATURE_LEN) <= n {
                let at = location
                    .position
                    .saturating_add(start.saturating_add(offset) as u64);
                return Ok(Some((at, format)));
            }
        }
        if last {
            break;
        }
        start = start.saturating_add(n.saturating_sub(OVERLAP));
    }
    Ok(None)
}

/// Locate the image in the still-open audio file and read its declared size.
///
/// Nothing beyond the sniff window and the format header is read.
pub async fn resolve_deferred<F: File>(
    file: &mut F,
    location: CoverLocation,
    config: &CoverConfig,
) -> Result<Option<ResolvedCover>, F::Error> {
    let window = location.sniff_len(config.sniff_window);
    let Some((offset, format)) = sniff(file, location, window).await? else {
        return Ok(None);
    };
    let dimensions =
        image::read_dimensions(file, offset, format, config.jpeg_scan_limit).await?;
    Ok(Some(ResolvedCover {
        format,
        offset,
        dimensions,
    }))
}

/// Resolve an image that is already in memory.
pub fn resolve_buffer(
    location: CoverLocation,
    buffer: &CoverBuffer,
    config: &CoverConfig,
) -> Option<ResolvedCover> {
    let bytes = buffer.bytes();
    let window = bytes.get(..location.sniff_len(config.sniff_window)).unwrap_or(bytes);
    let (start, format) = image::find_start(window)?;
    let dimensions = bytes
        .get(start..)
        .and_then(|img| image::dimensions(format, img, config.jpeg_scan_limit));
    Some(ResolvedCover {
        format,
        offset: location.position.saturating_add(start as u64),
        dimensions,
    })
}

/// Resolve whatever cover state the current track has.
///
/// `file` is only touched for [`CoverArt::Deferred`].
pub async fn resolve_for_display<F: File>(
    file: &mut F,
    cover: &CoverArt,
    config: &CoverConfig,
) -> Result<Option<ResolvedCover>, F::Error> {
    match cover {
        CoverArt::Absent => Ok(None),
        CoverArt::Deferred(location) => resolve_deferred(file, *location, config).await,
        CoverArt::Materialized { location, buffer } => {
            Ok(resolve_buffer(*location, buffer, config))
        }
    }
}

/// Read the whole payload at `location` into a shared buffer.
///
/// Returns `None` when the length is unknown or above `limit`.
pub async fn materialize<F: File>(
    file: &mut F,
    location: CoverLocation,
    limit: usize,
) -> Result<Option<CoverBuffer>, F::Error> {
    let len = match usize::try_from(location.len) {
        Ok(len) if len > 0 && len <= limit => len,
        _ => return Ok(None),
    };
    file.seek(location.position).await?;
    let mut bytes = vec![0u8; len];
    let n = file.read_full(&mut bytes).await?;
    bytes.truncate(n);
    Ok(Some(CoverBuffer::new(Arc::from(bytes))))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use platform::mocks::MemStorage;
    use platform::Storage;

    const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_header(w: u32, h: u32) -> std::vec::Vec<u8> {
        let mut v = PNG.to_vec();
        v.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        v.extend_from_slice(&w.to_be_bytes());
        v.extend_from_slice(&h.to_be_bytes());
        v.extend_from_slice(&[8, 6, 0, 0, 0]);
        v
    }

    /// Audio file with `pad` bytes of picture-frame preamble before `image`
    /// at offset 100.
    fn card_with(pad: usize, image: &[u8]) -> (MemStorage, CoverLocation) {
        let mut data = vec![0u8; 100];
        data.extend(std::iter::repeat(0u8).take(pad));
        data.extend_from_slice(image);
        data.extend_from_slice(&[0u8; 64]);
        let card = MemStorage::new();
        card.add_file("/music/a.mp3", &data);
        let loc = CoverLocation {
            position: 100,
            len: (pad + image.len()) as u64,
        };
        (card, loc)
    }

    #[test]
    fn sniff_len_uses_known_length_below_window() {
        assert_eq!(CoverLocation { position: 0, len: 300 }.sniff_len(4096), 300);
        assert_eq!(CoverLocation { position: 0, len: 0 }.sniff_len(4096), 4096);
        assert_eq!(CoverLocation { position: 0, len: 90_000 }.sniff_len(4096), 4096);
    }

    #[tokio::test]
    async fn resolves_png_behind_padding() {
        let (mut card, loc) = card_with(37, &png_header(320, 240));
        let mut file = card.open_file("/music/a.mp3").await.unwrap();
        let cover = resolve_for_display(&mut file, &CoverArt::Deferred(loc), &CoverConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cover.format, ImageFormat::Png);
        assert_eq!(cover.offset, 137);
        assert_eq!(cover.dimensions, Some(Dimensions { width: 320, height: 240 }));
    }

    #[tokio::test]
    async fn signature_straddling_chunks_is_found() {
        // PNG signature starts 3 bytes before the first chunk boundary.
        let (mut card, loc) = card_with(SNIFF_CHUNK - 3, &png_header(1, 1));
        let mut file = card.open_file("/music/a.mp3").await.unwrap();
        let (at, format) = sniff(&mut file, loc, 4096).await.unwrap().unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(at, 100 + (SNIFF_CHUNK - 3) as u64);
    }

    #[tokio::test]
    async fn nothing_inside_window_is_unknown() {
        let (mut card, loc) = card_with(0, &[0x11; 40]);
        let mut file = card.open_file("/music/a.mp3").await.unwrap();
        let got = resolve_deferred(&mut file, loc, &CoverConfig::default()).await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn materialize_respects_limit() {
        let (mut card, loc) = card_with(0, &png_header(2, 2));
        let mut file = card.open_file("/music/a.mp3").await.unwrap();
        assert!(materialize(&mut file, loc, 4).await.unwrap().is_none());
        let buf = materialize(&mut file, loc, 1024).await.unwrap().unwrap();
        assert_eq!(buf.bytes().len(), loc.len as usize);

        let resolved = resolve_buffer(loc, &buf, &CoverConfig::default()).unwrap();
        assert_eq!(resolved.offset, 100);
        assert_eq!(resolved.dimensions, Some(Dimensions { width: 2, height: 2 }));
    }

    #[tokio::test]
    async fn absent_cover_resolves_to_none() {
        let (mut card, _) = card_with(0, &[]);
        let mut file = card.open_file("/music/a.mp3").await.unwrap();
        let got = resolve_for_display(&mut file, &CoverArt::Absent, &CoverConfig::default())
            .await
            .unwrap();
        assert!(got.is_none());
    }
}
