//! Image sniffing: container detection and header-declared dimensions.
//!
//! Embedded cover art is located by signature rather than trusted offsets:
//! ID3 picture frames often carry a MIME string, a description and padding
//! before the actual image bytes. Nothing here decodes pixels.
//!
//! All parsing is bounds-checked slice access over untrusted bytes; a
//! truncated or malformed header yields `None`, never a panic.

use platform::storage::File;

/// Supported image containers, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageFormat {
    /// JPEG / JFIF / EXIF
    Jpeg,
    /// PNG
    Png,
    /// Windows bitmap
    Bmp,
    /// GIF87a / GIF89a
    Gif,
    /// Quite OK Image
    Qoi,
}

impl ImageFormat {
    /// Short label for debug overlays.
    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Qoi => "QOI",
        }
    }
}

/// Header-declared image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dimensions {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Dimensions {
    fn non_zero(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Signatures in priority order; earlier entries win ties.
const SIGNATURES: [(ImageFormat, &[u8]); 6] = [
    (ImageFormat::Jpeg, &[0xFF, 0xD8]),
    (ImageFormat::Png, PNG_SIGNATURE),
    (ImageFormat::Bmp, b"BM"),
    (ImageFormat::Gif, b"GIF89a"),
    (ImageFormat::Gif, b"GIF87a"),
    (ImageFormat::Qoi, b"qoif"),
];

/// Longest signature in bytes.
pub const MAX_SIGNATURE_LEN: usize = 8;

/// Bytes of fixed header needed for PNG/BMP/GIF/QOI dimensions.
pub const HEADER_LEN: usize = 32;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Find the earliest image signature in `window`.
///
/// Every format is searched across the whole window and the lowest offset
/// wins; the priority order only breaks ties at the same offset.
pub fn find_start(window: &[u8]) -> Option<(usize, ImageFormat)> {
    let mut best: Option<(usize, ImageFormat)> = None;
    for (format, signature) in SIGNATURES {
        if let Some(offset) = find(window, signature) {
            if best.map_or(true, |(b, _)| offset < b) {
                best = Some((offset, format));
            }
        }
    }
    best
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let b = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_be_bytes([*b.first()?, *b.get(1)?]))
}

fn array4(bytes: &[u8], at: usize) -> Option<[u8; 4]> {
    bytes.get(at..at.checked_add(4)?)?.try_into().ok()
}

fn le_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let b = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([*b.first()?, *b.get(1)?]))
}

/// Dimensions from a fixed-offset header (PNG, BMP, GIF, QOI).
///
/// `header` starts at the image signature. Returns `None` for JPEG, for a
/// short header, and for zero-sized images.
pub fn fixed_dimensions(format: ImageFormat, header: &[u8]) -> Option<Dimensions> {
    match format {
        ImageFormat::Png => Dimensions::non_zero(
            u32::from_be_bytes(array4(header, 16)?),
            u32::from_be_bytes(array4(header, 20)?),
        ),
        ImageFormat::Bmp => Dimensions::non_zero(
            u32::from_le_bytes(array4(header, 18)?),
            // Top-down bitmaps store a negative height.
            i32::from_le_bytes(array4(header, 22)?).unsigned_abs(),
        ),
        ImageFormat::Gif => Dimensions::non_zero(
            u32::from(le_u16(header, 6)?),
            u32::from(le_u16(header, 8)?),
        ),
        ImageFormat::Qoi => Dimensions::non_zero(
            u32::from_be_bytes(array4(header, 4)?),
            u32::from_be_bytes(array4(header, 8)?),
        ),
        ImageFormat::Jpeg => None,
    }
}

/// What the JPEG marker walker wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Feed the next byte
    Continue,
    /// Skip this many bytes (segment payload), then continue
    Skip(usize),
    /// Start-of-frame found
    Found(Dimensions),
    /// Malformed stream or end of image
    Abort,
}

#[derive(Debug, Clone, Copy)]
enum WalkState {
    Seek,
    Marker,
    Length(Option<u8>),
    Frame { buf: [u8; 7], filled: usize },
}

/// Byte-at-a-time JPEG marker walker.
///
/// Drivers feed bytes and honour [`WalkStep::Skip`] by advancing past the
/// segment, either in a slice or by seeking a file. Only SOF0 (baseline)
/// and SOF2 (progressive) frames report dimensions.
#[derive(Debug, Clone, Copy)]
pub struct JpegWalker {
    state: WalkState,
}

impl Default for JpegWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegWalker {
    /// Walker positioned before the SOI marker.
    pub const fn new() -> Self {
        Self {
            state: WalkState::Seek,
        }
    }

    /// Consume one byte.
    pub fn feed(&mut self, byte: u8) -> WalkStep {
        match self.state {
            WalkState::Seek => {
                if byte == 0xFF {
                    self.state = WalkState::Marker;
                }
                WalkStep::Continue
            }
            WalkState::Marker => match byte {
                // Fill byte before a marker.
                0xFF => WalkStep::Continue,
                // Stuffed zero, RSTn, SOI, TEM: no segment follows.
                0x00 | 0x01 | 0xD0..=0xD8 => {
                    self.state = WalkState::Seek;
                    WalkStep::Continue
                }
                0xD9 => WalkStep::Abort,
                0xC0 | 0xC2 => {
                    self.state = WalkState::Frame {
                        buf: [0; 7],
                        filled: 0,
                    };
                    WalkStep::Continue
                }
                _ => {
                    self.state = WalkState::Length(None);
                    WalkStep::Continue
                }
            },
            WalkState::Length(None) => {
                self.state = WalkState::Length(Some(byte));
                WalkStep::Continue
            }
            WalkState::Length(Some(hi)) => {
                self.state = WalkState::Seek;
                let len = usize::from(u16::from_be_bytes([hi, byte]));
                match len.checked_sub(2) {
                    Some(payload) => WalkStep::Skip(payload),
                    None => WalkStep::Abort,
                }
            }
            WalkState::Frame { mut buf, filled } => {
                if let Some(slot) = buf.get_mut(filled) {
                    *slot = byte;
                }
                let filled = filled.saturating_add(1);
                if filled < buf.len() {
                    self.state = WalkState::Frame { buf, filled };
                    return WalkStep::Continue;
                }
                // length(2) precision(1) height(2) width(2)
                self.state = WalkState::Seek;
                let height = be_u16(&buf, 3).map_or(0, u32::from);
                let width = be_u16(&buf, 5).map_or(0, u32::from);
                Dimensions::non_zero(width, height).map_or(WalkStep::Continue, WalkStep::Found)
            }
        }
    }
}

/// JPEG dimensions from an in-memory image, walking at most `limit` bytes.
pub fn jpeg_dimensions(bytes: &[u8], limit: usize) -> Option<Dimensions> {
    let end = bytes.len().min(limit);
    let mut walker = JpegWalker::new();
    let mut pos = 0usize;
    while pos < end {
        let byte = *bytes.get(pos)?;
        pos = pos.saturating_add(1);
        match walker.feed(byte) {
            WalkStep::Continue => {}
            WalkStep::Skip(n) => pos = pos.saturating_add(n),
            WalkStep::Found(d) => return Some(d),
            WalkStep::Abort => return None,
        }
    }
    None
}

/// Dimensions of an in-memory image starting at its signature.
pub fn dimensions(format: ImageFormat, image: &[u8], jpeg_limit: usize) -> Option<Dimensions> {
    match format {
        ImageFormat::Jpeg => jpeg_dimensions(image, jpeg_limit),
        other => fixed_dimensions(other, image),
    }
}

const READ_CHUNK: usize = 64;

/// Dimensions of an image starting at `offset` in an open file.
///
/// Fixed-header formats read [`HEADER_LEN`] bytes; JPEG walks markers,
/// seeking over segment payloads, for at most `jpeg_limit` bytes.
pub async fn read_dimensions<F: File>(
    file: &mut F,
    offset: u64,
    format: ImageFormat,
    jpeg_limit: usize,
) -> Result<Option<Dimensions>, F::Error> {
    file.seek(offset).await?;
    if format != ImageFormat::Jpeg {
        let mut header = [0u8; HEADER_LEN];
        let n = file.read_full(&mut header).await?;
        return Ok(fixed_dimensions(format, header.get(..n).unwrap_or(&[])));
    }

    let mut walker = JpegWalker::new();
    let mut buf = [0u8; READ_CHUNK];
    let mut filled = 0usize;
    let mut pos = 0usize;
    let mut consumed = 0usize;
    while consumed < jpeg_limit {
        if pos >= filled {
            filled = file.read(&mut buf).await?;
            pos = 0;
            if filled == 0 {
                return Ok(None);
            }
        }
        let Some(&byte) = buf.get(pos) else {
            return Ok(None);
        };
        pos = pos.saturating_add(1);
        consumed = consumed.saturating_add(1);
        match walker.feed(byte) {
            WalkStep::Continue => {}
            WalkStep::Skip(n) => {
                consumed = consumed.saturating_add(n);
                let buffered = filled.saturating_sub(pos);
                if n <= buffered {
                    pos = pos.saturating_add(n);
                } else if consumed < jpeg_limit {
                    file.seek(offset.saturating_add(consumed as u64)).await?;
                    pos = filled;
                }
            }
            WalkStep::Found(d) => return Ok(Some(d)),
            WalkStep::Abort => return Ok(None),
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MemStorage;
    use platform::Storage;

    /// Minimal JPEG: SOI, APP0 of `app_len` payload bytes, SOF0 100x50.
    fn jpeg(app_len: usize, sof: u8) -> std::vec::Vec<u8> {
        let mut v = vec![0xFF, 0xD8, 0xFF, 0xE1];
        let seg = (app_len + 2) as u16;
        v.extend_from_slice(&seg.to_be_bytes());
        v.extend(std::iter::repeat(0xFFu8).take(app_len));
        v.extend_from_slice(&[0xFF, sof, 0x00, 0x11, 0x08, 0x00, 0x32, 0x00, 0x64]);
        v
    }

    #[test]
    fn lowest_offset_wins_over_priority() {
        let mut window = [0u8; 64];
        window[10..12].copy_from_slice(b"BM");
        window[20..22].copy_from_slice(&[0xFF, 0xD8]);
        assert_eq!(find_start(&window), Some((10, ImageFormat::Bmp)));
    }

    #[test]
    fn priority_breaks_ties_only() {
        // A PNG signature can never share an offset with JPEG, so check the
        // GIF variants: both start with "GIF8" but only one matches.
        let mut window = [0u8; 32];
        window[4..10].copy_from_slice(b"GIF87a");
        assert_eq!(find_start(&window), Some((4, ImageFormat::Gif)));
    }

    #[test]
    fn no_signature_is_none() {
        assert_eq!(find_start(b"ID3 TXXX padding only"), None);
        assert_eq!(find_start(&[]), None);
    }

    #[test]
    fn png_dimensions_are_big_endian() {
        let mut h = [0u8; 32];
        h[..8].copy_from_slice(PNG_SIGNATURE);
        h[16..20].copy_from_slice(&300u32.to_be_bytes());
        h[20..24].copy_from_slice(&200u32.to_be_bytes());
        assert_eq!(
            fixed_dimensions(ImageFormat::Png, &h),
            Some(Dimensions { width: 300, height: 200 })
        );
    }

    #[test]
    fn bmp_negative_height_is_absolute() {
        let mut h = [0u8; 32];
        h[..2].copy_from_slice(b"BM");
        h[18..22].copy_from_slice(&64u32.to_le_bytes());
        h[22..26].copy_from_slice(&(-48i32).to_le_bytes());
        assert_eq!(
            fixed_dimensions(ImageFormat::Bmp, &h),
            Some(Dimensions { width: 64, height: 48 })
        );
    }

    #[test]
    fn gif_and_qoi_dimensions() {
        let mut g = [0u8; 16];
        g[..6].copy_from_slice(b"GIF89a");
        g[6..8].copy_from_slice(&120u16.to_le_bytes());
        g[8..10].copy_from_slice(&90u16.to_le_bytes());
        assert_eq!(
            fixed_dimensions(ImageFormat::Gif, &g),
            Some(Dimensions { width: 120, height: 90 })
        );

        let mut q = [0u8; 14];
        q[..4].copy_from_slice(b"qoif");
        q[4..8].copy_from_slice(&16u32.to_be_bytes());
        q[8..12].copy_from_slice(&8u32.to_be_bytes());
        assert_eq!(
            fixed_dimensions(ImageFormat::Qoi, &q),
            Some(Dimensions { width: 16, height: 8 })
        );
    }

    #[test]
    fn truncated_header_is_none() {
        assert_eq!(fixed_dimensions(ImageFormat::Png, &PNG_SIGNATURE[..]), None);
        assert_eq!(fixed_dimensions(ImageFormat::Bmp, b"BM"), None);
    }

    #[test]
    fn jpeg_walk_skips_app_segments() {
        let img = jpeg(2000, 0xC0);
        assert_eq!(
            jpeg_dimensions(&img, 16384),
            Some(Dimensions { width: 100, height: 50 })
        );
    }

    #[test]
    fn jpeg_progressive_frame_is_found() {
        let img = jpeg(4, 0xC2);
        assert_eq!(
            jpeg_dimensions(&img, 16384),
            Some(Dimensions { width: 100, height: 50 })
        );
    }

    #[test]
    fn jpeg_beyond_scan_bound_is_none() {
        let img = jpeg(20_000, 0xC0);
        assert_eq!(jpeg_dimensions(&img, 16384), None);
    }

    #[test]
    fn jpeg_bad_segment_length_aborts() {
        let img = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x01, 0xFF, 0xC0];
        assert_eq!(jpeg_dimensions(&img, 16384), None);
    }

    #[test]
    fn jpeg_without_frame_is_none() {
        let img = [0xFF, 0xD8, 0xFF, 0xD9];
        assert_eq!(jpeg_dimensions(&img, 16384), None);
    }

    async fn open_at(data: &[u8]) -> <MemStorage as Storage>::File {
        let mut card = MemStorage::new();
        card.add_file("/music/cover.mp3", data);
        card.open_file("/music/cover.mp3").await.unwrap()
    }

    #[tokio::test]
    async fn file_walk_seeks_over_large_app_segment() {
        let mut data = vec![0u8; 100];
        data.extend_from_slice(&jpeg(5000, 0xC0));
        let mut file = open_at(&data).await;
        assert_eq!(
            read_dimensions(&mut file, 100, ImageFormat::Jpeg, 16384).await.unwrap(),
            Some(Dimensions { width: 100, height: 50 })
        );
    }

    #[tokio::test]
    async fn file_walk_without_frame_is_none() {
        let mut data = vec![0u8; 7];
        data.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9]);
        let mut file = open_at(&data).await;
        assert_eq!(read_dimensions(&mut file, 7, ImageFormat::Jpeg, 16384).await.unwrap(), None);

        // Segment runs past the end of the file.
        let mut file = open_at(&jpeg(5000, 0xC0)[..300]).await;
        assert_eq!(read_dimensions(&mut file, 0, ImageFormat::Jpeg, 16384).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_fixed_header_read_at_offset() {
        let mut data = vec![0u8; 40];
        data.extend_from_slice(b"GIF89a");
        data.extend_from_slice(&[40, 0, 30, 0]);
        let mut file = open_at(&data).await;
        assert_eq!(
            read_dimensions(&mut file, 40, ImageFormat::Gif, 16384).await.unwrap(),
            Some(Dimensions { width: 40, height: 30 })
        );
    }
}
