//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests: an in-memory SD card, a scripted
//! decode engine, a queued keyboard and a battery gauge.

#![cfg(any(test, feature = "std"))]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::*;

// ── MemStorage ───────────────────────────────────────────────────────────────

/// Errors reported by [`MemStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    /// Path does not exist
    NotFound,
    /// Expected a directory
    NotADirectory,
    /// Expected a file
    IsADirectory,
    /// Path already exists
    AlreadyExists,
    /// Injected I/O failure
    Io,
}

impl core::fmt::Display for MemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::NotFound => "not found",
            Self::NotADirectory => "not a directory",
            Self::IsADirectory => "is a directory",
            Self::AlreadyExists => "already exists",
            Self::Io => "i/o error",
        };
        f.write_str(msg)
    }
}

struct Node {
    path: String,
    data: Option<Arc<Vec<u8>>>,
}

#[derive(Default)]
struct MemFs {
    nodes: Vec<Node>,
    fail_removals: bool,
}

impl MemFs {
    fn find(&self, path: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.path == path)
    }

    fn is_dir(&self, path: &str) -> bool {
        path == "/" || self.find(path).is_some_and(|n| n.data.is_none())
    }

    fn ensure_dir(&mut self, path: &str) {
        if path == "/" || self.find(path).is_some() {
            return;
        }
        self.ensure_dir(parent_of(path));
        self.nodes.push(Node {
            path: path.to_string(),
            data: None,
        });
    }
}

fn parent_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// In-memory SD card.
///
/// Cloning shares the same file system, so the UI and decode contexts of a
/// test can each hold a handle. Directory listings come back in insertion
/// order.
#[derive(Clone, Default)]
pub struct MemStorage {
    fs: Arc<Mutex<MemFs>>,
}

impl MemStorage {
    /// Create an empty card (only `/` exists)
    pub fn new() -> Self {
        Self::default()
    }

    fn fs(&self) -> MutexGuard<'_, MemFs> {
        self.fs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file, creating missing parent directories
    pub fn add_file(&self, path: &str, data: &[u8]) {
        let mut fs = self.fs();
        fs.ensure_dir(parent_of(path));
        fs.nodes.retain(|n| n.path != path);
        fs.nodes.push(Node {
            path: path.to_string(),
            data: Some(Arc::new(data.to_vec())),
        });
    }

    /// Add an empty directory, creating missing parents
    pub fn add_dir(&self, path: &str) {
        self.fs().ensure_dir(path);
    }

    /// Make every subsequent [`Storage::remove`] fail
    pub fn set_fail_removals(&self, fail: bool) {
        self.fs().fail_removals = fail;
    }

    /// True if `path` is a file or directory
    pub fn contains(&self, path: &str) -> bool {
        let fs = self.fs();
        fs.is_dir(path) || fs.find(path).is_some()
    }

    /// Paths of all files, in insertion order
    pub fn files(&self) -> Vec<String> {
        self.fs()
            .nodes
            .iter()
            .filter(|n| n.data.is_some())
            .map(|n| n.path.clone())
            .collect()
    }
}

/// Open file on a [`MemStorage`]
pub struct MemFile {
    data: Arc<Vec<u8>>,
    pos: usize,
}

impl File for MemFile {
    type Error = MemError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.data.get(self.pos..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX);
        Ok(pos)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Directory listing snapshot on a [`MemStorage`]
pub struct MemDir {
    entries: VecDeque<DirEntry>,
}

impl Dir for MemDir {
    type Error = MemError;

    async fn next_entry(&mut self) -> Result<Option<DirEntry>, Self::Error> {
        Ok(self.entries.pop_front())
    }
}

impl Storage for MemStorage {
    type Error = MemError;
    type File = MemFile;
    type Dir = MemDir;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let fs = self.fs();
        let node = fs.find(path).ok_or(MemError::NotFound)?;
        let data = node.data.clone().ok_or(MemError::IsADirectory)?;
        Ok(MemFile { data, pos: 0 })
    }

    async fn open_dir(&mut self, path: &str) -> Result<Self::Dir, Self::Error> {
        let fs = self.fs();
        if !fs.is_dir(path) {
            return Err(if fs.find(path).is_some() {
                MemError::NotADirectory
            } else {
                MemError::NotFound
            });
        }
        let entries = fs
            .nodes
            .iter()
            .filter(|n| parent_of(&n.path) == path)
            .filter_map(|n| {
                let kind = if n.data.is_some() {
                    EntryKind::File
                } else {
                    EntryKind::Directory
                };
                DirEntry::new(name_of(&n.path), kind)
            })
            .collect();
        Ok(MemDir { entries })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.contains(path))
    }

    async fn remove(&mut self, path: &str) -> Result<(), Self::Error> {
        let mut fs = self.fs();
        if fs.fail_removals {
            return Err(MemError::Io);
        }
        match fs.find(path).map(|n| n.data.is_some()) {
            None => Err(MemError::NotFound),
            Some(false) => Err(MemError::IsADirectory),
            Some(true) => {
                fs.nodes.retain(|n| n.path != path);
                Ok(())
            }
        }
    }

    async fn create_dir(&mut self, path: &str) -> Result<(), Self::Error> {
        let mut fs = self.fs();
        if fs.is_dir(path) || fs.find(path).is_some() {
            return Err(MemError::AlreadyExists);
        }
        if !fs.is_dir(parent_of(path)) {
            return Err(MemError::NotFound);
        }
        fs.nodes.push(Node {
            path: path.to_string(),
            data: None,
        });
        Ok(())
    }
}

// ── ScriptedEngine ───────────────────────────────────────────────────────────

/// One callback the [`ScriptedEngine`] delivers on a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `on_metadata_line` with these raw bytes
    Metadata(Vec<u8>),
    /// `on_image_located`
    Image {
        /// File offset
        position: u64,
        /// Declared length
        len: u64,
    },
    /// `on_end_of_file`; the stream is closed afterwards
    EndOfFile,
}

impl EngineEvent {
    /// Metadata line from text
    pub fn line(text: &str) -> Self {
        Self::Metadata(text.as_bytes().to_vec())
    }
}

/// Errors reported by [`ScriptedEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The file is not on the card
    NotFound,
}

/// Decode engine double that opens files from a [`MemStorage`] and, while a
/// stream is open, delivers one queued [`EngineEvent`] per step.
pub struct ScriptedEngine {
    storage: MemStorage,
    script: VecDeque<EngineEvent>,
    opened: Vec<String>,
    current: Option<String>,
    stops: usize,
    steps: usize,
    volume: Option<Volume>,
    balance: i8,
}

impl ScriptedEngine {
    /// Create an engine reading from `storage`
    pub fn new(storage: MemStorage) -> Self {
        Self {
            storage,
            script: VecDeque::new(),
            opened: Vec::new(),
            current: None,
            stops: 0,
            steps: 0,
            volume: None,
            balance: 0,
        }
    }

    /// Queue an event for a later step
    pub fn push_event(&mut self, event: EngineEvent) {
        self.script.push_back(event);
    }

    /// Every path successfully opened, in order
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    /// Path of the open stream
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Number of `stop` calls
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Number of steps that ran against an open stream
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Last applied volume
    pub fn volume(&self) -> Option<Volume> {
        self.volume
    }

    /// Last applied balance
    pub fn balance(&self) -> i8 {
        self.balance
    }
}

impl DecodeEngine for ScriptedEngine {
    type Error = EngineError;

    async fn open(&mut self, path: &str) -> Result<(), Self::Error> {
        let found = self.storage.fs().find(path).is_some_and(|n| n.data.is_some());
        if !found {
            return Err(EngineError::NotFound);
        }
        self.opened.push(path.to_string());
        self.current = Some(path.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        self.stops = self.stops.saturating_add(1);
        self.current = None;
    }

    async fn step<L: EngineListener>(&mut self, listener: &mut L) -> Result<(), Self::Error> {
        if self.current.is_none() {
            return Ok(());
        }
        self.steps = self.steps.saturating_add(1);
        match self.script.pop_front() {
            Some(EngineEvent::Metadata(line)) => listener.on_metadata_line(&line),
            Some(EngineEvent::Image { position, len }) => listener.on_image_located(position, len),
            Some(EngineEvent::EndOfFile) => {
                self.current = None;
                listener.on_end_of_file();
            }
            None => {}
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = Some(volume);
    }

    fn set_balance(&mut self, balance: i8) {
        self.balance = balance;
    }

    fn sample_rate(&self) -> u32 {
        if self.current.is_some() {
            44_100
        } else {
            0
        }
    }

    fn bits_per_sample(&self) -> u8 {
        if self.current.is_some() {
            16
        } else {
            0
        }
    }
}

// ── MockInput ────────────────────────────────────────────────────────────────

/// Mock input device
pub struct MockInput {
    events: heapless::Deque<InputEvent, 16>,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
        }
    }

    /// Add event to queue
    pub fn add_event(&mut self, event: InputEvent) -> Result<(), InputEvent> {
        self.events.push_back(event)
    }

    /// Queue a key press
    pub fn press(&mut self, key: Key) -> Result<(), InputEvent> {
        self.add_event(InputEvent::KeyPress(key))
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    async fn wait_for_event(&mut self) -> InputEvent {
        loop {
            if let Some(event) = self.events.pop_front() {
                return event;
            }
            embassy_time::Timer::after_millis(10).await;
        }
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

// ── MockBattery ──────────────────────────────────────────────────────────────

/// Mock battery gauge; clones share the reading.
#[derive(Clone, Default)]
pub struct MockBattery {
    millivolts: Arc<AtomicU16>,
    reads: Arc<AtomicUsize>,
}

impl MockBattery {
    /// Gauge reading `mv` millivolts
    pub fn new(mv: u16) -> Self {
        let battery = Self::default();
        battery.set_millivolts(mv);
        battery
    }

    /// Change the reading; 0 means no reading
    pub fn set_millivolts(&self, mv: u16) {
        self.millivolts.store(mv, Ordering::Relaxed);
    }

    /// Number of voltage reads so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl PowerMonitor for MockBattery {
    fn battery_voltage(&self) -> Option<u16> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Some(self.millivolts.load(Ordering::Relaxed)).filter(|mv| *mv > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mem_storage_lists_in_insertion_order() {
        let mut card = MemStorage::new();
        card.add_file("/music/b.mp3", b"b");
        card.add_dir("/music/live");
        card.add_file("/music/a.mp3", b"a");
        let mut dir = card.open_dir("/music").await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.unwrap() {
            names.push(entry.name.as_str().to_string());
        }
        assert_eq!(names, ["b.mp3", "live", "a.mp3"]);
        let mut root = card.open_dir("/").await.unwrap();
        let music = root.next_entry().await.unwrap().unwrap();
        assert!(music.is_dir());
        assert_eq!(music.name.as_str(), "music");
    }

    #[tokio::test]
    async fn mem_storage_remove_and_injected_failure() {
        let mut card = MemStorage::new();
        card.add_file("/a.mp3", b"a");
        card.set_fail_removals(true);
        assert_eq!(card.remove("/a.mp3").await, Err(MemError::Io));
        assert!(card.contains("/a.mp3"));
        card.set_fail_removals(false);
        card.remove("/a.mp3").await.unwrap();
        assert!(!card.exists("/a.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn mem_file_reads_from_seek_position() {
        let mut card = MemStorage::new();
        card.add_file("/x.bin", b"0123456789");
        let mut f = card.open_file("/x.bin").await.unwrap();
        f.seek(6).await.unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(f.read_full(&mut buf).await.unwrap(), 4);
        assert_eq!(&buf[..4], b"6789");
    }

    #[tokio::test]
    async fn scripted_engine_refuses_missing_files() {
        let card = MemStorage::new();
        card.add_file("/music/a.mp3", b"a");
        let mut engine = ScriptedEngine::new(card);
        assert!(engine.open("/music/a.mp3").await.is_ok());
        assert_eq!(engine.open("/music/zz.mp3").await, Err(EngineError::NotFound));
        assert_eq!(engine.opened(), ["/music/a.mp3"]);
    }

    #[test]
    fn mock_input_queues_key_presses() {
        let mut input = MockInput::new();
        input.press(Key::NextTrack).unwrap();
        assert_eq!(input.poll_event(), Some(InputEvent::KeyPress(Key::NextTrack)));
        assert_eq!(input.poll_event(), None);
    }

    #[test]
    fn mock_battery_clones_share_reading() {
        let battery = MockBattery::new(4200);
        let gauge = battery.clone();
        assert_eq!(gauge.battery_percentage(), Some(100));
        battery.set_millivolts(0);
        assert_eq!(gauge.battery_percentage(), None);
        assert_eq!(battery.reads(), 2);
    }
}
