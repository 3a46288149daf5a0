//! Integration tests for the recursive catalog scan.
//!
//! Most cases run against the in-memory card so directory order is exact;
//! the last ones walk a real temporary directory through `LocalFileStorage`.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use library::{Catalog, SharedCatalog, TrackCatalog};
use platform::config::{LibraryConfig, PlayerConfig, MAX_TRACKS};
use platform::mocks::MemStorage;
use platform::storage_local::LocalFileStorage;

fn paths<const N: usize>(c: &TrackCatalog<N>) -> Vec<String> {
    c.iter().map(str::to_owned).collect()
}

#[tokio::test]
async fn scan_keeps_directory_order_and_recurses_in_place() {
    let mut card = MemStorage::new();
    card.add_file("/music/b.mp3", b"");
    card.add_file("/music/live/x.wav", b"");
    card.add_file("/music/live/y.mp3", b"");
    card.add_file("/music/a.MP3", b"");
    card.add_file("/music/cover.jpg", b"");

    let mut catalog = Catalog::new();
    let added = catalog.populate(&mut card, "/music", 4).await;

    assert_eq!(added, 4);
    assert_eq!(
        paths(&catalog),
        ["/music/b.mp3", "/music/live/x.wav", "/music/live/y.mp3", "/music/a.MP3"]
    );
}

#[tokio::test]
async fn scan_respects_max_depth() {
    let mut card = MemStorage::new();
    card.add_file("/music/top.mp3", b"");
    card.add_file("/music/one/mid.mp3", b"");
    card.add_file("/music/one/two/deep.mp3", b"");

    let mut shallow = Catalog::new();
    shallow.populate(&mut card, "/music", 1).await;
    assert_eq!(paths(&shallow), ["/music/top.mp3", "/music/one/mid.mp3"]);

    let mut flat = Catalog::new();
    flat.populate(&mut card, "/music", 0).await;
    assert_eq!(paths(&flat), ["/music/top.mp3"]);
}

#[tokio::test]
async fn scan_stops_at_capacity() {
    let mut card = MemStorage::new();
    for i in 0..10 {
        card.add_file(&format!("/music/{i:02}.mp3"), b"");
    }
    let mut small: TrackCatalog<4> = TrackCatalog::new();
    let added = small.populate(&mut card, "/music", 2).await;
    assert_eq!(added, 4);
    assert!(small.is_full());
    assert_eq!(small.get(3), Some("/music/03.mp3"));
}

#[tokio::test]
async fn scan_of_missing_root_is_empty() {
    let mut card = MemStorage::new();
    let mut catalog = Catalog::new();
    assert_eq!(catalog.populate(&mut card, "/music", 4).await, 0);
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn scan_of_file_root_is_empty() {
    let mut card = MemStorage::new();
    card.add_file("/music", b"not a dir");
    let mut catalog = Catalog::new();
    assert_eq!(catalog.populate(&mut card, "/music", 4).await, 0);
}

#[tokio::test]
async fn populate_falls_back_to_card_root() {
    let mut card = MemStorage::new();
    card.add_dir("/music");
    card.add_file("/loose.mp3", b"");
    card.add_file("/podcasts/ep1.mp3", b"");

    let config: LibraryConfig = PlayerConfig::new().library;
    let mut catalog = Catalog::new();
    let found = catalog.populate_from(&mut card, &config).await;

    assert_eq!(found, 2);
    assert_eq!(paths(&catalog), ["/loose.mp3", "/podcasts/ep1.mp3"]);
}

#[tokio::test]
async fn populate_prefers_music_dir() {
    let mut card = MemStorage::new();
    card.add_file("/loose.mp3", b"");
    card.add_file("/music/a.mp3", b"");
    let config = PlayerConfig::new().library;
    let mut catalog = Catalog::new();
    catalog.populate_from(&mut card, &config).await;
    assert_eq!(paths(&catalog), ["/music/a.mp3"]);
}

#[tokio::test]
async fn scan_real_directory_tree() {
    let tmp = tempfile::TempDir::new().unwrap();
    let music = tmp.path().join("music");
    std::fs::create_dir_all(music.join("album")).unwrap();
    std::fs::write(music.join("album/01.mp3"), b"").unwrap();
    std::fs::write(music.join("notes.txt"), b"").unwrap();

    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
    let mut catalog = Catalog::new();
    let added = catalog.populate(&mut storage, "/music", 4).await;

    assert_eq!(added, 1);
    assert_eq!(catalog.get(0), Some("/music/album/01.mp3"));
}

#[tokio::test]
async fn delete_real_file_through_catalog() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("music")).unwrap();
    std::fs::write(tmp.path().join("music/a.mp3"), b"").unwrap();

    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
    let mut scanned = Catalog::new();
    scanned.populate(&mut storage, "/music", 0).await;
    let catalog: SharedCatalog<NoopRawMutex, MAX_TRACKS> = SharedCatalog::new();
    catalog.replace(scanned);
    let outcome = catalog
        .delete_at(&mut storage, 0, library::Cursor::default(), true)
        .await
        .unwrap();

    assert_eq!(outcome, library::DeleteOutcome::Emptied);
    assert!(catalog.is_empty());
    assert!(!tmp.path().join("music/a.mp3").exists());
}
