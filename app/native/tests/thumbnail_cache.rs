//! End-to-end tests for the thumbnail cache.
//!
//! These tests decode real images and write to temporary directories only.
//!
//! ```bash
//! cargo test -p wallthumb --test thumbnail_cache
//! ```

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use image::{GenericImageView, ImageFormat, ImageReader, Rgb, RgbImage};
use tempfile::TempDir;
use wallthumb_lib::{CacheStats, ThumbnailConfig, ThumbnailService};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

// ============================================================================
// Helpers
// ============================================================================

struct Fixture {
    sources: TempDir,
    cache: TempDir,
    service: ThumbnailService,
}

impl Fixture {
    fn new() -> Self {
        let sources = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let service = ThumbnailService::new(ThumbnailConfig::with_root(cache.path()));
        Self { sources, cache, service }
    }

    fn image(&self, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
        let path = self.sources.path().join(name);
        RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
            .save_with_format(&path, format)
            .unwrap();
        path
    }

    fn in_cache(&self, path: &Path) -> bool { path.starts_with(self.cache.path()) }
}

fn dimensions(path: &Path) -> (u32, u32) {
    ImageReader::open(path).unwrap().with_guessed_format().unwrap().decode().unwrap().dimensions()
}

fn set_modified(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_modified(time)).unwrap();
}

fn set_accessed(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_accessed(time)).unwrap();
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn thumbnails_fit_the_target_box() {
    let fx = Fixture::new();
    let cases = [
        fx.image("wide.png", 1920, 1080, ImageFormat::Png),
        fx.image("tall.jpg", 600, 1200, ImageFormat::Jpeg),
        fx.image("square.webp", 512, 512, ImageFormat::WebP),
        fx.image("tiny.png", 40, 30, ImageFormat::Png),
    ];

    for source in &cases {
        let thumb = fx.service.generate_thumbnail(source).await;
        assert!(fx.in_cache(&thumb), "{} fell back", source.display());
        assert_eq!(thumb.extension().and_then(|e| e.to_str()), Some("jpg"));

        let (width, height) = dimensions(&thumb);
        assert!(width <= 400 && height <= 250, "{width}x{height} for {}", source.display());
    }
}

#[tokio::test]
async fn extreme_aspect_ratios_produce_box_sized_thumbnails() {
    let fx = Fixture::new();
    let sources = [
        fx.image("strip.png", 16_000, 1, ImageFormat::Png),
        fx.image("column.png", 1, 16_000, ImageFormat::Png),
    ];

    for source in &sources {
        let thumb = fx.service.generate_thumbnail(source).await;
        assert!(fx.in_cache(&thumb), "{} fell back", source.display());
        assert_eq!(dimensions(&thumb), (400, 250));
    }
}

#[tokio::test]
async fn second_call_is_a_cache_hit() {
    let fx = Fixture::new();
    let source = fx.image("wall.png", 800, 600, ImageFormat::Png);

    let first = fx.service.generate_thumbnail(&source).await;
    let written = fs::metadata(&first).unwrap().modified().unwrap();
    let second = fx.service.generate_thumbnail(&source).await;

    assert_eq!(first, second);
    assert_eq!(fs::metadata(&second).unwrap().modified().unwrap(), written);
    assert_eq!(fx.service.get_cache_stats().count, 1);
}

#[tokio::test]
async fn touching_the_source_forces_regeneration() {
    let fx = Fixture::new();
    let source = fx.image("wall.png", 800, 600, ImageFormat::Png);
    set_modified(&source, SystemTime::now() - DAY);

    let before = fx.service.generate_thumbnail(&source).await;
    set_modified(&source, SystemTime::now());
    let after = fx.service.generate_thumbnail(&source).await;

    assert_ne!(before, after);
    assert!(fx.in_cache(&after));
    assert_eq!(fx.service.get_cache_stats().count, 2);
}

#[tokio::test]
async fn corrupt_and_missing_sources_fall_back() {
    let fx = Fixture::new();
    let corrupt = fx.sources.path().join("corrupt.jpg");
    fs::write(&corrupt, b"\xFF\xD8\xFF not really a jpeg").unwrap();
    let missing = fx.sources.path().join("missing.png");

    assert_eq!(fx.service.generate_thumbnail(&corrupt).await, corrupt);
    assert_eq!(fx.service.generate_thumbnail(&missing).await, missing);
    assert_eq!(fx.service.get_cache_stats(), CacheStats::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_all_see_a_complete_file() {
    let fx = Fixture::new();
    let source = fx.image("wall.png", 1600, 900, ImageFormat::Png);
    let service = Arc::new(fx.service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let source = source.clone();
            tokio::spawn(async move { service.generate_thumbnail(&source).await })
        })
        .collect();

    let mut paths = Vec::new();
    for handle in handles {
        paths.push(handle.await.unwrap());
    }

    assert!(paths.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(dimensions(&paths[0]), (400, 250));
    assert_eq!(service.get_cache_stats().count, 1);

    let leftovers: Vec<_> = fs::read_dir(fx.cache.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

// ============================================================================
// Batches
// ============================================================================

#[tokio::test]
async fn batch_of_ten_maps_every_source() {
    let fx = Fixture::new();
    let mut sources: Vec<PathBuf> =
        (0..8).map(|i| fx.image(&format!("{i}.png"), 300 + i, 200, ImageFormat::Png)).collect();
    sources.push(fx.sources.path().join("missing.jpg"));
    let corrupt = fx.sources.path().join("corrupt.png");
    fs::write(&corrupt, b"garbage").unwrap();
    sources.push(corrupt);

    let results = fx.service.generate_thumbnails(&sources).await;

    assert_eq!(results.len(), 10);
    let cached = results.iter().filter(|(source, thumb)| source != thumb).count();
    assert_eq!(cached, 8);
    assert_eq!(fx.service.get_cache_stats().count, 8);
}

#[tokio::test]
async fn empty_batch_is_empty() {
    let fx = Fixture::new();
    assert!(fx.service.generate_thumbnails(&[]).await.is_empty());
}

// ============================================================================
// Eviction and stats
// ============================================================================

#[tokio::test]
async fn prune_keeps_recently_used_thumbnails() {
    let fx = Fixture::new();
    let old_source = fx.image("old.png", 500, 300, ImageFormat::Png);
    let new_source = fx.image("new.png", 500, 300, ImageFormat::Png);

    let old_thumb = fx.service.generate_thumbnail(&old_source).await;
    let new_thumb = fx.service.generate_thumbnail(&new_source).await;
    set_accessed(&old_thumb, SystemTime::now() - 31 * DAY);
    set_accessed(&new_thumb, SystemTime::now() - 2 * DAY);

    assert_eq!(fx.service.clear_old_thumbnails().unwrap(), 1);
    assert!(!old_thumb.exists());
    assert!(new_thumb.exists());
}

#[tokio::test]
async fn clear_all_resets_stats() {
    let fx = Fixture::new();
    for i in 0..3 {
        let source = fx.image(&format!("{i}.png"), 640, 480, ImageFormat::Png);
        fx.service.generate_thumbnail(&source).await;
    }

    let stats = fx.service.get_cache_stats();
    assert_eq!(stats.count, 3);
    assert!(stats.total_size_bytes > 0);

    assert_eq!(fx.service.clear_all_thumbnails().unwrap(), 3);
    assert_eq!(fx.service.get_cache_stats(), CacheStats { count: 0, total_size_bytes: 0 });
}

#[tokio::test]
async fn stats_on_fresh_cache_are_zero() {
    let temp_dir = TempDir::new().unwrap();
    let service = ThumbnailService::new(ThumbnailConfig::with_root(temp_dir.path().join("later")));
    assert_eq!(service.get_cache_stats(), CacheStats::default());
}
