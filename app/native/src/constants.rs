//! Application-wide constants.

/// Application identifier used for data and cache directories.
pub const APP_ID: &str = "com.marcosmoura.wallthumb";

/// Name of the configuration directory under `~/.config` and the platform config dir.
pub const APP_NAME: &str = "wallthumb";

/// Subdirectory of the application data directory holding cached thumbnails.
pub const THUMBNAIL_SUBDIR: &str = "thumbnails";

/// Environment variable read for the log filter.
pub const LOG_ENV: &str = "WALLTHUMB_LOG";

/// Thumbnail defaults.
pub mod thumbnail {
    use std::time::Duration;

    /// Target box width in pixels.
    pub const WIDTH: u32 = 400;

    /// Target box height in pixels.
    pub const HEIGHT: u32 = 250;

    /// JPEG encode quality (1-100).
    pub const QUALITY: u8 = 80;

    /// Days after the last access before an artifact is swept.
    pub const TTL_DAYS: u64 = 30;

    /// Retention window derived from [`TTL_DAYS`].
    pub const TTL: Duration = Duration::from_secs(TTL_DAYS * 24 * 60 * 60);

    /// Maximum number of generations in flight per batch window.
    pub const BATCH_WINDOW: usize = 3;

    /// File extension of cached artifacts.
    pub const EXTENSION: &str = "jpg";
}
