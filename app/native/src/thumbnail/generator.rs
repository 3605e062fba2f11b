//! Thumbnail generation.
//!
//! Decodes a source image (format sniffed from its content), scales it to cover the target
//! box, center-crops the overflow and encodes the result as JPEG.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageReader};

use crate::error::ThumbnailError;

/// Produces thumbnail bytes from a source file.
///
/// Implementations are called from the blocking thread pool and must not write to the store.
pub trait Generator: Send + Sync {
    /// Generates the encoded thumbnail for `source`.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Codec` for unsupported or corrupt input and
    /// `ThumbnailError::Io` if the source cannot be read.
    fn generate(&self, source: &Path) -> Result<Vec<u8>, ThumbnailError>;
}

/// Target box dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

/// The default generator backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct JpegGenerator {
    size: BoxSize,
    quality: u8,
}

impl JpegGenerator {
    /// Creates a generator for the given box and JPEG quality.
    #[must_use]
    pub const fn new(size: BoxSize, quality: u8) -> Self { Self { size, quality } }
}

impl Generator for JpegGenerator {
    fn generate(&self, source: &Path) -> Result<Vec<u8>, ThumbnailError> {
        let img = ImageReader::open(source)
            .map_err(|err| ThumbnailError::io_at("open", source, err))?
            .with_guessed_format()
            .map_err(|err| ThumbnailError::io_at("read", source, err))?
            .decode()
            .map_err(|err| image_error(source, err))?;

        let thumb = resize_to_cover(&img, self.size);

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.quality);
        thumb.to_rgb8().write_with_encoder(encoder).map_err(|err| image_error(source, err))?;

        Ok(bytes)
    }
}

/// Maps an `image` error onto the thumbnail taxonomy.
fn image_error(source: &Path, err: ImageError) -> ThumbnailError {
    match err {
        ImageError::IoError(io_err) => ThumbnailError::io_at("read", source, io_err),
        other => ThumbnailError::Codec { path: source.to_path_buf(), message: other.to_string() },
    }
}

/// Resizes an image to cover the box while maintaining aspect ratio.
///
/// The largest centered region with the box's aspect ratio is cropped from the source and
/// then scaled to the box, so memory stays bounded by the source and the output even for
/// extreme aspect ratios. Never letterboxes and never distorts.
pub fn resize_to_cover(img: &DynamicImage, size: BoxSize) -> DynamicImage {
    let (img_width, img_height) = img.dimensions();
    let target_width = size.width.max(1);
    let target_height = size.height.max(1);

    // Rounding up keeps a one-pixel-wide source from cropping to nothing.
    let crop_width = scaled_side(img_height, target_width, target_height).min(img_width).max(1);
    let crop_height = scaled_side(img_width, target_height, target_width).min(img_height).max(1);

    let crop_x = img_width.saturating_sub(crop_width) / 2;
    let crop_y = img_height.saturating_sub(crop_height) / 2;

    img.crop_imm(crop_x, crop_y, crop_width, crop_height).resize_exact(
        target_width,
        target_height,
        FilterType::CatmullRom,
    )
}

/// `ceil(side * num / den)`, saturating at `u32::MAX`.
fn scaled_side(side: u32, num: u32, den: u32) -> u32 {
    let scaled = (u64::from(side) * u64::from(num)).div_ceil(u64::from(den));
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
