//! Pure Rust image engine built on the `image` crate.
//!
//! Everything is statically linked — no system ImageMagick, no shared
//! libraries to install.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode | `image::ImageReader` (format by content/extension) |
//! | Resize | `image::imageops` with `Lanczos3` |
//! | Thumbnail | `DynamicImage::resize_to_fill` (fill + center crop) |
//! | Sharpen | `DynamicImage::unsharpen` |
//! | Normalize | custom linear luminance stretch (below) |
//! | Encode JPEG | `JpegEncoder::new_with_quality` |
//! | Encode PNG/GIF/TIFF/WebP/BMP | `DynamicImage::save_with_format` |

use super::backend::{BackendError, ImageBackend, ImageHandle};
use super::ops::ImageOp;
use crate::config::DEFAULT_QUALITY;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extensions with an encoder compiled in.
const OUTPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("bmp", ImageFormat::Bmp),
];

fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    let lower = ext.to_ascii_lowercase();
    OUTPUT_CANDIDATES
        .iter()
        .find(|(candidate, _)| *candidate == lower)
        .map(|(_, format)| *format)
}

/// The shipped engine.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn ImageHandle>, BackendError> {
        let img = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Box::new(RustHandle {
            img,
            format: None,
            quality: None,
        }))
    }
}

/// An open image plus pending encode settings.
struct RustHandle {
    img: DynamicImage,
    format: Option<ImageFormat>,
    quality: Option<u32>,
}

impl ImageHandle for RustHandle {
    fn set_format(&mut self, ext: &str) -> Result<(), BackendError> {
        let format = format_for_extension(ext)
            .filter(|f| f.writing_enabled())
            .ok_or_else(|| BackendError::Unsupported(format!("output format: {ext}")))?;
        self.format = Some(format);
        Ok(())
    }

    fn set_quality(&mut self, quality: u32) -> Result<(), BackendError> {
        self.quality = Some(quality.min(100));
        Ok(())
    }

    fn apply(&mut self, op: &ImageOp) -> Result<(), BackendError> {
        match op {
            ImageOp::ResizeFit { width, height } => {
                if self.img.width() > *width || self.img.height() > *height {
                    self.img = self.img.resize(*width, *height, FilterType::Lanczos3);
                }
            }
            ImageOp::ResizeExact { width, height } => {
                self.img = self.img.resize_exact(*width, *height, FilterType::Lanczos3);
            }
            ImageOp::Thumbnail { width, height } => {
                self.img = self.img.resize_to_fill(*width, *height, FilterType::Lanczos3);
            }
            ImageOp::Sharpen { sigma, threshold } => {
                self.img = self.img.unsharpen(*sigma, *threshold);
            }
            ImageOp::Blur { sigma } => {
                self.img = self.img.blur(*sigma);
            }
            ImageOp::Normalize => {
                self.img = normalize(&self.img);
            }
            ImageOp::Grayscale => {
                self.img = self.img.grayscale();
            }
            ImageOp::Brighten { value } => {
                self.img = self.img.brighten(*value);
            }
            ImageOp::Contrast { value } => {
                self.img = self.img.adjust_contrast(*value);
            }
            ImageOp::FlipHorizontal => {
                self.img = self.img.fliph();
            }
            ImageOp::FlipVertical => {
                self.img = self.img.flipv();
            }
            ImageOp::Rotate { degrees } => {
                self.img = match degrees {
                    90 => self.img.rotate90(),
                    180 => self.img.rotate180(),
                    270 => self.img.rotate270(),
                    other => {
                        return Err(BackendError::Unsupported(format!(
                            "rotation by {other} degrees"
                        )));
                    }
                };
            }
        }
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<(), BackendError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(BackendError::Io)?;
            }
        }

        let format = match self.format {
            Some(format) => format,
            // Handle used without set_format: infer from the target path
            None => ImageFormat::from_path(path).map_err(|_| {
                BackendError::Unsupported(format!("output format for {}", path.display()))
            })?,
        };

        match format {
            ImageFormat::Jpeg => self.write_jpeg(path),
            other => self
                .img
                .save_with_format(path, other)
                .map_err(|e| BackendError::ProcessingFailed(format!("encode failed: {e}"))),
        }
    }
}

impl RustHandle {
    /// JPEG is the one quality-aware encoder; it also has no alpha channel.
    fn write_jpeg(&self, path: &Path) -> Result<(), BackendError> {
        let file = File::create(path).map_err(BackendError::Io)?;
        let writer = BufWriter::new(file);
        let quality = self.quality.unwrap_or(DEFAULT_QUALITY) as u8;
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);

        let rgb = self.img.to_rgb8();
        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))
    }
}

/// Linear contrast stretch: remap channels so the darkest luminance maps to
/// 0 and the brightest to 255. Flat images come back unchanged.
fn normalize(img: &DynamicImage) -> DynamicImage {
    let gray = img.to_luma8();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for value in gray.iter() {
        min = min.min(*value);
        max = max.max(*value);
    }
    if max <= min {
        return img.clone();
    }

    let low = min as f32;
    let range = (max - min) as f32;
    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in 0..3 {
            let stretched = (pixel[channel] as f32 - low) / range * 255.0;
            pixel[channel] = stretched.clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}
