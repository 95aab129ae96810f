//! Image loading for file-based callers
//!
//! Decodes common raster formats with the `image` crate into an 8-bit RGBA
//! buffer, which implements [`PixelSource`](crate::analysis::PixelSource)
//! directly. Camera capture and platform-specific decoding stay with the
//! caller; the analysis core never reads files.
//!
//! ## Supported Formats
//!
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, PNM, QOI
//!
//! EXIF orientation is not applied. Region heuristics assume an upright,
//! front-facing portrait.

use std::path::Path;

use image::{ImageReader, RgbaImage};
use log::debug;

use crate::{EngineError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// First frame only
    Gif,
    WebP,
    Tiff,
    Bmp,
    Ico,
    Tga,
    /// PBM, PGM, PPM
    Pnm,
    Qoi,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "ico" => Some(ImageFormat::Ico),
            "tga" => Some(ImageFormat::Tga),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            _ => None,
        }
    }
}

/// Load an image from disk as 8-bit RGBA
///
/// # Errors
///
/// Returns `ImageLoadError` if the extension is not supported, the file
/// cannot be opened, or decoding fails.
///
/// # Example
///
/// ```rust,no_run
/// use shade_match::image_loader::load_image;
/// use shade_match::MatchingEngine;
/// use std::path::Path;
///
/// # fn run(engine: &MatchingEngine) -> shade_match::Result<()> {
/// let frame = load_image(Path::new("selfie.jpg"))?;
/// let analysis = engine.analyze(&frame)?;
/// println!("Dominant tone: {}", analysis.dominant.hex);
/// # Ok(())
/// # }
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| EngineError::ImageLoadError {
        message: format!("Unsupported image format: {}", path.display()),
        source: None,
    })?;

    let reader = ImageReader::open(path).map_err(|e| {
        EngineError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let image = reader.decode().map_err(|e| {
        EngineError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgba = image.to_rgba8();
    debug!("loaded {:?} image {}x{}", format, rgba.width(), rgba.height());
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PixelSource;

    fn detect(name: &str) -> Option<ImageFormat> {
        ImageFormat::from_extension(Path::new(name))
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(detect("photo.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(detect("photo.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(detect("photo.png"), Some(ImageFormat::Png));
        assert_eq!(detect("photo.webp"), Some(ImageFormat::WebP));
        assert_eq!(detect("photo.heic"), None);
        assert_eq!(detect("photo.TIF"), Some(ImageFormat::Tiff));
        assert_eq!(detect("photo.ppm"), Some(ImageFormat::Pnm));
        assert_eq!(detect("photo.doc"), None);
        assert_eq!(detect("photo"), None);
    }

    #[test]
    fn test_load_png_roundtrip() {
        let path =
            std::env::temp_dir().join(format!("shade_match_loader_{}.png", std::process::id()));
        let source = RgbaImage::from_pixel(4, 3, image::Rgba([0xD4, 0xA5, 0x74, 0xFF]));
        source.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(PixelSource::width(&loaded), 4);
        assert_eq!(PixelSource::height(&loaded), 3);
        assert_eq!(loaded.pixel(2, 1).rgb().to_hex(), "#D4A574");
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/nonexistent/selfie.jpg")).unwrap_err();
        assert!(matches!(err, EngineError::ImageLoadError { source: Some(_), .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_image(Path::new("selfie.heic")).unwrap_err();
        assert!(matches!(err, EngineError::ImageLoadError { source: None, .. }));
    }
}
