//! Page rendering and JPEG encoding.
//!
//! Pages are always rendered at a fixed 300 DPI so the same PDF bytes
//! produce the same bitmap, and therefore the same crop box, on every run.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage};
use pdfium_render::prelude::*;
use tracing::debug;

use super::geometry::{PixelBox, Rectangle};
use crate::error::CropError;

/// Fixed render resolution for all pages
pub const RENDER_DPI: f64 = 300.0;

/// JPEG output quality
pub const JPEG_QUALITY: u8 = 90;

/// Scale factor from PDF points (1/72 inch) to pixels at [`RENDER_DPI`]
pub fn pixels_per_point() -> f64 {
    RENDER_DPI / 72.0
}

/// Render the full page at [`RENDER_DPI`] as an RGB bitmap.
pub fn render_full_page(page: &PdfPage) -> Result<RgbImage, CropError> {
    let page_width_pts = page.width().value as f64;
    let page_height_pts = page.height().value as f64;

    let scale = pixels_per_point();
    let target_width = (page_width_pts * scale).ceil() as i32;
    let target_height = (page_height_pts * scale).ceil() as i32;

    debug!(
        page_size_pts = format!("{:.1}x{:.1}", page_width_pts, page_height_pts),
        output_size = format!("{}x{}", target_width, target_height),
        dpi = RENDER_DPI,
        "Rendering page"
    );

    let config = PdfRenderConfig::new()
        .set_target_width(target_width)
        .set_target_height(target_height);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| CropError::PageRender {
            source: Box::new(std::io::Error::other(format!(
                "Failed to render page: {e:?}"
            ))),
        })?;

    // pdfium-render's built-in conversion handles the color format correctly
    Ok(bitmap.as_image().to_rgb8())
}

/// Convert a region in PDF points to a pixel box on the rendered bitmap.
///
/// PDF coordinates have origin at bottom-left, image coordinates at
/// top-left. The result is clamped to the bitmap and never empty.
pub fn region_to_pixels(
    region: &Rectangle,
    page_height_pts: f64,
    image_width: u32,
    image_height: u32,
) -> PixelBox {
    let scale = pixels_per_point();

    let left = ((region.x1 * scale).floor() as u32).min(image_width.saturating_sub(1));
    let top = (((page_height_pts - region.y2) * scale).floor() as u32)
        .min(image_height.saturating_sub(1));
    let width = ((region.width() * scale).ceil() as u32)
        .min(image_width - left)
        .max(1);
    let height = ((region.height() * scale).ceil() as u32)
        .min(image_height - top)
        .max(1);

    PixelBox {
        x: left,
        y: top,
        width,
        height,
    }
}

/// Crop a pixel box out of the rendered page.
pub fn crop_to_box(image: &RgbImage, crop: &PixelBox) -> RgbImage {
    image::imageops::crop_imm(image, crop.x, crop.y, crop.width, crop.height).to_image()
}

/// Encode an RGB bitmap as JPEG bytes.
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, CropError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(CropError::Encode)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_page_dimensions_at_render_dpi() {
        let scale = pixels_per_point();

        // A letter page (612x792 pts) at 300 DPI is approximately 2550x3300
        // pixels. Allow for floating-point rounding (ceil can round up by 1).
        let width = (612.0 * scale).ceil() as i32;
        let height = (792.0 * scale).ceil() as i32;
        assert!((width - 2550).abs() <= 1, "width was {}", width);
        assert!((height - 3300).abs() <= 1, "height was {}", height);
    }

    #[test]
    fn test_region_to_pixels_flips_y_axis() {
        // A region hugging the top of a 792pt page lands at the top of the
        // bitmap.
        let region = Rectangle {
            x1: 0.0,
            y1: 756.0,
            x2: 72.0,
            y2: 792.0,
        };
        let scale = pixels_per_point();
        let image_width = (612.0 * scale).ceil() as u32;
        let image_height = (792.0 * scale).ceil() as u32;

        let px = region_to_pixels(&region, 792.0, image_width, image_height);
        assert_eq!(px.y, 0);
        assert_eq!(px.x, 0);
        assert_eq!(px.width, 300);
        assert_eq!(px.height, 150);
    }

    #[test]
    fn test_region_to_pixels_never_empty() {
        let region = Rectangle {
            x1: 612.0,
            y1: 0.0,
            x2: 612.0,
            y2: 0.0,
        };
        let px = region_to_pixels(&region, 792.0, 2550, 3300);
        assert!(px.width >= 1);
        assert!(px.height >= 1);
        assert!(px.x + px.width <= 2550);
        assert!(px.y + px.height <= 3300);
    }

    #[test]
    fn test_encode_jpeg_round_trips_dimensions() {
        let image = RgbImage::from_pixel(64, 48, image::Rgb([200, 10, 10]));
        let jpeg = encode_jpeg(&image).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );
    }
}
