//! Shipping label cropping.
//!
//! Converts the first page of a label PDF into a JPEG cropped to the
//! printed content area. Two hardcoded heuristics cover the label formats
//! seen in the wild:
//! - text block union (Tokopedia receipts with extractable text)
//! - largest external contour of the thresholded render (Shopee labels
//!   flattened to a page-sized image)
//!
//! The text heuristic is tried first; an image-only page falls back to the
//! contour pass. Both heuristics are deterministic for fixed input bytes.

pub mod contour;
pub mod geometry;
pub mod render;
pub mod text_blocks;

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::error::CropError;

/// Which heuristic produced the crop box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHeuristic {
    TextBlocks,
    Contour,
}

impl CropHeuristic {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropHeuristic::TextBlocks => "text_blocks",
            CropHeuristic::Contour => "contour",
        }
    }
}

/// A cropped label ready for delivery
pub struct CroppedLabel {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub heuristic: CropHeuristic,
}

/// Create a new Pdfium instance (dynamically linked).
///
/// Searches for libpdfium in:
/// 1. Current directory (./libpdfium.so)
/// 2. vendor/pdfium/lib/
/// 3. System library paths
pub fn create_pdfium() -> Result<Pdfium, CropError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| CropError::PdfiumLoad {
            source: Box::new(std::io::Error::other(format!(
                "Failed to load PDFium library; install libpdfium or place it next to the binary: {e:?}"
            ))),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Crop the label on the first page of the PDF at `path` to a JPEG.
pub fn crop_label(pdfium: &Pdfium, path: &Path) -> Result<CroppedLabel, CropError> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| CropError::PdfLoad {
            source: Box::new(std::io::Error::other(format!(
                "Failed to load PDF: {e:?}"
            ))),
        })?;

    if document.pages().len() == 0 {
        return Err(CropError::EmptyDocument);
    }

    let page = document.pages().get(0).map_err(|e| CropError::PdfLoad {
        source: Box::new(std::io::Error::other(format!(
            "Failed to get first page: {e:?}"
        ))),
    })?;
    let page_height_pts = page.height().value as f64;

    // Always render the full page once; both heuristics crop out of the
    // same bitmap.
    let full_page = render_full_page_checked(&page)?;

    let (crop_box, heuristic) = match text_blocks::detect_text_region(&page)? {
        Some(region) => {
            let crop = render::region_to_pixels(
                &region,
                page_height_pts,
                full_page.width(),
                full_page.height(),
            );
            (crop, CropHeuristic::TextBlocks)
        }
        None => {
            debug!("No text blocks, falling back to contour detection");
            let crop =
                contour::detect_label_box(&full_page).ok_or(CropError::NoContentDetected)?;
            (crop, CropHeuristic::Contour)
        }
    };

    let cropped = render::crop_to_box(&full_page, &crop_box);
    let jpeg = render::encode_jpeg(&cropped)?;

    info!(
        heuristic = heuristic.as_str(),
        crop = format!(
            "{}x{}+{}+{}",
            crop_box.width, crop_box.height, crop_box.x, crop_box.y
        ),
        jpeg_bytes = jpeg.len(),
        "Label cropped"
    );

    Ok(CroppedLabel {
        width: cropped.width(),
        height: cropped.height(),
        jpeg,
        heuristic,
    })
}

fn render_full_page_checked(page: &PdfPage) -> Result<image::RgbImage, CropError> {
    let image = render::render_full_page(page)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(CropError::PageRender {
            source: Box::new(std::io::Error::other("Rendered page is empty")),
        });
    }
    Ok(image)
}
