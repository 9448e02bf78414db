//! Text crop heuristic: union of text block bounds.
//!
//! Tokopedia labels embed the receipt as real text objects, so the printed
//! area is simply the min/max union of every text block rectangle on the
//! page, padded and clamped to the page rect.

use pdfium_render::prelude::*;
use tracing::debug;

use super::geometry::Rectangle;
use crate::error::CropError;

/// Padding in PDF points applied around the text block union
pub const TEXT_PADDING_PTS: f64 = 5.0;

/// Union of all text block bounding boxes on the page, in PDF points.
///
/// Returns `None` when the page has no text blocks (image-only labels),
/// which sends the caller to the raster contour fallback.
pub fn detect_text_region(page: &PdfPage) -> Result<Option<Rectangle>, CropError> {
    let text_page = page.text().map_err(|e| CropError::PageRender {
        source: Box::new(std::io::Error::other(format!(
            "Failed to read page text: {e:?}"
        ))),
    })?;

    let mut union: Option<Rectangle> = None;
    let mut block_count = 0usize;

    for segment in text_page.segments().iter() {
        if segment.text().trim().is_empty() {
            continue;
        }

        let bounds = segment.bounds();
        let block = Rectangle {
            x1: bounds.left().value as f64,
            y1: bounds.bottom().value as f64,
            x2: bounds.right().value as f64,
            y2: bounds.top().value as f64,
        };

        block_count += 1;
        union = Some(match union {
            Some(current) => current.union(&block),
            None => block,
        });
    }

    let Some(union) = union else {
        debug!("Page has no text blocks");
        return Ok(None);
    };

    let page_rect = Rectangle {
        x1: 0.0,
        y1: 0.0,
        x2: page.width().value as f64,
        y2: page.height().value as f64,
    };
    let region = union.expand(TEXT_PADDING_PTS).clamp_to(&page_rect);

    debug!(
        blocks = block_count,
        region = format!(
            "({:.1},{:.1})-({:.1},{:.1})",
            region.x1, region.y1, region.x2, region.y2
        ),
        "Detected text block region"
    );

    Ok(Some(region))
}
