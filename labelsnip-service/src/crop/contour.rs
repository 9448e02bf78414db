//! Raster crop heuristic: threshold the rendered page and find the largest
//! external contour.
//!
//! This is the fallback for labels delivered as a flattened image on an
//! otherwise blank page (common for Shopee exports), where the page carries
//! no extractable text geometry.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;
use tracing::debug;

use super::geometry::PixelBox;

/// Gray values above this are treated as blank page background
pub const BACKGROUND_THRESHOLD: u8 = 240;

/// Padding in pixels applied around the detected label box
pub const CONTOUR_PADDING_PX: u32 = 10;

/// Inverse binary threshold: background (gray > 240) to 0, content to 255.
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel[0] > BACKGROUND_THRESHOLD {
            0u8
        } else {
            255u8
        };
        mask.put_pixel(x, y, Luma([value]));
    }
    mask
}

/// Find the label as the bounding box of the largest-area external contour
/// of the thresholded page, padded by [`CONTOUR_PADDING_PX`] and clamped to
/// the bitmap.
///
/// Returns `None` when the page is blank (no foreground contours).
pub fn detect_label_box(page: &RgbImage) -> Option<PixelBox> {
    let gray = image::imageops::grayscale(page);
    let mask = binarize(&gray);

    let contours = find_contours::<u32>(&mask);

    // Only outer borders; holes inside the label (barcode gaps, table cells)
    // must not compete with the label outline.
    let largest = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && !c.points.is_empty())
        .max_by(|a, b| {
            contour_area(a)
                .partial_cmp(&contour_area(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let bounding = bounding_box(&largest.points);
    let padded = bounding.pad_and_clamp(CONTOUR_PADDING_PX, page.width(), page.height());

    debug!(
        contours = contours.len(),
        label_box = format!(
            "{}x{}+{}+{}",
            padded.width, padded.height, padded.x, padded.y
        ),
        "Detected label contour"
    );

    Some(padded)
}

/// Polygon area of a contour by the shoelace formula.
fn contour_area(contour: &Contour<u32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }

    let mut doubled = 0i64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    doubled.abs() as f64 / 2.0
}

/// Axis-aligned bounding box of a non-empty point set.
fn bounding_box(points: &[Point<u32>]) -> PixelBox {
    let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);

    PixelBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn blank_page(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                image.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn test_binarize_threshold_boundary() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, Luma([240])); // content: not above threshold
        gray.put_pixel(1, 0, Luma([241])); // background
        gray.put_pixel(2, 0, Luma([0])); // content

        let mask = binarize(&gray);
        assert_eq!(mask.get_pixel(0, 0)[0], 255);
        assert_eq!(mask.get_pixel(1, 0)[0], 0);
        assert_eq!(mask.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_blank_page_has_no_label() {
        let page = blank_page(200, 200);
        assert_eq!(detect_label_box(&page), None);
    }

    #[test]
    fn test_single_block_found_with_padding() {
        let mut page = blank_page(400, 400);
        fill_rect(&mut page, 100, 120, 150, 100, Rgb([0, 0, 0]));

        let label = detect_label_box(&page).unwrap();
        assert_eq!(label.x, 90);
        assert_eq!(label.y, 110);
        assert_eq!(label.width, 170);
        assert_eq!(label.height, 120);
    }

    #[test]
    fn test_largest_of_two_blocks_wins() {
        let mut page = blank_page(400, 400);
        // Small stray mark (e.g. a page number)
        fill_rect(&mut page, 10, 10, 8, 8, Rgb([0, 0, 0]));
        // The label body
        fill_rect(&mut page, 150, 150, 120, 180, Rgb([30, 30, 30]));

        let label = detect_label_box(&page).unwrap();
        assert_eq!(label.x, 140);
        assert_eq!(label.y, 140);
        assert_eq!(label.width, 140);
        assert_eq!(label.height, 200);
    }

    #[test]
    fn test_padding_clamped_at_page_edge() {
        let mut page = blank_page(100, 100);
        fill_rect(&mut page, 0, 0, 30, 30, Rgb([0, 0, 0]));

        let label = detect_label_box(&page).unwrap();
        assert_eq!(label.x, 0);
        assert_eq!(label.y, 0);
        assert_eq!(label.width, 40);
        assert_eq!(label.height, 40);
    }

    #[test]
    fn test_hole_inside_label_does_not_shrink_box() {
        let mut page = blank_page(300, 300);
        fill_rect(&mut page, 50, 50, 200, 200, Rgb([0, 0, 0]));
        // White window inside the label (address box)
        fill_rect(&mut page, 100, 100, 80, 80, Rgb([255, 255, 255]));

        let label = detect_label_box(&page).unwrap();
        assert_eq!(label.x, 40);
        assert_eq!(label.y, 40);
        assert_eq!(label.width, 220);
        assert_eq!(label.height, 220);
    }
}
