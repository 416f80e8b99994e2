//! Pixel classifiers: stateless presence/absence predicates over crops.
//!
//! Two primitives cover every visual feature on the table. Counting pixels
//! inside an inclusive RGB band handles colored text and card backs; a
//! white-contour area check handles face-up cards. Both are calibration
//! driven — the bands and minimums live in the layout profile, not here.

use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::{ThresholdType, threshold};
use layout::{BandSpec, OutlineSpec};

use crate::image::Image;

/// A presence detector over a cropped region.
pub trait Detect {
    fn detect(&self, crop: Image<'_>) -> bool;
}

/// Fires when more than `min_pixels` pixels of the crop fall inside the band.
#[derive(Debug, Clone, Copy)]
pub struct BandDetector {
    spec: BandSpec,
}

impl BandDetector {
    pub fn new(spec: BandSpec) -> Self {
        Self { spec }
    }

    /// Number of crop pixels inside the band.
    pub fn matching_pixels(&self, crop: Image<'_>) -> u32 {
        let mut count = 0u32;
        for y in 0..crop.height() {
            for x in 0..crop.width() {
                let c = crop.at(x, y);
                if self.spec.band.contains(c.r, c.g, c.b) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl Detect for BandDetector {
    fn detect(&self, crop: Image<'_>) -> bool {
        self.matching_pixels(crop) > self.spec.min_pixels
    }
}

/// Fires when the crop contains a bright outline enclosing more than
/// `min_area` square pixels — the white face of a dealt card.
#[derive(Debug, Clone, Copy)]
pub struct OutlineDetector {
    spec: OutlineSpec,
}

impl OutlineDetector {
    pub fn new(spec: OutlineSpec) -> Self {
        Self { spec }
    }

    /// Area of the largest external bright contour in the crop.
    pub fn largest_area(&self, crop: Image<'_>) -> f64 {
        let gray = crop.to_owned_image().to_gray_image();
        let bin = threshold(&gray, self.spec.intensity, ThresholdType::Binary);

        let mut largest = 0.0f64;
        for contour in find_contours::<i64>(&bin) {
            if contour.border_type != BorderType::Outer {
                continue;
            }
            largest = largest.max(polygon_area(&contour.points));
        }
        largest
    }
}

impl Detect for OutlineDetector {
    fn detect(&self, crop: Image<'_>) -> bool {
        self.largest_area(crop) > self.spec.min_area
    }
}

/// Shoelace area of a closed contour polygon.
fn polygon_area(points: &[imageproc::point::Point<i64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut doubled = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        doubled += p.x * q.y - q.x * p.y;
    }
    doubled.unsigned_abs() as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use layout::{ColorBand, LayoutProfile, Rect};

    use super::*;
    use crate::image::{Color, OwnedImage};

    fn paint(img: &mut OwnedImage, region: Rect, color: Color) {
        for y in region.top..region.top + region.height {
            for x in region.left..region.left + region.width {
                img.set(x, y, color);
            }
        }
    }

    #[test]
    fn band_detector_counts_only_in_band_pixels() {
        let spec = BandSpec {
            band: ColorBand::new([200, 255], [150, 197], [0, 90]),
            min_pixels: 30,
        };
        let det = BandDetector::new(spec);

        let mut img = OwnedImage::filled(40, 10, Color::new(30, 30, 30));
        paint(&mut img, Rect::new(0, 0, 10, 3), Color::new(230, 170, 20));
        assert_eq!(det.matching_pixels(img.as_image()), 30);
        // 30 is not strictly greater than the minimum.
        assert!(!det.detect(img.as_image()));

        paint(&mut img, Rect::new(0, 3, 10, 4), Color::new(230, 170, 20));
        assert!(det.detect(img.as_image()));
    }

    #[test]
    fn outline_detector_needs_a_big_enough_blob() {
        let spec = LayoutProfile::default().card_outline;
        let det = OutlineDetector::new(spec);

        let mut img = OwnedImage::filled(60, 60, Color::new(20, 80, 20));
        paint(&mut img, Rect::new(5, 5, 10, 10), Color::WHITE);
        assert!(!det.detect(img.as_image()));

        paint(&mut img, Rect::new(20, 10, 30, 40), Color::WHITE);
        assert!(det.detect(img.as_image()));
    }

    #[test]
    fn outline_detector_ignores_dim_blobs() {
        let spec = LayoutProfile::default().card_outline;
        let det = OutlineDetector::new(spec);

        // Large but below the binarization intensity.
        let mut img = OwnedImage::filled(60, 60, Color::new(20, 80, 20));
        paint(&mut img, Rect::new(10, 10, 40, 40), Color::new(200, 200, 200));
        assert!(!det.detect(img.as_image()));
    }

    #[test]
    fn shoelace_area_of_a_rectangle() {
        use imageproc::point::Point;
        let rect = [
            Point::new(0i64, 0),
            Point::new(10, 0),
            Point::new(10, 6),
            Point::new(0, 6),
        ];
        assert_eq!(polygon_area(&rect), 60.0);
    }
}
