//! Image primitives.
//!
//! The extractor crops dozens of fixed rectangles out of every screenshot,
//! so the workhorse here is a borrowed view (`Image<'a>`) into an owned RGB
//! buffer (`OwnedImage`): cropping is pointer math, and pixels are copied
//! only where a stage genuinely needs its own buffer (glyph preprocessing,
//! OCR upscaling).

use anyhow::{Context, Result};
use layout::Rect;

/// Owned RGB image (no alpha).
#[derive(Clone, Debug)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl OwnedImage {
    /// Build from tightly packed RGBA bytes (alpha is discarded).
    pub fn from_rgba(width: usize, bytes: &[u8]) -> Self {
        let height = bytes.len() / width / 4;
        let data = bytes
            .chunks_exact(4)
            .map(|v| Color::new(v[0], v[1], v[2]))
            .collect::<Vec<_>>();

        Self {
            width: width as u32,
            height: height as u32,
            data,
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) into an RGB buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("decode image")?.to_rgb8();
        let (width, height) = img.dimensions();
        let data = img.pixels().map(|p| Color::new(p.0[0], p.0[1], p.0[2])).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a solid-color canvas. Handy for composing synthetic frames.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            data: vec![color; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.data[(x + y * self.width) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.data[(x + y * self.width) as usize] = color;
    }

    /// Create a borrowed view of the entire image.
    pub fn as_image<'a>(&'a self) -> Image<'a> {
        Image {
            x1: 0,
            y1: 0,
            x2: self.width,
            y2: self.height,
            true_width: self.width,
            data: &self.data,
        }
    }

    /// Convert to a grayscale `GrayImage` (luma).
    pub fn to_gray_image(&self) -> image::GrayImage {
        use image::{GrayImage, Luma};
        let mut out = GrayImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.put_pixel(x, y, Luma([self.get(x, y).luma()]));
            }
        }
        out
    }

    fn rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for c in &self.data {
            bytes.extend_from_slice(&[c.r, c.g, c.b]);
        }
        bytes
    }

    /// Resize to the given height, preserving aspect ratio.
    ///
    /// Uses `fast_image_resize`; OCR engines do much better on glyphs a few
    /// dozen pixels tall than on the raw crops.
    pub fn resized_h(&self, height: u32) -> Self {
        if self.height == height {
            return self.clone();
        }

        let height = height.max(1);
        let width = ((self.width as u64 * height as u64) / self.height.max(1) as u64).max(1) as u32;

        let src = fast_image_resize::images::Image::from_vec_u8(
            self.width,
            self.height,
            self.rgb_bytes(),
            fast_image_resize::PixelType::U8x3,
        )
        .expect("fast_image_resize: source image construction failed");

        let mut dst =
            fast_image_resize::images::Image::new(width, height, fast_image_resize::PixelType::U8x3);

        let options = fast_image_resize::ResizeOptions::new().resize_alg(
            fast_image_resize::ResizeAlg::Interpolation(fast_image_resize::FilterType::CatmullRom),
        );
        fast_image_resize::Resizer::new()
            .resize(&src, &mut dst, &Some(options))
            .expect("fast_image_resize: resize failed");

        let data = dst
            .into_vec()
            .chunks_exact(3)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();

        Self {
            width,
            height,
            data,
        }
    }
}

// ----------

/// Borrowed rectangular view into an `OwnedImage`.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    true_width: u32,
    data: &'a [Color],
}

impl<'a> Image<'a> {
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Pixel at view-relative coordinates.
    #[inline(always)]
    pub fn at(&self, x: u32, y: u32) -> Color {
        self.data[(self.x1 + x + (self.y1 + y) * self.true_width) as usize]
    }

    /// Sub-view at view-relative coordinates, clamped to the view bounds.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);

        Self {
            x1: self.x1 + x,
            y1: self.y1 + y,
            x2: self.x1 + x + width,
            y2: self.y1 + y + height,
            true_width: self.true_width,
            data: self.data,
        }
    }

    /// Crop a calibration rectangle out of this view.
    pub fn crop(&self, region: Rect) -> Self {
        self.sub_image(region.left, region.top, region.width, region.height)
    }

    pub fn to_owned_image(self) -> OwnedImage {
        let mut data = Vec::with_capacity((self.width() * self.height()) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                data.push(self.at(x, y));
            }
        }

        OwnedImage {
            width: self.width(),
            height: self.height(),
            data,
        }
    }

    /// Tightly packed RGB bytes of the view.
    pub fn get_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; (self.width() * self.height() * 3) as usize];
        let mut i = 0;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let clr = self.at(x, y);
                bytes[i] = clr.r;
                bytes[i + 1] = clr.g;
                bytes[i + 2] = clr.b;
                i += 3;
            }
        }
        bytes
    }
}

// ----------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Compute luma (grayscale intensity).
    pub fn luma(&self) -> u8 {
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        ((299 * r + 587 * g + 114 * b) / 1000) as u8
    }

    /// Sum of the three channels. Glyph ink thresholds compare against this
    /// collapsed intensity, not the luma.
    #[inline]
    pub const fn channel_sum(&self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_is_view_relative() {
        let mut img = OwnedImage::filled(10, 10, Color::BLACK);
        img.set(3, 4, Color::WHITE);

        let view = img.as_image().crop(Rect::new(2, 2, 4, 4));
        assert_eq!(view.width(), 4);
        assert_eq!(view.height(), 4);
        assert_eq!(view.at(1, 2), Color::WHITE);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let img = OwnedImage::filled(10, 10, Color::BLACK);
        let view = img.as_image().crop(Rect::new(8, 8, 5, 5));
        assert_eq!(view.width(), 2);
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn nested_crops_compose() {
        let mut img = OwnedImage::filled(8, 8, Color::BLACK);
        img.set(5, 5, Color::WHITE);

        let outer = img.as_image().crop(Rect::new(2, 2, 6, 6));
        let inner = outer.sub_image(2, 2, 2, 2);
        assert_eq!(inner.at(1, 1), Color::WHITE);
    }

    #[test]
    fn channel_sum_saturates_nowhere() {
        assert_eq!(Color::WHITE.channel_sum(), 765);
        assert_eq!(Color::BLACK.channel_sum(), 0);
        assert_eq!(Color::new(200, 41, 0).channel_sum(), 241);
    }
}
