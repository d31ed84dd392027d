use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;

use crate::Color;

/// A rendered image. Pixels are linear colors, stored row-major starting at the top left.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    pub width: usize,
    pub height: usize,
    /// Flat buffer of pixels with length of `width * height`
    pub buffer: Box<[Color]>,
}
impl Screen {
    /// An all-black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![Color::BLACK; width * height].into(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Color {
        self.buffer[row * self.width + col]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<Color> {
        self.buffer.chunks_exact(self.width)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<Color> {
        self.buffer.chunks_exact_mut(self.width)
    }

    /// Applies gamma correction to every pixel.
    pub fn gamma_correct(&mut self, gamma: f64) {
        for pixel in self.buffer.iter_mut() {
            *pixel = pixel.gamma_corrected(gamma);
        }
    }

    /// Quantizes to 8 bits per channel. Channels outside `0.0..=1.0` (including NANs) are
    /// clamped.
    pub fn encode(&self) -> RgbImage {
        let quantize = |c: f64| {
            let c = if c.is_nan() { 0. } else { c.max(0.).min(1.) };
            (255.99 * c) as u8
        };
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.get(y as usize, x as usize);
            image::Rgb([quantize(p.r), quantize(p.g), quantize(p.b)])
        })
    }

    /// Writes the image as a PNG. Gamma correction must already have been applied.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.encode()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Couldn't write image to {}", path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_black() {
        let screen = Screen::new(3, 2);
        assert_eq!(screen.buffer.len(), 6);
        assert_eq!(screen.rows().count(), 2);
        assert!(screen.buffer.iter().all(|&p| p == Color::BLACK));
    }

    #[test]
    fn row_major() {
        let mut screen = Screen::new(3, 2);
        screen.rows_mut().nth(1).unwrap()[2] = Color::WHITE;
        assert_eq!(screen.get(1, 2), Color::WHITE);
        assert_eq!(screen.buffer[5], Color::WHITE);
    }

    #[test]
    fn encode_clamps() {
        let mut screen = Screen::new(2, 1);
        screen.buffer[0] = Color::new(1., 0.5, 0.);
        screen.buffer[1] = Color::new(2., -1., f64::NAN);
        let encoded = screen.encode();
        assert_eq!(encoded.dimensions(), (2, 1));
        assert_eq!(encoded.get_pixel(0, 0).0, [255, 127, 0]);
        assert_eq!(encoded.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn gamma_pass() {
        let mut screen = Screen::new(1, 1);
        screen.buffer[0] = Color::new(0.25, 1., 0.);
        screen.gamma_correct(2.);
        assert_eq!(screen.get(0, 0), Color::new(0.5, 1., 0.));
    }

    #[test]
    fn writes_png() {
        let path = std::env::temp_dir().join(format!("pathtracing-{}.png", std::process::id()));
        let mut screen = Screen::new(4, 3);
        screen.buffer[0] = Color::SKY;
        screen.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(0, 0).0, [127, 179, 255]);
        assert_eq!(decoded.get_pixel(3, 2).0, [0, 0, 0]);
    }
}
