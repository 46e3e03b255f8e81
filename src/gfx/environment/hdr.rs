//! Decoded Radiance HDR panoramas

use image::ImageFormat;

use crate::error::EnvironmentError;

/// Linear RGBA float image in row-major order, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl HdrImage {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Result<Self, EnvironmentError> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(EnvironmentError::Empty);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decodes a Radiance `.hdr` file held in memory
    pub fn decode(bytes: &[u8]) -> Result<Self, EnvironmentError> {
        if bytes.is_empty() {
            return Err(EnvironmentError::Empty);
        }

        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Hdr)?.into_rgba32f();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .into_raw()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], 1.0])
            .collect();

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    /// Raw texel bytes for an `Rgba32Float` upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Halves the image with a 2x2 box filter until both sides fit in `max_size`
    pub fn fit_within(mut self, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        while self.width > max_size || self.height > max_size {
            self = self.downsample();
        }
        self
    }

    /// 2x2 box filter; odd edges keep their last texel in a narrower block
    fn downsample(&self) -> Self {
        let width = self.width.div_ceil(2);
        let height = self.height.div_ceil(2);
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));

        for y in 0..height {
            for x in 0..width {
                let xs = (x * 2)..(x * 2 + 2).min(self.width);
                let ys = (y * 2)..(y * 2 + 2).min(self.height);
                let count = (xs.len() * ys.len()) as f32;

                let mut sum = [0.0f32; 4];
                for sy in ys {
                    for sx in xs.clone() {
                        let p = self.pixels[(sy as usize) * (self.width as usize) + sx as usize];
                        for c in 0..4 {
                            sum[c] += p[c];
                        }
                    }
                }
                pixels.push(sum.map(|v| v / count));
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::encode_hdr;
    use approx::assert_relative_eq;

    #[test]
    fn test_decode_encoded_panorama() {
        let bytes = encode_hdr(4, 2, |x, y| [x as f32, y as f32 * 0.5, 2.0]);
        let image = HdrImage::decode(&bytes).unwrap();

        assert_eq!((image.width(), image.height()), (4, 2));
        let p = image.pixel(3, 1).unwrap();
        // RGBE keeps roughly 8 bits of mantissa
        assert_relative_eq!(p[0], 3.0, epsilon = 0.05);
        assert_relative_eq!(p[1], 0.5, epsilon = 0.05);
        assert_relative_eq!(p[2], 2.0, epsilon = 0.05);
        assert_eq!(p[3], 1.0);
        assert_eq!(image.as_bytes().len(), 4 * 2 * 16);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = HdrImage::decode(b"definitely not a radiance file");
        assert!(matches!(result, Err(EnvironmentError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_empty_input() {
        assert!(matches!(HdrImage::decode(&[]), Err(EnvironmentError::Empty)));
    }

    #[test]
    fn test_new_checks_pixel_count() {
        assert!(HdrImage::new(2, 2, vec![[0.0; 4]; 3]).is_err());
        assert!(HdrImage::new(0, 2, Vec::new()).is_err());
        assert!(HdrImage::new(2, 1, vec![[0.0; 4]; 2]).is_ok());
    }

    #[test]
    fn test_fit_within_halves_and_averages() {
        let pixels = vec![
            [1.0, 0.0, 0.0, 1.0],
            [3.0, 0.0, 0.0, 1.0],
            [5.0, 0.0, 0.0, 1.0],
            [7.0, 0.0, 0.0, 1.0],
        ];
        let image = HdrImage::new(4, 1, pixels).unwrap().fit_within(2);

        assert_eq!((image.width(), image.height()), (2, 1));
        assert_relative_eq!(image.pixel(0, 0).unwrap()[0], 2.0);
        assert_relative_eq!(image.pixel(1, 0).unwrap()[0], 6.0);
    }

    #[test]
    fn test_fit_within_keeps_odd_edges() {
        let pixels = (0..10).map(|i| [i as f32, 0.0, 0.0, 1.0]).collect();
        // 5x2: columns 0..4, rows 0 and 1
        let image = HdrImage::new(5, 2, pixels).unwrap().fit_within(3);

        assert_eq!((image.width(), image.height()), (3, 1));
        assert_relative_eq!(image.pixel(0, 0).unwrap()[0], (0.0 + 1.0 + 5.0 + 6.0) / 4.0);
        assert_relative_eq!(image.pixel(1, 0).unwrap()[0], (2.0 + 3.0 + 7.0 + 8.0) / 4.0);
        // The trailing column is averaged on its own, not dropped
        assert_relative_eq!(image.pixel(2, 0).unwrap()[0], (4.0 + 9.0) / 2.0);
    }

    #[test]
    fn test_fit_within_leaves_small_images_alone() {
        let image = HdrImage::new(8, 4, vec![[0.5; 4]; 32]).unwrap();
        let fitted = image.clone().fit_within(8);
        assert_eq!(fitted, image);

        let tiny = image.fit_within(2);
        assert_eq!((tiny.width(), tiny.height()), (2, 1));
    }
}
