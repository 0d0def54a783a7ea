use crate::error::{Result, SetVisionError};
use image::GrayImage;

/// Single-channel 8-bit raster stored row-major.
///
/// Used for grayscale images, {0,255} masks and the HSV planes alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Create a zero-filled raster
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create a raster with every sample set to `value`
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height {
            return Err(SetVisionError::SizeMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy into an `image` crate luma buffer (for `imageproc` calls)
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Luma([self.data[y as usize * self.width + x as usize]])
        })
    }

    /// Raster width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw samples, row-major
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw samples, row-major
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Sample at (x, y); out-of-bounds reads return 0
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    /// Set sample at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y * self.width + x] = value;
    }

    /// One row of samples
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Copy out the `w`x`h` window whose top-left corner is (x, y)
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Raster> {
        if x + w > self.width || y + h > self.height {
            return Err(SetVisionError::InputShape {
                detail: format!(
                    "crop {}x{} at ({}, {}) exceeds {}x{} raster",
                    w, h, x, y, self.width, self.height
                ),
            });
        }
        let mut data = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * self.width + x;
            data.extend_from_slice(&self.data[start..start + w]);
        }
        Ok(Raster {
            width: w,
            height: h,
            data,
        })
    }

    /// Photometric negative (`255 - v`)
    pub fn inverted(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| 255 - v).collect(),
        }
    }

    /// Number of non-zero samples
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut raster = Raster::new(4, 3);
        raster.set(2, 1, 200);
        assert_eq!(raster.get(2, 1), 200);
        assert_eq!(raster.get(1, 2), 0);
        assert_eq!(raster.row(1), &[0, 0, 200, 0]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut raster = Raster::new(4, 4);
        raster.set(10, 10, 255); // Should not panic
        assert_eq!(raster.get(10, 10), 0);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Raster::from_vec(3, 3, vec![0; 8]).unwrap_err();
        assert_eq!(
            err,
            SetVisionError::SizeMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_crop_and_invert() {
        let data: Vec<u8> = (0..16).collect();
        let raster = Raster::from_vec(4, 4, data).unwrap();
        let crop = raster.crop(1, 1, 2, 2).unwrap();
        assert_eq!(crop.as_slice(), &[5, 6, 9, 10]);
        assert_eq!(crop.inverted().as_slice(), &[250, 249, 246, 245]);
        assert!(raster.crop(3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_to_gray_image() {
        let mut raster = Raster::new(3, 2);
        raster.set(2, 1, 77);
        let image = raster.to_gray_image();
        assert_eq!(image.get_pixel(2, 1).0[0], 77);
        assert_eq!(image.dimensions(), (3, 2));
    }
}
