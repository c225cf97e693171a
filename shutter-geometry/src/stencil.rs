// MIT/Apache2 License

use crate::RasterGeometry;

/// A one-bit-per-pixel raster, used to pick between two image layers.
///
/// Rows are packed most significant bit first, and each row starts on a byte boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    geometry: RasterGeometry,
    stride: usize,
    bits: Vec<u8>,
}

impl Stencil {
    /// Create a new stencil with every pixel clear.
    #[must_use]
    pub fn new(geometry: RasterGeometry) -> Stencil {
        let stride = (geometry.width as usize + 7) / 8;
        Stencil {
            geometry,
            stride,
            bits: vec![0; stride * geometry.height as usize],
        }
    }

    /// The geometry of the raster this stencil was made for.
    #[must_use]
    #[inline]
    pub fn geometry(&self) -> RasterGeometry {
        self.geometry
    }

    #[must_use]
    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    #[must_use]
    #[inline]
    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    /// The number of bytes in each packed row.
    #[must_use]
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The packed bits of a row.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not less than the height.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.bits[start..start + self.stride]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x < self.geometry.width && y < self.geometry.height {
            let byte = y as usize * self.stride + x as usize / 8;
            Some((byte, 0x80 >> (x % 8)))
        } else {
            None
        }
    }

    /// Is the pixel at (`x`, `y`) set? Pixels outside of the stencil are never set.
    #[must_use]
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y)
            .map_or(false, |(byte, mask)| self.bits[byte] & mask != 0)
    }

    /// Set or clear the pixel at (`x`, `y`). Pixels outside of the stencil are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if let Some((byte, mask)) = self.index(x, y) {
            if value {
                self.bits[byte] |= mask;
            } else {
                self.bits[byte] &= !mask;
            }
        }
    }

    /// The number of set pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        // padding bits at the end of each row are never set
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Are all pixels clear?
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.bits.iter().all(|byte| *byte == 0)
    }

    /// Iterate over the coordinates of every set pixel, row by row.
    pub fn iter_set(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.geometry.height).flat_map(move |y| {
            (0..self.geometry.width)
                .filter(move |x| self.get(*x, y))
                .map(move |x| (x, y))
        })
    }
}
