// MIT/Apache2 License

use crate::{util::intersect_boxes, Box2D, Coverage, Point2D, Region, Span, Stencil, Vector2D};

/// The size and placement of a raster in image space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RasterGeometry {
    /// The number of columns.
    pub width: u32,
    /// The number of rows.
    pub height: u32,
    /// The image space coordinates of the top left pixel.
    pub origin: Point2D<i32>,
    /// The offset of the tile grid from the image space origin.
    pub tile_grid_offset: Vector2D<i32>,
}

impl RasterGeometry {
    /// Create a raster geometry with its origin at zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> RasterGeometry {
        RasterGeometry {
            width,
            height,
            origin: Point2D::new(0, 0),
            tile_grid_offset: Vector2D::new(0, 0),
        }
    }

    #[must_use]
    pub fn with_origin(self, x: i32, y: i32) -> RasterGeometry {
        RasterGeometry {
            origin: Point2D::new(x, y),
            ..self
        }
    }

    #[must_use]
    pub fn with_tile_grid_offset(self, x: i32, y: i32) -> RasterGeometry {
        RasterGeometry {
            tile_grid_offset: Vector2D::new(x, y),
            ..self
        }
    }

    /// Do both rasters cover the same pixels?
    #[must_use]
    pub fn same_frame(&self, other: &RasterGeometry) -> bool {
        self.width == other.width && self.height == other.height && self.origin == other.origin
    }

    /// The area of image space covered by this raster.
    #[must_use]
    pub fn frame(&self) -> Box2D<f32> {
        let min = Point2D::new(self.origin.x as f32, self.origin.y as f32);
        Box2D::new(
            min,
            Point2D::new(min.x + self.width as f32, min.y + self.height as f32),
        )
    }
}

/// Options for rendering regions into stencils.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RasterOptions {
    /// Compute partial coverage along the boundary of a region. If disabled, a pixel is set only if its center
    /// is inside of the region.
    pub antialias: bool,
    /// The number of scanlines sampled per pixel row when antialiasing.
    pub subsamples: u8,
    /// The coverage a pixel needs to be set in the stencil.
    pub threshold: Coverage,
    /// The flattening tolerance used when curves are turned into lines.
    pub tolerance: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            antialias: true,
            subsamples: 4,
            threshold: Coverage::saturating(0.5),
            tolerance: crate::Area::DEFAULT_TOLERANCE,
        }
    }
}

impl RasterOptions {
    #[inline]
    fn samples_per_row(&self) -> u32 {
        if self.antialias {
            u32::from(self.subsamples.max(1))
        } else {
            1
        }
    }
}

// absorbs the rounding error of summing fractional coverage
const COVERAGE_EPSILON: f32 = 1.0e-4;

/// Render a region into a one-bit stencil.
///
/// Coverage is accumulated per pixel from several scanlines per row, with exact horizontal coverage along
/// each scanline. The accumulated coverage is then quantized: pixels that reach the threshold are set.
pub fn rasterize<R: Region + ?Sized>(
    region: &R,
    geometry: RasterGeometry,
    options: &RasterOptions,
) -> Stencil {
    let mut stencil = Stencil::new(geometry);

    let bounds = match region
        .bounds()
        .and_then(|bounds| intersect_boxes(bounds, geometry.frame()))
    {
        Some(bounds) => bounds,
        None => return stencil,
    };

    let (ox, oy) = (geometry.origin.x as f32, geometry.origin.y as f32);
    let first_row = (bounds.min.y - oy).floor().max(0.0) as u32;
    let last_row = ((bounds.max.y - oy).ceil().max(0.0) as u32).min(geometry.height);

    let samples = options.samples_per_row();
    let weight = 1.0 / samples as f32;
    let threshold = options.threshold.into_inner();

    let mut coverage = vec![0.0_f32; geometry.width as usize];
    let mut spans: Vec<Span> = Vec::new();

    for row in first_row..last_row {
        coverage.iter_mut().for_each(|c| *c = 0.0);

        for sample in 0..samples {
            let y = oy + row as f32 + (sample as f32 + 0.5) * weight;
            spans.clear();
            region.spans(y, &mut spans);

            for span in &spans {
                let (start, end) = (span.start - ox, span.end - ox);
                if options.antialias {
                    accumulate(&mut coverage, start, end, weight);
                } else {
                    accumulate_centers(&mut coverage, start, end, weight);
                }
            }
        }

        for (column, value) in coverage.iter().enumerate() {
            if *value > 0.0 && *value + COVERAGE_EPSILON >= threshold {
                stencil.set(column as u32, row, true);
            }
        }
    }

    stencil
}

/// Add the exact horizontal coverage of `[start, end)` to each pixel.
fn accumulate(coverage: &mut [f32], start: f32, end: f32, weight: f32) {
    let start = start.max(0.0);
    let end = end.min(coverage.len() as f32);
    if !(start < end) {
        return;
    }

    let first = start.floor() as usize;
    let last = (end.ceil() as usize).min(coverage.len());
    for (index, value) in coverage.iter_mut().enumerate().take(last).skip(first) {
        let lo = start.max(index as f32);
        let hi = end.min(index as f32 + 1.0);
        if hi > lo {
            *value += (hi - lo) * weight;
        }
    }
}

/// Add full coverage to each pixel whose center lies inside of `[start, end)`.
fn accumulate_centers(coverage: &mut [f32], start: f32, end: f32, weight: f32) {
    let first = (start - 0.5).ceil().max(0.0) as usize;
    for (index, value) in coverage.iter_mut().enumerate().skip(first) {
        let center = index as f32 + 0.5;
        if center >= end {
            break;
        }
        if center >= start {
            *value += weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Area, Ellipse, FillRule, Polygon, RegionExt};

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Box2D<f32> {
        Box2D::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    #[test]
    fn square_at_origin() {
        let stencil = rect(0.0, 0.0, 10.0, 10.0).rasterize(RasterGeometry::new(100, 100), &RasterOptions::default());
        assert_eq!(stencil.count(), 100);
        assert!(stencil.get(0, 0));
        assert!(stencil.get(9, 9));
        assert!(!stencil.get(10, 9));
        assert!(!stencil.get(9, 10));
    }

    #[test]
    fn clipped_to_the_raster() {
        let stencil = rect(-50.0, -50.0, 5.0, 500.0).rasterize(RasterGeometry::new(20, 20), &RasterOptions::default());
        assert_eq!(stencil.count(), 5 * 20);
    }

    #[test]
    fn follows_the_origin() {
        let geometry = RasterGeometry::new(10, 10).with_origin(100, 200);
        let stencil = rect(100.0, 200.0, 102.0, 201.0).rasterize(geometry, &RasterOptions::default());
        assert_eq!(stencil.iter_set().collect::<Vec<_>>(), vec![(0, 0), (1, 0)]);
        assert_eq!(stencil.geometry(), geometry);
    }

    #[test]
    fn half_covered_pixels() {
        // the right edge cuts every pixel of column 4 in half; the top edge cuts row 2 at three quarters
        let region = rect(0.0, 2.25, 4.5, 6.0);
        let stencil = region.rasterize(RasterGeometry::new(8, 8), &RasterOptions::default());
        assert!(stencil.get(4, 3));
        assert!(stencil.get(3, 2));
        assert!(!stencil.get(5, 3));

        let strict = RasterOptions {
            threshold: Coverage::saturating(0.9),
            ..RasterOptions::default()
        };
        let stencil = region.rasterize(RasterGeometry::new(8, 8), &strict);
        assert!(!stencil.get(4, 3));
        assert!(!stencil.get(3, 2));
        assert!(stencil.get(3, 3));
    }

    #[test]
    fn aliased_sampling() {
        let options = RasterOptions {
            antialias: false,
            ..RasterOptions::default()
        };
        let stencil = rect(0.4, 0.0, 2.6, 1.0).rasterize(RasterGeometry::new(4, 1), &options);
        assert_eq!(stencil.iter_set().collect::<Vec<_>>(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn circle_is_symmetric() {
        let circle = Ellipse::circle(Point2D::new(16.0, 16.0), 10.0);
        let stencil = circle.rasterize(RasterGeometry::new(32, 32), &RasterOptions::default());

        for (x, y) in stencil.iter_set() {
            assert!(stencil.get(31 - x, y));
            assert!(stencil.get(x, 31 - y));
        }
        // roughly pi * r^2
        let count = stencil.count() as f32;
        assert!((count - 314.16).abs() < 12.0, "{}", count);
    }

    #[test]
    fn arbitrary_regions() {
        let triangle = Polygon::from_points(
            &[Point2D::new(0.0, 0.0), Point2D::new(8.0, 0.0), Point2D::new(0.0, 8.0)],
            FillRule::NonZero,
        );
        let stencil = triangle.rasterize(RasterGeometry::new(8, 8), &RasterOptions::default());
        assert!(stencil.get(0, 0));
        assert!(stencil.get(0, 7));
        assert!(!stencil.get(7, 7));
        // the diagonal pixels are half covered
        assert!(stencil.get(3, 4));

        let frame = rect(0.0, 0.0, 8.0, 8.0);
        let hole = Area::circle(Point2D::new(4.0, 4.0), 3.0);
        let stencil = frame.subtract(hole).rasterize(RasterGeometry::new(8, 8), &RasterOptions::default());
        assert!(stencil.get(0, 0));
        assert!(!stencil.get(4, 4));
    }

    #[test]
    fn empty_regions_leave_the_stencil_clear() {
        let geometry = RasterGeometry::new(16, 16);
        assert!(rect(5.0, 5.0, 5.0, 9.0).rasterize(geometry, &RasterOptions::default()).is_clear());
        assert!(rect(20.0, 20.0, 30.0, 30.0).rasterize(geometry, &RasterOptions::default()).is_clear());
        assert!(Area::from_points(&[]).rasterize(geometry, &RasterOptions::default()).is_clear());
    }
}
