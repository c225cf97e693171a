// MIT/Apache2 License

use image::{ColorType, DynamicImage};
use shutter_geometry::{Point2D, RasterGeometry, Vector2D};
use std::sync::Arc;

/// A decoded image, as it is passed between the operations of a display pipeline.
///
/// The pixel data lives behind a shared pointer, so handing the same image to several consumers is cheap. An
/// operation never writes into the pixels of a `RenderedImage` it was given; it derives a new one instead.
///
/// Besides its pixels, a rendered image knows where it sits in image space: the coordinates of its top left
/// pixel, and the offset of the tile grid it was decoded on. Both are carried through every operation
/// unchanged.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    raster: Arc<DynamicImage>,
    origin: Point2D<i32>,
    tile_grid_offset: Vector2D<i32>,
}

impl RenderedImage {
    /// Wrap decoded pixels, placed at the image space origin.
    #[inline]
    pub fn new(raster: DynamicImage) -> RenderedImage {
        RenderedImage {
            raster: Arc::new(raster),
            origin: Point2D::new(0, 0),
            tile_grid_offset: Vector2D::new(0, 0),
        }
    }

    #[inline]
    pub fn with_origin(self, x: i32, y: i32) -> RenderedImage {
        RenderedImage {
            origin: Point2D::new(x, y),
            ..self
        }
    }

    #[inline]
    pub fn with_tile_grid_offset(self, x: i32, y: i32) -> RenderedImage {
        RenderedImage {
            tile_grid_offset: Vector2D::new(x, y),
            ..self
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    #[inline]
    pub fn origin(&self) -> Point2D<i32> {
        self.origin
    }

    #[inline]
    pub fn tile_grid_offset(&self) -> Vector2D<i32> {
        self.tile_grid_offset
    }

    /// The size and placement of this image in image space.
    #[inline]
    pub fn geometry(&self) -> RasterGeometry {
        RasterGeometry::new(self.width(), self.height())
            .with_origin(self.origin.x, self.origin.y)
            .with_tile_grid_offset(self.tile_grid_offset.x, self.tile_grid_offset.y)
    }

    /// The decoded pixels.
    #[inline]
    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    #[inline]
    pub fn color(&self) -> ColorType {
        self.raster.color()
    }

    /// Create an image with new pixels, placed the same way as this one.
    #[inline]
    pub fn derive(&self, raster: DynamicImage) -> RenderedImage {
        RenderedImage {
            raster: Arc::new(raster),
            origin: self.origin,
            tile_grid_offset: self.tile_grid_offset,
        }
    }

    /// Do both images share the same pixel storage?
    #[inline]
    pub fn same_raster(&self, other: &RenderedImage) -> bool {
        Arc::ptr_eq(&self.raster, &other.raster)
    }
}

impl From<DynamicImage> for RenderedImage {
    #[inline]
    fn from(raster: DynamicImage) -> RenderedImage {
        RenderedImage::new(raster)
    }
}

impl PartialEq for RenderedImage {
    fn eq(&self, other: &RenderedImage) -> bool {
        self.origin == other.origin
            && self.tile_grid_offset == other.tile_grid_offset
            && (self.same_raster(other) || *self.raster == *other.raster)
    }
}
