// MIT/Apache2 License

//! Contains the geometry used by the shutter operation. Regions are closed areas in image space that can be
//! tested for containment, cut into horizontal spans, and rasterized into one-bit [`Stencil`]s.
//!
//! Coordinates are 32-bit floats in pixel units. The pixel at column `x` and row `y` of a raster covers the
//! square from `(x, y)` to `(x + 1, y + 1)`, offset by the raster's origin.

#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions
)]

mod area;
pub use area::*;

mod coverage;
pub use coverage::*;

mod ellipse;
pub use ellipse::*;

mod polygon;
pub use polygon::*;

mod raster;
pub use raster::*;

mod region;
pub use region::*;

mod stencil;
pub use stencil::*;

mod util;

pub use lyon_path::FillRule;

/// A point in two-dimensional image space.
pub type Point2D<T> = euclid::default::Point2D<T>;
/// A displacement in two-dimensional image space.
pub type Vector2D<T> = euclid::default::Vector2D<T>;
/// An axis-aligned box, from `min` (inclusive) to `max` (exclusive).
pub type Box2D<T> = euclid::default::Box2D<T>;
