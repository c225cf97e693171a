// MIT/Apache2 License

//! A shutter for DICOM image display pipelines.
//!
//! A shutter masks the parts of an image that an imaging device did not expose, painting them with a solid
//! color. [`ShutterOp`] is the operation that does this. It reads the area to mask and its color from the
//! metadata of the displayed image, or from an applied presentation state, as the pipeline reports
//! [`ImageOpEvent`]s to it. Processing an image renders the area into a one-bit [`Stencil`] and composites the
//! color through it.
//!
//! The geometry lives in the `shutter-geometry` crate and is re-exported here.

mod color;
pub mod composite;
mod definition;
mod error;
mod event;
mod op;
mod rendered;
mod tags;

pub use color::*;
pub use definition::*;
pub use error::*;
pub use event::*;
pub use op::*;
pub use rendered::*;
pub use tags::*;

#[doc(inline)]
pub use shutter_geometry::{
    rasterize, Area, Box2D, Coverage, Difference, Ellipse, FillRule, Intersection, Point2D, Polygon,
    RasterGeometry, RasterOptions, Region, RegionExt, Shape, Span, Stencil, Union, Vector2D,
};
