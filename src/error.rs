// MIT/Apache2 License

use crate::{op::ParamKey, tags::Tag};
use image::ColorType;
use shutter_geometry::RasterGeometry;
use std::fmt;

/// Sum error type for shutter operations.
#[derive(Debug)]
pub enum Error {
    /// A tag held a value of the wrong type.
    MalformedTag { tag: Tag, expected: &'static str },
    /// A tag required by another tag was not present.
    MissingTag(Tag),
    /// A parameter was given a value of the wrong type.
    ParamType { key: ParamKey, expected: &'static str },
    /// No parameter goes by this name.
    UnknownParam(String),
    /// The pixel layout of an image cannot be composited.
    UnsupportedColorType(ColorType),
    /// Two layers do not cover the same pixels.
    GeometryMismatch {
        expected: RasterGeometry,
        found: RasterGeometry,
    },
    /// Two layers do not share the same pixel layout.
    LayoutMismatch {
        expected: ColorType,
        found: ColorType,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTag { tag, expected } => {
                write!(f, "Tag \"{}\" does not hold {}", tag, expected)
            }
            Self::MissingTag(tag) => write!(f, "Tag \"{}\" is required but absent", tag),
            Self::ParamType { key, expected } => {
                write!(f, "Parameter \"{}\" expects {}", key, expected)
            }
            Self::UnknownParam(name) => write!(f, "Unknown parameter \"{}\"", name),
            Self::UnsupportedColorType(ct) => {
                write!(f, "Cannot composite images of color type {:?}", ct)
            }
            Self::GeometryMismatch { expected, found } => write!(
                f,
                "Expected a {}x{} raster at ({}, {}), found a {}x{} raster at ({}, {})",
                expected.width,
                expected.height,
                expected.origin.x,
                expected.origin.y,
                found.width,
                found.height,
                found.origin.x,
                found.origin.y,
            ),
            Self::LayoutMismatch { expected, found } => {
                write!(f, "Expected a layer of type {:?}, found {:?}", expected, found)
            }
        }
    }
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
