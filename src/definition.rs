// MIT/Apache2 License

//! Turning the shutter attributes of a DICOM data set into the shape and color the shutter operation reads.
//!
//! A data set may describe up to three shutters at once: a rectangle, a circle and a polygon. Each of them
//! describes the part of the image that stays visible, and the image shows only what every shutter leaves
//! visible. Everything else in the image frame is masked.
//!
//! DICOM positions are 1-based `(row, column)` pairs naming pixels. Here they are converted into image space,
//! where the pixel at row `r` and column `c` covers the unit square starting at `(c - 1, r - 1)`.

use crate::{cielab_to_rgb, Error, PValue, Result, Tag, Tags};
use image::Rgb;
use shutter_geometry::{Box2D, Ellipse, FillRule, Point2D, Polygon, RegionExt, Shape};

/// The shutters described by a data set.
#[derive(Debug, Clone, Default)]
pub struct ShutterDefinition {
    /// The visible area of a rectangular shutter.
    pub rectangle: Option<Box2D<f32>>,
    /// The visible area of a circular shutter.
    pub circle: Option<Ellipse>,
    /// The visible area of a polygonal shutter.
    pub polygon: Option<Polygon>,
    /// The gray level of the masked area.
    pub presentation_value: Option<PValue>,
    /// The color of the masked area.
    pub color: Option<Rgb<u8>>,
}

impl ShutterDefinition {
    /// Read the shutter attributes out of a set of tags.
    ///
    /// A shutter named by the Shutter Shape attribute must have all of its attributes present. Bitmap shutters
    /// are not described by these attributes and are skipped.
    pub fn from_tags(tags: &Tags) -> Result<ShutterDefinition> {
        let mut definition = ShutterDefinition {
            presentation_value: tags.p_value(Tag::ShutterPresentationValue)?,
            color: cielab(tags)?,
            ..ShutterDefinition::default()
        };

        let kinds = match tags.text(Tag::ShutterShape)? {
            Some(kinds) => kinds,
            None => return Ok(definition),
        };

        for kind in kinds.split('\\').map(str::trim) {
            match kind.to_ascii_uppercase().as_str() {
                "RECTANGULAR" => definition.rectangle = Some(rectangle(tags)?),
                "CIRCULAR" => definition.circle = Some(circle(tags)?),
                "POLYGONAL" => definition.polygon = Some(polygon(tags)?),
                "BITMAP" | "" => {}
                other => log::warn!("Ignoring unknown shutter shape \"{}\"", other),
            }
        }

        Ok(definition)
    }

    /// Does this definition describe any shutter at all?
    #[inline]
    pub fn has_shutter(&self) -> bool {
        self.rectangle.is_some() || self.circle.is_some() || self.polygon.is_some()
    }

    /// The area left visible by every shutter, or `None` if there are no shutters.
    pub fn visible_area(&self) -> Option<Shape> {
        let shutters: [Option<Shape>; 3] = [
            self.rectangle.map(RegionExt::into_shape),
            self.circle.map(RegionExt::into_shape),
            self.polygon.clone().map(RegionExt::into_shape),
        ];

        shutters.into_iter().flatten().reduce(|visible, shutter| visible.intersect_with(shutter).into_shape())
    }

    /// The area to mask in an image of the given size: the image frame outside of the visible area.
    pub fn final_shape(&self, columns: u32, rows: u32) -> Option<Shape> {
        let frame = Box2D::new(Point2D::new(0.0, 0.0), Point2D::new(columns as f32, rows as f32));
        self.visible_area().map(|visible| frame.subtract(visible).into_shape())
    }

    /// Store the shape and color the shutter operation reads into `tags`.
    ///
    /// Derived tags that this definition has no value for are removed.
    pub fn apply_to(&self, tags: &mut Tags, columns: u32, rows: u32) {
        match self.final_shape(columns, rows) {
            Some(shape) => tags.insert(Tag::ShutterFinalShape, shape),
            None => tags.remove(Tag::ShutterFinalShape),
        };
        match self.presentation_value {
            Some(PValue(value)) => tags.insert(Tag::ShutterPSValue, i32::from(value)),
            None => tags.remove(Tag::ShutterPSValue),
        };
        match self.color {
            Some(color) => tags.insert(Tag::ShutterRGBColor, color),
            None => tags.remove(Tag::ShutterRGBColor),
        };
    }
}

/// Read the shutter attributes out of `tags` and store the derived tags beside them.
pub fn derive_shutter_tags(tags: &mut Tags, columns: u32, rows: u32) -> Result<ShutterDefinition> {
    let definition = ShutterDefinition::from_tags(tags)?;
    definition.apply_to(tags, columns, rows);
    log::debug!(
        "Derived shutter tags for a {}x{} image, shutters present: {}",
        columns,
        rows,
        definition.has_shutter()
    );
    Ok(definition)
}

fn required_int(tags: &Tags, tag: Tag) -> Result<i32> {
    tags.int(tag)?.ok_or(Error::MissingTag(tag))
}

fn rectangle(tags: &Tags) -> Result<Box2D<f32>> {
    let left = required_int(tags, Tag::ShutterLeftVerticalEdge)?;
    let right = required_int(tags, Tag::ShutterRightVerticalEdge)?;
    let upper = required_int(tags, Tag::ShutterUpperHorizontalEdge)?;
    let lower = required_int(tags, Tag::ShutterLowerHorizontalEdge)?;

    // edges are inclusive, so the last column and row are part of the box
    Ok(Box2D::new(
        Point2D::new((left - 1) as f32, (upper - 1) as f32),
        Point2D::new(right as f32, lower as f32),
    ))
}

fn circle(tags: &Tags) -> Result<Ellipse> {
    let center = match tags.ints(Tag::CenterOfCircularShutter)? {
        Some(&[row, column]) => pixel_center(row, column),
        Some(_) => {
            return Err(Error::MalformedTag {
                tag: Tag::CenterOfCircularShutter,
                expected: "a (row, column) pair",
            })
        }
        None => return Err(Error::MissingTag(Tag::CenterOfCircularShutter)),
    };
    let radius = required_int(tags, Tag::RadiusOfCircularShutter)?;

    Ok(Ellipse::circle(center, radius as f32))
}

fn polygon(tags: &Tags) -> Result<Polygon> {
    let vertices = tags
        .ints(Tag::VerticesOfThePolygonalShutter)?
        .ok_or(Error::MissingTag(Tag::VerticesOfThePolygonalShutter))?;
    if vertices.len() % 2 != 0 {
        return Err(Error::MalformedTag {
            tag: Tag::VerticesOfThePolygonalShutter,
            expected: "a list of (row, column) pairs",
        });
    }

    let points: Vec<Point2D<f32>> = vertices
        .chunks_exact(2)
        .map(|pair| pixel_center(pair[0], pair[1]))
        .collect();
    Ok(Polygon::from_points(&points, FillRule::EvenOdd))
}

fn cielab(tags: &Tags) -> Result<Option<Rgb<u8>>> {
    let tag = Tag::ShutterPresentationColorCIELabValue;
    let values = match tags.ints(tag)? {
        Some(values) => values,
        None => return Ok(None),
    };

    let malformed = || Error::MalformedTag {
        tag,
        expected: "three 16-bit CIELab values",
    };
    let lab = match values {
        &[l, a, b] => [
            u16::try_from(l).map_err(|_| malformed())?,
            u16::try_from(a).map_err(|_| malformed())?,
            u16::try_from(b).map_err(|_| malformed())?,
        ],
        _ => return Err(malformed()),
    };

    Ok(Some(cielab_to_rgb(lab)))
}

#[inline]
fn pixel_center(row: i32, column: i32) -> Point2D<f32> {
    Point2D::new(column as f32 - 0.5, row as f32 - 0.5)
}
