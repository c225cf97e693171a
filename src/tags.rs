// MIT/Apache2 License

//! Metadata attached to images and presentation states.

use crate::{Error, PValue, Result};
use image::Rgb;
use shutter_geometry::Shape;
use std::{collections::HashMap, fmt, sync::Arc};

/// The attributes the shutter cares about.
///
/// Some of these are read straight out of a DICOM data set. The others are derived from them when the data set
/// is decoded, and are what the shutter operation actually reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// The area to mask, in image space. Derived.
    ShutterFinalShape,
    /// The gray level of the mask, in P-values. Derived.
    ShutterPSValue,
    /// The color of the mask. Derived.
    ShutterRGBColor,
    /// Shutter Shape (0018,1600)
    ShutterShape,
    /// Shutter Left Vertical Edge (0018,1602)
    ShutterLeftVerticalEdge,
    /// Shutter Right Vertical Edge (0018,1604)
    ShutterRightVerticalEdge,
    /// Shutter Upper Horizontal Edge (0018,1606)
    ShutterUpperHorizontalEdge,
    /// Shutter Lower Horizontal Edge (0018,1608)
    ShutterLowerHorizontalEdge,
    /// Center of Circular Shutter (0018,1610)
    CenterOfCircularShutter,
    /// Radius of Circular Shutter (0018,1612)
    RadiusOfCircularShutter,
    /// Vertices of the Polygonal Shutter (0018,1620)
    VerticesOfThePolygonalShutter,
    /// Shutter Presentation Value (0018,1622)
    ShutterPresentationValue,
    /// Shutter Presentation Color CIELab Value (0018,1624)
    ShutterPresentationColorCIELabValue,
}

impl Tag {
    /// The keyword of this tag.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Tag::ShutterFinalShape => "ShutterFinalShape",
            Tag::ShutterPSValue => "ShutterPSValue",
            Tag::ShutterRGBColor => "ShutterRGBColor",
            Tag::ShutterShape => "ShutterShape",
            Tag::ShutterLeftVerticalEdge => "ShutterLeftVerticalEdge",
            Tag::ShutterRightVerticalEdge => "ShutterRightVerticalEdge",
            Tag::ShutterUpperHorizontalEdge => "ShutterUpperHorizontalEdge",
            Tag::ShutterLowerHorizontalEdge => "ShutterLowerHorizontalEdge",
            Tag::CenterOfCircularShutter => "CenterOfCircularShutter",
            Tag::RadiusOfCircularShutter => "RadiusOfCircularShutter",
            Tag::VerticesOfThePolygonalShutter => "VerticesOfThePolygonalShutter",
            Tag::ShutterPresentationValue => "ShutterPresentationValue",
            Tag::ShutterPresentationColorCIELabValue => "ShutterPresentationColorCIELabValue",
        }
    }

    /// The (group, element) pair of this tag, if it is part of a DICOM data set.
    #[inline]
    pub fn dicom_tag(self) -> Option<(u16, u16)> {
        let element = match self {
            Tag::ShutterFinalShape | Tag::ShutterPSValue | Tag::ShutterRGBColor => return None,
            Tag::ShutterShape => 0x1600,
            Tag::ShutterLeftVerticalEdge => 0x1602,
            Tag::ShutterRightVerticalEdge => 0x1604,
            Tag::ShutterUpperHorizontalEdge => 0x1606,
            Tag::ShutterLowerHorizontalEdge => 0x1608,
            Tag::CenterOfCircularShutter => 0x1610,
            Tag::RadiusOfCircularShutter => 0x1612,
            Tag::VerticesOfThePolygonalShutter => 0x1620,
            Tag::ShutterPresentationValue => 0x1622,
            Tag::ShutterPresentationColorCIELabValue => 0x1624,
        };
        Some((0x0018, element))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dicom_tag() {
            Some((group, element)) => write!(f, "{} ({:04X},{:04X})", self.name(), group, element),
            None => f.write_str(self.name()),
        }
    }
}

/// The value of a tag.
#[derive(Debug, Clone)]
pub enum TagValue {
    Int(i32),
    Ints(Vec<i32>),
    Text(String),
    Shape(Shape),
    Color(Rgb<u8>),
}

impl From<i32> for TagValue {
    #[inline]
    fn from(value: i32) -> TagValue {
        TagValue::Int(value)
    }
}

impl From<Vec<i32>> for TagValue {
    #[inline]
    fn from(values: Vec<i32>) -> TagValue {
        TagValue::Ints(values)
    }
}

impl From<String> for TagValue {
    #[inline]
    fn from(text: String) -> TagValue {
        TagValue::Text(text)
    }
}

impl From<&str> for TagValue {
    #[inline]
    fn from(text: &str) -> TagValue {
        TagValue::Text(text.to_string())
    }
}

impl From<Shape> for TagValue {
    #[inline]
    fn from(shape: Shape) -> TagValue {
        TagValue::Shape(shape)
    }
}

impl From<Rgb<u8>> for TagValue {
    #[inline]
    fn from(color: Rgb<u8>) -> TagValue {
        TagValue::Color(color)
    }
}

/// A set of tags and their values.
///
/// The typed getters return `Ok(None)` when a tag is absent and an error when it holds the wrong kind of value.
#[derive(Debug, Clone, Default)]
pub struct Tags {
    values: HashMap<Tag, TagValue>,
}

impl Tags {
    #[inline]
    pub fn new() -> Tags {
        Tags::default()
    }

    /// Set the value of a tag, returning the value it replaced.
    #[inline]
    pub fn insert(&mut self, tag: Tag, value: impl Into<TagValue>) -> Option<TagValue> {
        self.values.insert(tag, value.into())
    }

    #[inline]
    pub fn with(mut self, tag: Tag, value: impl Into<TagValue>) -> Tags {
        self.insert(tag, value);
        self
    }

    #[inline]
    pub fn remove(&mut self, tag: Tag) -> Option<TagValue> {
        self.values.remove(&tag)
    }

    #[inline]
    pub fn get(&self, tag: Tag) -> Option<&TagValue> {
        self.values.get(&tag)
    }

    #[inline]
    pub fn contains(&self, tag: Tag) -> bool {
        self.values.contains_key(&tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn shape(&self, tag: Tag) -> Result<Option<Shape>> {
        match self.get(tag) {
            None => Ok(None),
            Some(TagValue::Shape(shape)) => Ok(Some(shape.clone())),
            Some(_) => Err(malformed(tag, "a shape")),
        }
    }

    pub fn int(&self, tag: Tag) -> Result<Option<i32>> {
        match self.get(tag) {
            None => Ok(None),
            Some(TagValue::Int(value)) => Ok(Some(*value)),
            Some(TagValue::Ints(values)) if values.len() == 1 => Ok(Some(values[0])),
            Some(_) => Err(malformed(tag, "an integer")),
        }
    }

    /// A multi-valued integer tag. Single integers count as a list of one.
    pub fn ints(&self, tag: Tag) -> Result<Option<&[i32]>> {
        match self.get(tag) {
            None => Ok(None),
            Some(TagValue::Ints(values)) => Ok(Some(values)),
            Some(TagValue::Int(value)) => Ok(Some(std::slice::from_ref(value))),
            Some(_) => Err(malformed(tag, "a list of integers")),
        }
    }

    pub fn text(&self, tag: Tag) -> Result<Option<&str>> {
        match self.get(tag) {
            None => Ok(None),
            Some(TagValue::Text(text)) => Ok(Some(text)),
            Some(_) => Err(malformed(tag, "text")),
        }
    }

    pub fn color(&self, tag: Tag) -> Result<Option<Rgb<u8>>> {
        match self.get(tag) {
            None => Ok(None),
            Some(TagValue::Color(color)) => Ok(Some(*color)),
            Some(_) => Err(malformed(tag, "a color")),
        }
    }

    /// An integer tag holding a 16-bit P-value.
    pub fn p_value(&self, tag: Tag) -> Result<Option<PValue>> {
        match self.int(tag) {
            Ok(Some(value)) => u16::try_from(value)
                .map(|value| Some(PValue(value)))
                .map_err(|_| malformed(tag, "a 16-bit P-value")),
            Ok(None) => Ok(None),
            Err(_) => Err(malformed(tag, "a 16-bit P-value")),
        }
    }
}

#[inline]
fn malformed(tag: Tag, expected: &'static str) -> Error {
    Error::MalformedTag { tag, expected }
}

/// Something that carries tags.
pub trait TaggedElement {
    fn tags(&self) -> &Tags;
}

/// The metadata of a decoded image.
#[derive(Debug, Clone, Default)]
pub struct ImageElement {
    tags: Tags,
}

impl ImageElement {
    #[inline]
    pub fn new(tags: Tags) -> ImageElement {
        ImageElement { tags }
    }
}

impl TaggedElement for ImageElement {
    #[inline]
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// The part of a presentation state that applies to one image.
#[derive(Debug, Clone, Default)]
pub struct PrSpecialElement {
    tags: Tags,
}

impl PrSpecialElement {
    #[inline]
    pub fn new(tags: Tags) -> PrSpecialElement {
        PrSpecialElement { tags }
    }
}

impl TaggedElement for PrSpecialElement {
    #[inline]
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// A decoded presentation state. It might not have an element for the image being displayed.
#[derive(Debug, Clone, Default)]
pub struct PresentationStateReader {
    dicom: Option<Arc<PrSpecialElement>>,
}

impl PresentationStateReader {
    #[inline]
    pub fn new(dicom: Option<PrSpecialElement>) -> PresentationStateReader {
        PresentationStateReader {
            dicom: dicom.map(Arc::new),
        }
    }

    /// The element this presentation state holds for the current image.
    #[inline]
    pub fn special_element(&self) -> Option<&PrSpecialElement> {
        self.dicom.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_geometry::{Box2D, Point2D, RegionExt};

    #[test]
    fn typed_getters() {
        let shape = Box2D::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)).into_shape();
        let tags = Tags::new()
            .with(Tag::ShutterFinalShape, shape)
            .with(Tag::ShutterPSValue, 0xFF00)
            .with(Tag::ShutterShape, "CIRCULAR")
            .with(Tag::CenterOfCircularShutter, vec![5, 6])
            .with(Tag::ShutterRGBColor, Rgb([1, 2, 3]));

        assert!(tags.shape(Tag::ShutterFinalShape).unwrap().is_some());
        assert_eq!(tags.p_value(Tag::ShutterPSValue).unwrap(), Some(PValue(0xFF00)));
        assert_eq!(tags.text(Tag::ShutterShape).unwrap(), Some("CIRCULAR"));
        assert_eq!(tags.ints(Tag::CenterOfCircularShutter).unwrap(), Some(&[5, 6][..]));
        assert_eq!(tags.ints(Tag::ShutterPSValue).unwrap(), Some(&[0xFF00][..]));
        assert_eq!(tags.color(Tag::ShutterRGBColor).unwrap(), Some(Rgb([1, 2, 3])));
        assert_eq!(tags.int(Tag::RadiusOfCircularShutter).unwrap(), None);
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn wrong_kinds_are_errors() {
        let tags = Tags::new()
            .with(Tag::ShutterFinalShape, "not a shape")
            .with(Tag::ShutterPSValue, 70_000)
            .with(Tag::ShutterRGBColor, 3);

        assert!(matches!(
            tags.shape(Tag::ShutterFinalShape),
            Err(Error::MalformedTag {
                tag: Tag::ShutterFinalShape,
                ..
            })
        ));
        assert!(tags.p_value(Tag::ShutterPSValue).is_err());
        assert!(tags.color(Tag::ShutterRGBColor).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::ShutterShape.to_string(), "ShutterShape (0018,1600)");
        assert_eq!(Tag::ShutterFinalShape.to_string(), "ShutterFinalShape");
    }

    #[test]
    fn readers_may_lack_an_element() {
        assert!(PresentationStateReader::default().special_element().is_none());
        let reader = PresentationStateReader::new(Some(PrSpecialElement::new(
            Tags::new().with(Tag::ShutterPSValue, 0),
        )));
        assert!(reader.special_element().unwrap().tags().contains(Tag::ShutterPSValue));
    }
}
