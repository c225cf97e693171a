// MIT/Apache2 License

//! The shutter operation.

use crate::{
    composite::{constant_layer, fill_stencil, merge},
    Error, ImageOpEvent, PValue, RenderedImage, Result, ShutterColor, Tag, TaggedElement,
};
use image::Rgb;
use shutter_geometry::{RasterOptions, Region, Shape};
use std::{fmt, str::FromStr};

/// The name of the shutter operation.
pub const OP_NAME: &str = "Image Shutter";

/// A step of an image display pipeline.
///
/// The pipeline delivers events to every operation as they happen upstream, and later runs each operation over
/// the image produced by the operation before it. Delivery of events and processing never overlap for the
/// same operation.
pub trait ImageOp {
    /// The name of this operation.
    fn name(&self) -> &str;

    /// React to something that happened upstream.
    fn handle_event(&mut self, event: &ImageOpEvent<'_>) -> Result;

    /// Produce the output image for `source`. The source image is never modified.
    fn process(&self, source: &RenderedImage) -> Result<RenderedImage>;
}

/// The names the parameters of the shutter go by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Whether to apply the shutter at all.
    Show,
    /// The area to mask.
    Shape,
    /// The color of the mask.
    RgbColor,
    /// The gray level of the mask, in P-values.
    PsValue,
}

impl ParamKey {
    pub const ALL: [ParamKey; 4] = [ParamKey::Show, ParamKey::Shape, ParamKey::RgbColor, ParamKey::PsValue];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::Show => "show",
            ParamKey::Shape => "shape",
            ParamKey::RgbColor => "rgb.color",
            ParamKey::PsValue => "ps.value",
        }
    }
}

impl FromStr for ParamKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<ParamKey> {
        ParamKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownParam(s.to_string()))
    }
}

impl fmt::Display for ParamKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a parameter, for access by key.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Bool(bool),
    Shape(Shape),
    Color(Rgb<u8>),
    Int(i32),
}

/// The parameters of the shutter. Every parameter may be unknown.
#[derive(Debug, Clone, Default)]
pub struct ShutterParams {
    show: Option<bool>,
    shape: Option<Shape>,
    rgb_color: Option<Rgb<u8>>,
    p_value: Option<PValue>,
}

impl ShutterParams {
    #[inline]
    pub fn show(&self) -> Option<bool> {
        self.show
    }

    #[inline]
    pub fn set_show(&mut self, show: Option<bool>) {
        self.show = show;
    }

    #[inline]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Replace the shape. Shapes are never merged.
    #[inline]
    pub fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    #[inline]
    pub fn rgb_color(&self) -> Option<Rgb<u8>> {
        self.rgb_color
    }

    #[inline]
    pub fn set_rgb_color(&mut self, color: Option<Rgb<u8>>) {
        self.rgb_color = color;
    }

    #[inline]
    pub fn p_value(&self) -> Option<PValue> {
        self.p_value
    }

    #[inline]
    pub fn set_p_value(&mut self, p_value: Option<PValue>) {
        self.p_value = p_value;
    }

    /// Where the color of the mask comes from.
    #[inline]
    pub fn color(&self) -> ShutterColor {
        ShutterColor::from_parts(self.rgb_color, self.p_value)
    }

    /// Forget every parameter.
    #[inline]
    pub fn clear(&mut self) {
        *self = ShutterParams::default();
    }

    /// Forget the parameters that come from image metadata. `show` is kept.
    #[inline]
    pub fn clear_presentation(&mut self) {
        self.shape = None;
        self.rgb_color = None;
        self.p_value = None;
    }

    /// Get a parameter by key.
    pub fn get(&self, key: ParamKey) -> Option<ParamValue> {
        match key {
            ParamKey::Show => self.show.map(ParamValue::Bool),
            ParamKey::Shape => self.shape.clone().map(ParamValue::Shape),
            ParamKey::RgbColor => self.rgb_color.map(ParamValue::Color),
            ParamKey::PsValue => self.p_value.map(|PValue(value)| ParamValue::Int(i32::from(value))),
        }
    }

    /// Set a parameter by key. `None` makes it unknown.
    pub fn set(&mut self, key: ParamKey, value: Option<ParamValue>) -> Result {
        let mismatch = |expected| Error::ParamType { key, expected };

        match (key, value) {
            (ParamKey::Show, None) => self.show = None,
            (ParamKey::Show, Some(ParamValue::Bool(show))) => self.show = Some(show),
            (ParamKey::Show, Some(_)) => return Err(mismatch("a boolean")),
            (ParamKey::Shape, None) => self.shape = None,
            (ParamKey::Shape, Some(ParamValue::Shape(shape))) => self.shape = Some(shape),
            (ParamKey::Shape, Some(_)) => return Err(mismatch("a shape")),
            (ParamKey::RgbColor, None) => self.rgb_color = None,
            (ParamKey::RgbColor, Some(ParamValue::Color(color))) => self.rgb_color = Some(color),
            (ParamKey::RgbColor, Some(_)) => return Err(mismatch("a color")),
            (ParamKey::PsValue, None) => self.p_value = None,
            (ParamKey::PsValue, Some(ParamValue::Int(value))) => {
                let value = u16::try_from(value).map_err(|_| mismatch("a 16-bit P-value"))?;
                self.p_value = Some(PValue(value));
            }
            (ParamKey::PsValue, Some(_)) => return Err(mismatch("a 16-bit P-value")),
        }

        Ok(())
    }
}

/// Where the current parameters were read from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// The metadata of the displayed image.
    Image,
    /// A presentation state applied to the displayed image.
    PresentationState,
}

/// Whether the parameters of a shutter have been read from anywhere yet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ShutterState {
    #[default]
    Unset,
    Populated(ParamSource),
}

/// Masks part of an image, the way a shutter on an imaging device would.
///
/// The masked area is painted with a solid color. If the color is black, it is painted straight into a copy of
/// the source. Otherwise a layer of the color is merged over the source through a stencil of the area.
#[derive(Debug, Clone, Default)]
pub struct ShutterOp {
    params: ShutterParams,
    state: ShutterState,
    options: RasterOptions,
}

impl ShutterOp {
    #[inline]
    pub fn new() -> ShutterOp {
        ShutterOp::default()
    }

    /// Create a shutter that renders its stencils with the given options.
    #[inline]
    pub fn with_options(options: RasterOptions) -> ShutterOp {
        ShutterOp {
            options,
            ..ShutterOp::default()
        }
    }

    #[inline]
    pub fn params(&self) -> &ShutterParams {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut ShutterParams {
        &mut self.params
    }

    #[inline]
    pub fn state(&self) -> ShutterState {
        self.state
    }

    #[inline]
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Get a parameter by key.
    #[inline]
    pub fn param(&self, key: ParamKey) -> Option<ParamValue> {
        self.params.get(key)
    }

    /// Set a parameter by key.
    #[inline]
    pub fn set_param(&mut self, key: ParamKey, value: Option<ParamValue>) -> Result {
        self.params.set(key, value)
    }

    /// Read the shape and color of the shutter out of an element's tags.
    ///
    /// If any tag is malformed, the shape and color are forgotten and the shutter is left unset, so that nothing
    /// read from an earlier element outlives the failure.
    fn populate(&mut self, element: &dyn TaggedElement, source: ParamSource) -> Result {
        let tags = element.tags();
        let read = tags.shape(Tag::ShutterFinalShape).and_then(|shape| {
            Ok((
                shape,
                tags.p_value(Tag::ShutterPSValue)?,
                tags.color(Tag::ShutterRGBColor)?,
            ))
        });

        let (shape, p_value, rgb_color) = match read {
            Ok(read) => read,
            Err(err) => {
                log::debug!("Resetting the shutter after a malformed {:?} element: {}", source, err);
                self.params.clear_presentation();
                self.state = ShutterState::Unset;
                return Err(err);
            }
        };

        log::debug!(
            "Shutter parameters from {:?}: shape: {}, P-value: {:?}, color: {:?}",
            source,
            shape.is_some(),
            p_value,
            rgb_color
        );

        self.params.set_shape(shape);
        self.params.set_p_value(p_value);
        self.params.set_rgb_color(rgb_color);
        self.state = ShutterState::Populated(source);
        Ok(())
    }
}

impl ImageOp for ShutterOp {
    #[inline]
    fn name(&self) -> &str {
        OP_NAME
    }

    fn handle_event(&mut self, event: &ImageOpEvent<'_>) -> Result {
        match *event {
            ImageOpEvent::ImageChange(_) | ImageOpEvent::ResetDisplay(_) => match event.image() {
                Some(image) => self.populate(image, ParamSource::Image)?,
                None => {
                    log::debug!("No image, resetting the shutter");
                    self.params.clear();
                    self.state = ShutterState::Unset;
                }
            },
            ImageOpEvent::ApplyPresentationState(reader) => {
                match reader.and_then(|reader| reader.special_element()) {
                    Some(element) => self.populate(element, ParamSource::PresentationState)?,
                    None => {
                        log::debug!("Presentation state has no element for this image");
                        self.params.clear_presentation();
                        self.state = ShutterState::Unset;
                    }
                }
            }
            ImageOpEvent::SeriesChange => {}
        }

        Ok(())
    }

    fn process(&self, source: &RenderedImage) -> Result<RenderedImage> {
        let show = match self.params.show {
            Some(show) => show,
            None => {
                log::warn!("Cannot apply \"{}\" because a parameter is null", OP_NAME);
                return Ok(source.clone());
            }
        };

        let shape = match self.params.shape {
            Some(ref shape) if show && !shape.is_empty() => shape,
            _ => return Ok(source.clone()),
        };

        let color = self.params.color().resolve();
        let stencil = shape.rasterize(source.geometry(), &self.options);
        log::trace!("Shutter stencil covers {} pixels", stencil.count());

        if color.is_black() {
            fill_stencil(source, &stencil, &color)
        } else {
            let layer = constant_layer(source, &color)?;
            merge(source, &layer, &stencil)
        }
    }
}
