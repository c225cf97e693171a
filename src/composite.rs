// MIT/Apache2 License

//! Painting a color over the pixels selected by a stencil.
//!
//! There are two ways of doing it. [`fill_stencil`] paints the color straight into a copy of the source.
//! [`merge`] picks every pixel from one of two layers of the same size, usually the source and a
//! [`constant_layer`]. Both give the same result for the same color.

use crate::{Error, MaskColor, RenderedImage, Result};
use image::{ColorType, DynamicImage, ImageBuffer, Pixel, Primitive};
use shutter_geometry::Stencil;

/// Apply `$body` to the pixel buffer inside of a `DynamicImage`, producing a `DynamicImage` of the same kind.
macro_rules! with_buffer {
    ($image: expr, |$buffer: ident| $body: expr) => {{
        match $image {
            DynamicImage::ImageLuma8($buffer) => DynamicImage::ImageLuma8($body),
            DynamicImage::ImageLumaA8($buffer) => DynamicImage::ImageLumaA8($body),
            DynamicImage::ImageRgb8($buffer) => DynamicImage::ImageRgb8($body),
            DynamicImage::ImageRgba8($buffer) => DynamicImage::ImageRgba8($body),
            DynamicImage::ImageLuma16($buffer) => DynamicImage::ImageLuma16($body),
            DynamicImage::ImageLumaA16($buffer) => DynamicImage::ImageLumaA16($body),
            DynamicImage::ImageRgb16($buffer) => DynamicImage::ImageRgb16($body),
            DynamicImage::ImageRgba16($buffer) => DynamicImage::ImageRgba16($body),
            DynamicImage::ImageRgb32F($buffer) => DynamicImage::ImageRgb32F($body),
            DynamicImage::ImageRgba32F($buffer) => DynamicImage::ImageRgba32F($body),
            other => return Err(Error::UnsupportedColorType(other.color())),
        }
    }};
}

/// Like `with_buffer!`, but over two images of the same kind.
macro_rules! with_buffer_pair {
    ($a: expr, $b: expr, |$x: ident, $y: ident| $body: expr) => {{
        match ($a, $b) {
            (DynamicImage::ImageLuma8($x), DynamicImage::ImageLuma8($y)) => DynamicImage::ImageLuma8($body),
            (DynamicImage::ImageLumaA8($x), DynamicImage::ImageLumaA8($y)) => DynamicImage::ImageLumaA8($body),
            (DynamicImage::ImageRgb8($x), DynamicImage::ImageRgb8($y)) => DynamicImage::ImageRgb8($body),
            (DynamicImage::ImageRgba8($x), DynamicImage::ImageRgba8($y)) => DynamicImage::ImageRgba8($body),
            (DynamicImage::ImageLuma16($x), DynamicImage::ImageLuma16($y)) => DynamicImage::ImageLuma16($body),
            (DynamicImage::ImageLumaA16($x), DynamicImage::ImageLumaA16($y)) => {
                DynamicImage::ImageLumaA16($body)
            }
            (DynamicImage::ImageRgb16($x), DynamicImage::ImageRgb16($y)) => DynamicImage::ImageRgb16($body),
            (DynamicImage::ImageRgba16($x), DynamicImage::ImageRgba16($y)) => DynamicImage::ImageRgba16($body),
            (DynamicImage::ImageRgb32F($x), DynamicImage::ImageRgb32F($y)) => DynamicImage::ImageRgb32F($body),
            (DynamicImage::ImageRgba32F($x), DynamicImage::ImageRgba32F($y)) => {
                DynamicImage::ImageRgba32F($body)
            }
            (a, b) if a.color() == b.color() => return Err(Error::UnsupportedColorType(a.color())),
            (a, b) => {
                return Err(Error::LayoutMismatch {
                    expected: a.color(),
                    found: b.color(),
                })
            }
        }
    }};
}

/// Paint `color` over every pixel of `source` that is set in `stencil`.
///
/// The result is a new image. Pixels outside of the stencil keep their exact value, unless the source has to
/// be promoted to a color layout to show a non-grey color.
pub fn fill_stencil(source: &RenderedImage, stencil: &Stencil, color: &MaskColor) -> Result<RenderedImage> {
    check_frame(source, stencil)?;

    let layout = target_layout(source.color(), color);
    log::trace!("Filling {} stencil pixels in {:?}", stencil.count(), layout);

    let raster = convert(source.raster(), layout)?;
    let raster = with_buffer!(raster, |buffer| paint(buffer, stencil, color));
    Ok(source.derive(raster))
}

/// Create an image of the same size and placement as `like`, with every pixel set to `color`.
///
/// The layout of the layer is the layout `like` needs to show `color`.
pub fn constant_layer(like: &RenderedImage, color: &MaskColor) -> Result<RenderedImage> {
    let (width, height) = (like.width(), like.height());
    let raster = match target_layout(like.color(), color) {
        ColorType::L8 => DynamicImage::ImageLuma8(solid(width, height, color)),
        ColorType::La8 => DynamicImage::ImageLumaA8(solid(width, height, color)),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(solid(width, height, color)),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(solid(width, height, color)),
        ColorType::L16 => DynamicImage::ImageLuma16(solid(width, height, color)),
        ColorType::La16 => DynamicImage::ImageLumaA16(solid(width, height, color)),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(solid(width, height, color)),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(solid(width, height, color)),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(solid(width, height, color)),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(solid(width, height, color)),
        other => return Err(Error::UnsupportedColorType(other)),
    };

    Ok(like.derive(raster))
}

/// Combine two layers: pixels set in `stencil` are taken from `layer`, the rest from `source`.
///
/// Both layers must cover the same pixels. `layer` must either share the layout of `source`, or be the color
/// counterpart of a monochrome `source`, in which case `source` is promoted first.
pub fn merge(source: &RenderedImage, layer: &RenderedImage, stencil: &Stencil) -> Result<RenderedImage> {
    check_frame(source, stencil)?;
    if !layer.geometry().same_frame(&source.geometry()) {
        return Err(Error::GeometryMismatch {
            expected: source.geometry(),
            found: layer.geometry(),
        });
    }

    let layout = layer.color();
    if layout != source.color() && color_counterpart(source.color()) != layout {
        return Err(Error::LayoutMismatch {
            expected: source.color(),
            found: layout,
        });
    }
    log::trace!("Merging {} stencil pixels in {:?}", stencil.count(), layout);

    let base = convert(source.raster(), layout)?;
    let raster = with_buffer_pair!(base, layer.raster(), |base, top| select(base, top, stencil));
    Ok(source.derive(raster))
}

/// The layout an image of layout `source` needs to show `color`.
///
/// Monochrome layouts are promoted to their color counterpart when the color is not a shade of grey.
#[inline]
pub fn target_layout(source: ColorType, color: &MaskColor) -> ColorType {
    if color.is_grey() {
        source
    } else {
        color_counterpart(source)
    }
}

#[inline]
fn color_counterpart(layout: ColorType) -> ColorType {
    match layout {
        ColorType::L8 => ColorType::Rgb8,
        ColorType::La8 => ColorType::Rgba8,
        ColorType::L16 => ColorType::Rgb16,
        ColorType::La16 => ColorType::Rgba16,
        layout => layout,
    }
}

fn check_frame(source: &RenderedImage, stencil: &Stencil) -> Result {
    if stencil.geometry().same_frame(&source.geometry()) {
        Ok(())
    } else {
        Err(Error::GeometryMismatch {
            expected: source.geometry(),
            found: stencil.geometry(),
        })
    }
}

/// Copy the pixels of `raster` into the given layout.
fn convert(raster: &DynamicImage, layout: ColorType) -> Result<DynamicImage> {
    Ok(match layout {
        layout if layout == raster.color() => raster.clone(),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(raster.to_rgb8()),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(raster.to_rgba8()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(raster.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(raster.to_rgba16()),
        layout => {
            return Err(Error::LayoutMismatch {
                expected: layout,
                found: raster.color(),
            })
        }
    })
}

fn paint<P: Pixel>(
    mut buffer: ImageBuffer<P, Vec<P::Subpixel>>,
    stencil: &Stencil,
    color: &MaskColor,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let pixel = color_pixel::<P>(color);
    for (x, y) in stencil.iter_set() {
        buffer.put_pixel(x, y, pixel);
    }
    buffer
}

fn select<P: Pixel>(
    mut base: ImageBuffer<P, Vec<P::Subpixel>>,
    top: &ImageBuffer<P, Vec<P::Subpixel>>,
    stencil: &Stencil,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    for (x, y) in stencil.iter_set() {
        base.put_pixel(x, y, *top.get_pixel(x, y));
    }
    base
}

#[inline]
fn solid<P: Pixel>(width: u32, height: u32, color: &MaskColor) -> ImageBuffer<P, Vec<P::Subpixel>> {
    ImageBuffer::from_pixel(width, height, color_pixel(color))
}

/// Build a pixel of type `P` out of `color`. Alpha is always opaque.
fn color_pixel<P: Pixel>(color: &MaskColor) -> P {
    let channels = usize::from(P::CHANNEL_COUNT);
    let alpha = has_alpha::<P>();
    let grey = P::COLOR_MODEL.starts_with('Y');

    let mut samples = [<P::Subpixel as Primitive>::DEFAULT_MIN_VALUE; 4];
    for (index, sample) in samples.iter_mut().enumerate().take(channels) {
        *sample = if alpha && index == channels - 1 {
            <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE
        } else if grey {
            scale_sample(color.luma())
        } else {
            scale_sample(color.band(index))
        };
    }

    *P::from_slice(&samples[..channels])
}

#[inline]
fn has_alpha<P: Pixel>() -> bool {
    P::COLOR_MODEL.ends_with('A')
}

/// Map an 8-bit band value onto the full range of `S`.
fn scale_sample<S: Primitive>(value: u8) -> S {
    let max = S::DEFAULT_MAX_VALUE;
    let max_value = max.to_f32().unwrap_or(1.0);
    let scaled = f32::from(value) / 255.0 * max_value;
    // integer samples round, float samples stay in 0.0..=1.0
    let scaled = if max_value > 1.0 { scaled.round() } else { scaled };
    num_traits::cast::<f32, S>(scaled).unwrap_or(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, ImageBuffer, Luma, LumaA, Rgb, RgbImage, Rgba};
    use shutter_geometry::{Box2D, Point2D, RasterOptions, Region};

    fn square(size: f32) -> Box2D<f32> {
        Box2D::new(Point2D::new(0.0, 0.0), Point2D::new(size, size))
    }

    fn stencil_for(image: &RenderedImage, region: &dyn Region) -> Stencil {
        region.rasterize(image.geometry(), &RasterOptions::default())
    }

    #[test]
    fn both_paths_agree_on_black() {
        let source = RenderedImage::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([200, 100, 50]))));
        let stencil = stencil_for(&source, &square(5.0));
        let black = MaskColor::rgb(0, 0, 0);

        let filled = fill_stencil(&source, &stencil, &black).unwrap();
        let layer = constant_layer(&source, &black).unwrap();
        let merged = merge(&source, &layer, &stencil).unwrap();

        assert_eq!(filled, merged);
        assert_eq!(filled.raster().to_rgb8().get_pixel(4, 4), &Rgb([0, 0, 0]));
        assert_eq!(filled.raster().to_rgb8().get_pixel(5, 4), &Rgb([200, 100, 50]));
    }

    #[test]
    fn outside_pixels_are_untouched() {
        let mut pixels = GrayImage::new(16, 16);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            *pixel = Luma([(x * 16 + y) as u8]);
        }
        let source = RenderedImage::new(DynamicImage::ImageLuma8(pixels.clone()));
        let stencil = stencil_for(&source, &Box2D::new(Point2D::new(4.0, 4.0), Point2D::new(8.0, 8.0)));
        let grey = MaskColor::grey(0x7F);

        let filled = fill_stencil(&source, &stencil, &grey).unwrap();
        let merged = merge(&source, &constant_layer(&source, &grey).unwrap(), &stencil).unwrap();

        for output in [filled, merged] {
            let output = output.raster().as_luma8().unwrap();
            for (x, y, pixel) in output.enumerate_pixels() {
                if stencil.get(x, y) {
                    assert_eq!(pixel, &Luma([0x7F]));
                } else {
                    assert_eq!(pixel, pixels.get_pixel(x, y));
                }
            }
        }
        // the source itself is left alone
        assert_eq!(source.raster().as_luma8().unwrap(), &pixels);
    }

    #[test]
    fn color_promotes_monochrome_sources() {
        let source = RenderedImage::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255]))));
        let stencil = stencil_for(&source, &square(2.0));
        let red = MaskColor::rgb(255, 0, 0);

        let layer = constant_layer(&source, &red).unwrap();
        assert_eq!(layer.color(), ColorType::Rgb8);

        let merged = merge(&source, &layer, &stencil).unwrap();
        let filled = fill_stencil(&source, &stencil, &red).unwrap();
        assert_eq!(merged, filled);

        let output = merged.raster().as_rgb8().unwrap();
        assert_eq!(output.get_pixel(1, 1), &Rgb([255, 0, 0]));
        assert_eq!(output.get_pixel(2, 1), &Rgb([255, 255, 255]));

        // grey colors keep the layout
        let grey = fill_stencil(&source, &stencil, &MaskColor::rgb(3, 3, 3)).unwrap();
        assert_eq!(grey.color(), ColorType::L8);
    }

    #[test]
    fn samples_are_scaled_to_the_layout() {
        let source = RenderedImage::new(DynamicImage::ImageLuma16(ImageBuffer::from_pixel(4, 4, Luma([1u16]))));
        let stencil = stencil_for(&source, &square(1.0));

        let output = fill_stencil(&source, &stencil, &MaskColor::grey(0x80)).unwrap();
        let output = output.raster().as_luma16().unwrap();
        assert_eq!(output.get_pixel(0, 0), &Luma([32896]));
        assert_eq!(output.get_pixel(1, 0), &Luma([1]));

        assert_eq!(scale_sample::<u16>(0xFF), u16::MAX);
        assert_eq!(scale_sample::<u8>(0x12), 0x12);
        approx::assert_relative_eq!(scale_sample::<f32>(0xFF), 1.0);
        approx::assert_relative_eq!(scale_sample::<f32>(0), 0.0);
    }

    #[test]
    fn alpha_is_opaque() {
        let source = RenderedImage::new(DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(
            4,
            4,
            LumaA([9, 0]),
        )));
        let stencil = stencil_for(&source, &square(4.0));

        let output = fill_stencil(&source, &stencil, &MaskColor::grey(1)).unwrap();
        assert_eq!(output.raster().as_luma_alpha8().unwrap().get_pixel(3, 3), &LumaA([1, 255]));

        let output = fill_stencil(&source, &stencil, &MaskColor::rgb(1, 2, 3)).unwrap();
        assert_eq!(output.raster().as_rgba8().unwrap().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let source = RenderedImage::new(DynamicImage::ImageRgb8(RgbImage::new(8, 8)));
        let smaller = RenderedImage::new(DynamicImage::ImageRgb8(RgbImage::new(4, 8)));
        let stencil = stencil_for(&source, &square(2.0));

        assert!(matches!(
            merge(&source, &smaller, &stencil),
            Err(Error::GeometryMismatch { .. })
        ));
        assert!(matches!(
            fill_stencil(&smaller, &stencil, &MaskColor::black()),
            Err(Error::GeometryMismatch { .. })
        ));

        let grey_layer = RenderedImage::new(DynamicImage::ImageLuma8(GrayImage::new(8, 8)));
        assert!(matches!(
            merge(&source, &grey_layer, &stencil),
            Err(Error::LayoutMismatch { .. })
        ));
    }
}
