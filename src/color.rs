// MIT/Apache2 License

//! Resolving the color painted over the shuttered area.

use image::Rgb;
use tinyvec::{array_vec, ArrayVec};

/// A grayscale value in DICOM P-values, from `0x0000` (black) to `0xFFFF` (white).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PValue(pub u16);

impl PValue {
    pub const WHITE: PValue = PValue(0xFFFF);

    /// Reduce to an 8-bit gray level by keeping the high byte.
    #[inline]
    pub fn to_u8(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

impl From<u16> for PValue {
    #[inline]
    fn from(value: u16) -> PValue {
        PValue(value)
    }
}

/// Where the color of the shutter comes from. An explicit color always takes precedence over an intensity.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ShutterColor {
    /// An explicit color, for color displays.
    Rgb(Rgb<u8>),
    /// A gray level, for monochrome displays.
    Intensity(PValue),
    /// Neither is known; the shutter is black.
    #[default]
    Unset,
}

impl ShutterColor {
    /// Pick the source of the shutter color from the two optional parameters.
    #[inline]
    pub fn from_parts(rgb: Option<Rgb<u8>>, p_value: Option<PValue>) -> ShutterColor {
        match (rgb, p_value) {
            (Some(rgb), _) => ShutterColor::Rgb(rgb),
            (None, Some(p_value)) => ShutterColor::Intensity(p_value),
            (None, None) => ShutterColor::Unset,
        }
    }

    /// Resolve into the band values that are painted.
    #[inline]
    pub fn resolve(self) -> MaskColor {
        match self {
            ShutterColor::Rgb(Rgb([r, g, b])) => MaskColor::rgb(r, g, b),
            ShutterColor::Intensity(p_value) => MaskColor::grey(p_value.to_u8()),
            ShutterColor::Unset => MaskColor::black(),
        }
    }
}

/// The 8-bit band values painted over the shuttered area: either a single gray band, or red, green and
/// blue bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskColor {
    bands: ArrayVec<[u8; 3]>,
}

impl MaskColor {
    /// A single black band.
    #[inline]
    pub fn black() -> MaskColor {
        MaskColor::grey(0)
    }

    /// A single gray band.
    #[inline]
    pub fn grey(value: u8) -> MaskColor {
        MaskColor {
            bands: array_vec!([u8; 3] => value),
        }
    }

    /// Red, green and blue bands.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> MaskColor {
        MaskColor {
            bands: ArrayVec::from([r, g, b]),
        }
    }

    /// The band values, in order.
    #[inline]
    pub fn bands(&self) -> &[u8] {
        &self.bands
    }

    /// Is every band zero?
    #[inline]
    pub fn is_black(&self) -> bool {
        self.bands.iter().all(|band| *band == 0)
    }

    /// Do all bands hold the same value?
    #[inline]
    pub fn is_grey(&self) -> bool {
        self.bands.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// The value to use for the band at `index` of a color pixel. A single gray band is replicated.
    #[inline]
    pub fn band(&self, index: usize) -> u8 {
        let last = self.bands.len().saturating_sub(1);
        self.bands.get(index.min(last)).copied().unwrap_or(0)
    }

    /// The value to use for a gray pixel. Colors are reduced with the Rec. 601 luma weights.
    pub fn luma(&self) -> u8 {
        match *self.bands {
            [grey] => grey,
            [r, g, b] if r == g && g == b => r,
            [r, g, b] => {
                let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
                luma.round().clamp(0.0, 255.0) as u8
            }
            _ => 0,
        }
    }
}

impl From<ShutterColor> for MaskColor {
    #[inline]
    fn from(color: ShutterColor) -> MaskColor {
        color.resolve()
    }
}

// D65 reference white
const XN: f32 = 0.950_47;
const YN: f32 = 1.0;
const ZN: f32 = 1.088_83;

/// Convert a DICOM-encoded CIELab value into an sRGB color.
///
/// DICOM scales L* from `0..=100` and a*/b* from `-128..=127` onto `0x0000..=0xFFFF`.
pub fn cielab_to_rgb([l, a, b]: [u16; 3]) -> Rgb<u8> {
    let l = f32::from(l) * 100.0 / 65535.0;
    let a = f32::from(a) * 255.0 / 65535.0 - 128.0;
    let b = f32::from(b) * 255.0 / 65535.0 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = XN * lab_inverse(fx);
    let y = YN * lab_inverse(fy);
    let z = ZN * lab_inverse(fz);

    let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
    let g = -0.969_266 * x + 1.876_010_8 * y + 0.041_556 * z;
    let b = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

    Rgb([gamma_encode(r), gamma_encode(g), gamma_encode(b)])
}

#[inline]
fn lab_inverse(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

#[inline]
fn gamma_encode(linear: f32) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}
