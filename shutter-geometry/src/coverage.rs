// MIT/Apache2 License

use ordered_float::NotNan;

/// The fraction of a pixel covered by a region. This type is essentially a wrapper around an `f32`, but with
/// two invariants:
///
/// * The inner value will always be between `0.0` and `1.0`.
/// * The inner value will never be `NaN`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Coverage {
    inner: NotNan<f32>,
}

impl Coverage {
    /// Create a new `Coverage`, without checking the inner value.
    ///
    /// # Safety
    ///
    /// Behavior is undefined if `inner` is not a number, or outside of the range [0, 1].
    #[must_use]
    #[inline]
    pub unsafe fn new_unchecked(inner: f32) -> Coverage {
        Coverage {
            inner: NotNan::new_unchecked(inner),
        }
    }

    /// Create a new `Coverage`. If the inner value does not meet the invariants mentioned above, this function
    /// returns `None`.
    #[must_use]
    #[inline]
    pub fn new(inner: f32) -> Option<Coverage> {
        if inner.is_nan() || !(0.0..=1.0).contains(&inner) {
            None
        } else {
            Some(Coverage {
                inner: NotNan::new(inner).ok()?,
            })
        }
    }

    /// Create a new `Coverage`, clamping the value into range. `NaN` becomes zero.
    #[must_use]
    #[inline]
    pub fn saturating(inner: f32) -> Coverage {
        if inner.is_nan() {
            Coverage::default()
        } else {
            // SAFETY: the value is clamped into [0, 1] and is not NaN
            unsafe { Coverage::new_unchecked(inner.clamp(0.0, 1.0)) }
        }
    }

    /// Get the inner value of the `Coverage`.
    #[must_use]
    #[inline]
    pub fn into_inner(self) -> f32 {
        self.inner.into_inner()
    }
}

impl Default for Coverage {
    #[inline]
    fn default() -> Coverage {
        // SAFETY: zero is in range
        unsafe { Coverage::new_unchecked(0.0) }
    }
}

impl From<Coverage> for f32 {
    #[inline]
    fn from(c: Coverage) -> f32 {
        c.into_inner()
    }
}
