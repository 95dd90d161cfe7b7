//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the closed range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Arithmetic mean of two values.
pub fn mean<T>(a: T, b: T) -> T
where
    T: Float,
{
    (a + b) / T::from(2).unwrap_or_else(T::one)
}

/// Round a value to the given number of decimal places.
///
/// Values which cannot be scaled to that precision are returned unchanged.
pub fn round_to<T>(value: T, decimals: u32) -> T
where
    T: Float,
{
    let ten = T::from(10).unwrap_or_else(T::one);
    let scale = ten.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * scale;

    if scale.is_finite() && scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    }
}
