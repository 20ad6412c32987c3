use crate::error::RuntimeError;

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Converts a script number to an index if it is finite, non-negative,
/// integral and exactly representable.
///
/// ## Errors
/// Returns `RuntimeError::InvalidIndex` for any other value.
///
/// ## Example
/// ```
/// use wdte::{error::RuntimeError, util::num::f64_to_index};
///
/// assert_eq!(f64_to_index(3.0).unwrap(), 3);
///
/// let err = f64_to_index(1.5).unwrap_err();
/// assert!(matches!(err, RuntimeError::InvalidIndex { .. }));
/// assert!(f64_to_index(-1.0).is_err());
/// assert!(f64_to_index(f64::NAN).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_index(value: f64) -> Result<usize, RuntimeError> {
    if !value.is_finite() || value < 0.0 || value > MAX_SAFE_U64_INT as f64 || value.fract() != 0.0 {
        return Err(RuntimeError::InvalidIndex { index: value });
    }

    usize::try_from(value as u64).map_err(|_| RuntimeError::InvalidIndex { index: value })
}

/// Converts a length or index to a script number.
///
/// Values above `MAX_SAFE_U64_INT` lose precision. No collection a script can
/// build gets that large.
///
/// ## Example
/// ```
/// use wdte::util::num::usize_to_f64;
///
/// assert_eq!(usize_to_f64(42), 42.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}
