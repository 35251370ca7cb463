//! Tonal filters: Histogram expansion.
//!
//! Unlike per-channel auto levels, the expansion pools every sample of the
//! image (all channels) into one range, so relative channel balance is kept.

use ndarray::{Array3, ArrayView3};
use tracing::trace;

use super::core::truncate_to_u8;
use crate::error::{FilterError, FilterResult};

/// Stretch the pooled sample range `[min, max]` linearly onto `[0, 255]`.
///
/// Each sample maps to `(s - min) * 255 / (max - min)`, truncated.
///
/// # Errors
/// [`FilterError::DegenerateRange`] when every sample has the same value;
/// [`FilterError::ShapeMismatch`] for an empty image.
pub fn histogram_expand(input: ArrayView3<u8>) -> FilterResult<Array3<u8>> {
    let (height, width, channels) = input.dim();

    let (min, max) = input
        .iter()
        .fold(None, |acc: Option<(u8, u8)>, &v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .ok_or_else(|| FilterError::ShapeMismatch("cannot expand an empty image".into()))?;

    trace!(height, width, channels, min, max, "histogram_expand");

    if min == max {
        return Err(FilterError::DegenerateRange { value: min });
    }

    let range = (max - min) as f64;
    Ok(input.mapv(|v| truncate_to_u8((v - min) as f64 * 255.0 / range)))
}
