//! Core utilities shared by the colour and window filters.
//!
//! - Channel-count checks for colour operations
//! - Zero padding of a single channel plane
//! - Saturating conversion of working values back to 8-bit samples

use ndarray::{s, Array2, Array3, ArrayView3};

use crate::error::{FilterError, FilterResult};

/// Number of colour channels (R, G, B) every colour transform reads.
pub const COLOR_CHANNELS: usize = 3;

/// Check that an image carries R, G and B.
///
/// Returns the full channel count so callers know whether a trailing alpha
/// channel has to be carried through.
pub fn require_rgb(input: &ArrayView3<u8>) -> FilterResult<usize> {
    let channels = input.dim().2;
    if channels < COLOR_CHANNELS {
        return Err(FilterError::UnsupportedChannels {
            expected: COLOR_CHANNELS,
            actual: channels,
        });
    }
    Ok(channels)
}

/// Extract the alpha plane of an RGBA image, if there is one.
pub fn alpha_plane(input: &ArrayView3<u8>) -> Option<Array2<u8>> {
    if input.dim().2 > COLOR_CHANNELS {
        Some(input.slice(s![.., .., COLOR_CHANNELS]).to_owned())
    } else {
        None
    }
}

/// Allocate an output image for three colour planes and an optional alpha.
pub fn rgb_output(height: usize, width: usize, alpha: Option<&Array2<u8>>) -> Array3<u8> {
    match alpha {
        Some(a) => {
            let mut output = Array3::<u8>::zeros((height, width, COLOR_CHANNELS + 1));
            output.slice_mut(s![.., .., COLOR_CHANNELS]).assign(a);
            output
        }
        None => Array3::<u8>::zeros((height, width, COLOR_CHANNELS)),
    }
}

/// Copy one channel into a plane extended by `pad_rows` / `pad_cols` zero
/// samples on every side.
pub fn zero_pad_channel(
    input: &ArrayView3<u8>,
    channel: usize,
    pad_rows: usize,
    pad_cols: usize,
) -> Array2<u8> {
    let (height, width, _) = input.dim();
    let mut padded = Array2::<u8>::zeros((height + 2 * pad_rows, width + 2 * pad_cols));
    padded
        .slice_mut(s![pad_rows..pad_rows + height, pad_cols..pad_cols + width])
        .assign(&input.slice(s![.., .., channel]));
    padded
}

/// Round to the nearest integer and clamp into the 8-bit range.
#[inline]
pub fn round_to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Drop the fractional part and clamp into the 8-bit range.
#[inline]
pub fn truncate_to_u8(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
