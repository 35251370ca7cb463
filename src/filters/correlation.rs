//! Correlation filters: weighted window sums over an image.
//!
//! Two modes are supported:
//!
//! - **Padded** ([`correlate_padded`]): the image is extended with zeros by
//!   half the kernel on each side, the output keeps the input dimensions and
//!   every result is shifted by an `(row, col)` offset.
//! - **Strided** ([`correlate_strided`]): no padding, the window advances by
//!   `stride + 1` samples and the output shrinks to
//!   `((H - M) / (stride + 1), (W - N) / (stride + 1))`.
//!
//! Both modes take the absolute value of the window sum, round it and
//! saturate into 0-255. Channels are filtered independently. No kernel flip
//! is applied (correlation, not convolution).

use ndarray::{Array2, Array3, ArrayView3};
use tracing::trace;

use super::core::{round_to_u8, zero_pad_channel};
use super::kernel::Kernel;
use crate::error::{FilterError, FilterResult};

/// Where strided window results land in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrideIndexing {
    /// Window `k` (starting at `k * (stride + 1)`) writes cell `k`.
    #[default]
    Aligned,
    /// Window starting at `x` writes cell `x / (stride + 1) - 1`; the first
    /// window (index -1) wraps to the last cell. Needed to reproduce
    /// existing strided filter-bank fixtures.
    Legacy,
}

#[inline]
fn window_sum(plane: &Array2<u8>, top: usize, left: usize, kernel: &Kernel) -> f64 {
    let mut sum = 0.0f64;
    for ((ky, kx), &w) in kernel.weights().indexed_iter() {
        sum += plane[[top + ky, left + kx]] as f64 * w;
    }
    sum
}

// ============================================================================
// Padded Correlation
// ============================================================================

/// Correlate with zero padding, shifting results by `offset`.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `kernel` - M x N weights
/// * `offset` - (row, col) added to each output position; results landing
///   outside the image are dropped
///
/// # Returns
/// Filtered image with the input dimensions. Cells no result lands on stay 0.
pub fn correlate_padded(
    input: ArrayView3<u8>,
    kernel: &Kernel,
    offset: (isize, isize),
) -> FilterResult<Array3<u8>> {
    let (height, width, channels) = input.dim();
    let (rows, cols) = (kernel.rows(), kernel.cols());
    trace!(height, width, channels, rows, cols, ?offset, "correlate_padded");

    let mut output = Array3::<u8>::zeros((height, width, channels));
    let (pad_rows, pad_cols) = (rows / 2, cols / 2);

    for c in 0..channels {
        let padded = zero_pad_channel(&input, c, pad_rows, pad_cols);

        for y in 0..height {
            let ty = y as isize + offset.0;
            if ty < 0 || ty >= height as isize {
                continue;
            }

            for x in 0..width {
                let tx = x as isize + offset.1;
                if tx < 0 || tx >= width as isize {
                    continue;
                }

                let sum = window_sum(&padded, y, x, kernel);
                output[[ty as usize, tx as usize, c]] = round_to_u8(sum.abs());
            }
        }
    }

    Ok(output)
}

// ============================================================================
// Strided Correlation
// ============================================================================

/// Output index of the window starting at `start` under legacy indexing.
fn legacy_index(start: usize, step: usize, len: usize) -> Option<usize> {
    let idx = (start / step) as isize - 1;
    let idx = if idx < 0 { idx + len as isize } else { idx };
    (idx >= 0 && (idx as usize) < len).then_some(idx as usize)
}

/// Correlate without padding, advancing the window by `stride + 1`.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `kernel` - M x N weights, no larger than the image
/// * `offset` - Accepted for symmetry with [`correlate_padded`]; unused
/// * `stride` - Samples skipped between windows, 0 slides densely
/// * `indexing` - Mapping from window position to output cell
///
/// # Returns
/// Filtered image of `((H - M) / (stride + 1), (W - N) / (stride + 1))`
pub fn correlate_strided(
    input: ArrayView3<u8>,
    kernel: &Kernel,
    offset: (isize, isize),
    stride: usize,
    indexing: StrideIndexing,
) -> FilterResult<Array3<u8>> {
    let (height, width, channels) = input.dim();
    let (rows, cols) = (kernel.rows(), kernel.cols());
    if rows > height || cols > width {
        return Err(FilterError::InvalidKernel(format!(
            "{rows}x{cols} kernel does not fit a {height}x{width} image"
        )));
    }
    trace!(height, width, channels, rows, cols, stride, ?offset, ?indexing, "correlate_strided");

    let step = stride + 1;
    let span_h = height - rows;
    let span_w = width - cols;
    let (out_h, out_w) = (span_h / step, span_w / step);
    let mut output = Array3::<u8>::zeros((out_h, out_w, channels));

    for c in 0..channels {
        let plane = zero_pad_channel(&input, c, 0, 0);

        match indexing {
            StrideIndexing::Aligned => {
                for oy in 0..out_h {
                    for ox in 0..out_w {
                        let sum = window_sum(&plane, oy * step, ox * step, kernel);
                        output[[oy, ox, c]] = round_to_u8(sum.abs());
                    }
                }
            }
            StrideIndexing::Legacy => {
                for y in (0..span_h).step_by(step) {
                    let Some(oy) = legacy_index(y, step, out_h) else {
                        continue;
                    };
                    for x in (0..span_w).step_by(step) {
                        let Some(ox) = legacy_index(x, step, out_w) else {
                            continue;
                        };
                        let sum = window_sum(&plane, y, x, kernel);
                        output[[oy, ox, c]] = round_to_u8(sum.abs());
                    }
                }
            }
        }
    }

    Ok(output)
}
