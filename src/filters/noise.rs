//! Noise reduction: Median filter.
//!
//! The image is extended with zero samples by half the window on each
//! side, so border pixels see black beyond the edge. Every channel
//! (including alpha) is filtered independently.

use ndarray::{Array3, ArrayView3};
use tracing::trace;

use super::core::zero_pad_channel;
use crate::error::{FilterError, FilterResult};

// ============================================================================
// Median Filter
// ============================================================================

/// Apply a `rows` x `cols` median filter.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `rows` - Window height, must be odd
/// * `cols` - Window width, must be odd
///
/// # Returns
/// Median-filtered image with the same dimensions
pub fn median_filter(input: ArrayView3<u8>, rows: usize, cols: usize) -> FilterResult<Array3<u8>> {
    if rows % 2 == 0 || cols % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "median window must have odd dimensions, got {rows}x{cols}"
        )));
    }

    let (height, width, channels) = input.dim();
    trace!(height, width, channels, rows, cols, "median_filter");

    let mut output = Array3::<u8>::zeros((height, width, channels));
    let (pad_rows, pad_cols) = (rows / 2, cols / 2);
    let mut window: Vec<u8> = Vec::with_capacity(rows * cols);

    for c in 0..channels {
        let padded = zero_pad_channel(&input, c, pad_rows, pad_cols);

        for y in 0..height {
            for x in 0..width {
                window.clear();
                for dy in 0..rows {
                    for dx in 0..cols {
                        window.push(padded[[y + dy, x + dx]]);
                    }
                }

                let mid = window.len() / 2;
                let (_, median, _) = window.select_nth_unstable(mid);
                output[[y, x, c]] = *median;
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_rejects_even_window() {
        let img = Array3::<u8>::zeros((5, 5, 3));
        assert!(matches!(
            median_filter(img.view(), 2, 3),
            Err(FilterError::InvalidKernel(_))
        ));
        assert!(median_filter(img.view(), 3, 4).is_err());
        assert!(median_filter(img.view(), 0, 3).is_err());
    }

    #[test]
    fn test_median_removes_salt() {
        let mut img = Array3::<u8>::zeros((5, 5, 3));
        img.fill(128);
        img[[2, 2, 0]] = 255;

        let result = median_filter(img.view(), 3, 3).unwrap();

        assert_eq!(result[[2, 2, 0]], 128);
    }

    #[test]
    fn test_median_uniform_interior_unchanged() {
        let mut img = Array3::<u8>::zeros((7, 7, 3));
        img.fill(90);

        let result = median_filter(img.view(), 3, 3).unwrap();

        assert_eq!(result.dim(), (7, 7, 3));
        for y in 1..6 {
            for x in 1..6 {
                assert_eq!(result[[y, x, 1]], 90);
            }
        }
        // edge windows hold 6 image samples out of 9, corners only 4
        assert_eq!(result[[0, 3, 1]], 90);
        assert_eq!(result[[0, 0, 1]], 0);
    }

    #[test]
    fn test_median_uniform_line_windows_unchanged() {
        let mut img = Array3::<u8>::zeros((6, 8, 3));
        img.fill(33);

        for (rows, cols) in [(1, 1), (1, 3), (3, 1)] {
            let result = median_filter(img.view(), rows, cols).unwrap();
            assert_eq!(result, img);
        }
    }

    #[test]
    fn test_median_zero_padding_darkens_corners() {
        let mut img = Array3::<u8>::zeros((5, 5, 3));
        img.fill(200);

        let result = median_filter(img.view(), 5, 5).unwrap();

        // corner window holds 9 image samples and 16 zeros
        assert_eq!(result[[0, 0, 0]], 0);
        assert_eq!(result[[2, 2, 0]], 200);
    }

    #[test]
    fn test_median_channels_independent() {
        let mut img = Array3::<u8>::zeros((3, 3, 3));
        for y in 0..3 {
            for x in 0..3 {
                img[[y, x, 0]] = 10;
                img[[y, x, 2]] = 250;
            }
        }
        img[[1, 1, 0]] = 255;

        let result = median_filter(img.view(), 3, 3).unwrap();

        assert_eq!(result[[1, 1, 0]], 10);
        assert_eq!(result[[1, 1, 1]], 0);
        assert_eq!(result[[1, 1, 2]], 250);
    }

    #[test]
    fn test_median_rectangular_window() {
        let mut img = Array3::<u8>::zeros((1, 5, 1));
        for x in 0..5 {
            img[[0, x, 0]] = [5, 1, 9, 3, 7][x];
        }

        let result = median_filter(img.view(), 1, 3).unwrap();

        assert_eq!(result.iter().copied().collect::<Vec<_>>(), vec![1, 5, 3, 7, 3]);
    }
}
