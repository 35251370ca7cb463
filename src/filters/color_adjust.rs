//! Color adjustment filters: Negative, Negative on Luma / Brightness,
//! Hue and Saturation shift.
//!
//! The direct negative works on the caller's image in place. Every other
//! edit goes through a color space round trip (RGB -> planes -> RGB) and
//! returns a new image.
//!
//! ## Supported Formats
//!
//! - **Grayscale (1 channel)**: direct negative only
//! - **RGB (3 channels)**: all edits
//! - **RGBA (4 channels)**: all edits, alpha preserved

use ndarray::{Array3, ArrayBase, ArrayView3, DataMut, Ix3};
use tracing::trace;

use super::color_science::{hsb_to_rgb, rgb_to_hsb, rgb_to_yiq, yiq_to_rgb};
use super::core::COLOR_CHANNELS;
use crate::error::FilterResult;

// ============================================================================
// Negative
// ============================================================================

/// Replace every color sample with `255 - sample`, in place.
///
/// Works on owned images and mutable views alike. Alpha (4th channel) is
/// left untouched. Returns the same image so calls can be chained.
pub fn negative<S>(image: &mut ArrayBase<S, Ix3>) -> &mut ArrayBase<S, Ix3>
where
    S: DataMut<Elem = u8>,
{
    let (height, width, channels) = image.dim();
    trace!(height, width, channels, "negative");

    let color_channels = channels.min(COLOR_CHANNELS);
    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                image[[y, x, c]] = 255 - image[[y, x, c]];
            }
        }
    }
    image
}

/// Invert the luma (Y of YIQ) while keeping chrominance.
pub fn negative_on_luma(input: ArrayView3<u8>) -> FilterResult<Array3<u8>> {
    let mut planes = rgb_to_yiq(input)?;
    planes.y.mapv_inplace(|y| 255.0 - y);
    yiq_to_rgb(&planes)
}

/// Invert the brightness (B of HSB) while keeping hue and saturation.
pub fn negative_on_brightness(input: ArrayView3<u8>) -> FilterResult<Array3<u8>> {
    let mut planes = rgb_to_hsb(input)?;
    planes.brightness.mapv_inplace(|b| 1.0 - b);
    hsb_to_rgb(&planes)
}

// ============================================================================
// Hue / Saturation
// ============================================================================

/// Rotate hue and offset saturation.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `hue_delta` - Degrees added to the hue, wrapped into 0-360
/// * `sat_delta` - Added to the saturation, result clamped to 0.0-1.0
pub fn change_hue_sat(
    input: ArrayView3<u8>,
    hue_delta: f64,
    sat_delta: f64,
) -> FilterResult<Array3<u8>> {
    let mut planes = rgb_to_hsb(input)?;
    planes.hue.mapv_inplace(|h| (h + hue_delta).rem_euclid(360.0));
    planes
        .saturation
        .mapv_inplace(|s| (s + sat_delta).clamp(0.0, 1.0));
    hsb_to_rgb(&planes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::color_science::rgb_to_hsb_pixel;
    use approx::assert_abs_diff_eq;

    fn sample_image() -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((4, 5, 3));
        for y in 0..4 {
            for x in 0..5 {
                img[[y, x, 0]] = (x * 50) as u8;
                img[[y, x, 1]] = (y * 60 + 10) as u8;
                img[[y, x, 2]] = (200 - x * 20 - y * 10) as u8;
            }
        }
        img
    }

    #[test]
    fn test_negative_in_place() {
        let mut img = sample_image();
        let original = img.clone();

        negative(&mut img);

        assert_eq!(img[[0, 0, 0]], 255);
        assert_eq!(img[[3, 4, 2]], 255 - original[[3, 4, 2]]);
        // last row and column are covered too
        assert_eq!(img[[3, 4, 1]], 255 - original[[3, 4, 1]]);
    }

    #[test]
    fn test_negative_twice_is_identity() {
        let mut img = sample_image();
        let original = img.clone();

        negative(negative(&mut img));

        assert_eq!(img, original);
    }

    #[test]
    fn test_negative_preserves_alpha() {
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img[[1, 1, 3]] = 128;

        negative(&mut img);

        assert_eq!(img[[1, 1, 0]], 255);
        assert_eq!(img[[1, 1, 3]], 128);
    }

    #[test]
    fn test_negative_through_mutable_view() {
        let mut img = sample_image();
        let original = img.clone();

        negative(&mut img.slice_mut(ndarray::s![1..3, .., ..]));

        assert_eq!(img[[0, 0, 1]], original[[0, 0, 1]]);
        assert_eq!(img[[1, 0, 1]], 255 - original[[1, 0, 1]]);
        assert_eq!(img[[3, 4, 0]], original[[3, 4, 0]]);
    }

    #[test]
    fn test_negative_on_luma_gray() {
        // I and Q are zero for gray, so only luma flips
        let mut img = Array3::<u8>::zeros((2, 2, 3));
        img.fill(100);

        let result = negative_on_luma(img.view()).unwrap();

        assert!(result.iter().all(|&v| v == 155));
    }

    #[test]
    fn test_negative_on_brightness_gray() {
        let mut img = Array3::<u8>::zeros((2, 2, 3));
        img.fill(51);

        let result = negative_on_brightness(img.view()).unwrap();

        assert!(result.iter().all(|&v| v == 204));
    }

    #[test]
    fn test_negative_on_brightness_keeps_hue() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 200;
        img[[0, 0, 1]] = 100;
        img[[0, 0, 2]] = 50;

        let result = negative_on_brightness(img.view()).unwrap();

        let (h0, s0, _) = rgb_to_hsb_pixel(200, 100, 50);
        let (h1, s1, b1) = rgb_to_hsb_pixel(result[[0, 0, 0]], result[[0, 0, 1]], result[[0, 0, 2]]);
        assert_abs_diff_eq!(h0, h1, epsilon = 2.0);
        assert_abs_diff_eq!(s0, s1, epsilon = 0.05);
        assert_abs_diff_eq!(b1, 1.0 - 200.0 / 255.0, epsilon = 0.01);
    }

    #[test]
    fn test_change_hue_full_turn() {
        let img = sample_image();

        let result = change_hue_sat(img.view(), 360.0, 0.0).unwrap();

        for y in 0..4 {
            for x in 0..5 {
                for c in 0..3 {
                    let diff = img[[y, x, c]] as i32 - result[[y, x, c]] as i32;
                    assert!(diff.abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn test_change_hue_red_to_green() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 255;

        let result = change_hue_sat(img.view(), 120.0, 0.0).unwrap();

        assert_eq!(result[[0, 0, 0]], 0);
        assert_eq!(result[[0, 0, 1]], 255);
        assert_eq!(result[[0, 0, 2]], 0);
    }

    #[test]
    fn test_change_hue_negative_delta_wraps() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 255;

        let result = change_hue_sat(img.view(), -120.0, 0.0).unwrap();

        assert_eq!(result[[0, 0, 2]], 255);
        assert_eq!(result[[0, 0, 0]], 0);
    }

    #[test]
    fn test_change_saturation_clamps() {
        let mut img = Array3::<u8>::zeros((1, 2, 3));
        img[[0, 0, 0]] = 200;
        img[[0, 0, 1]] = 100;
        img[[0, 0, 2]] = 100;
        img[[0, 1, 0]] = 255;

        let desaturated = change_hue_sat(img.view(), 0.0, -5.0).unwrap();
        assert_eq!(desaturated[[0, 0, 0]], 200);
        assert_eq!(desaturated[[0, 0, 1]], 200);
        assert_eq!(desaturated[[0, 0, 2]], 200);

        let saturated = change_hue_sat(img.view(), 0.0, 5.0).unwrap();
        assert_eq!(saturated[[0, 0, 0]], 200);
        assert_eq!(saturated[[0, 0, 1]], 0);
        assert_eq!(saturated[[0, 1, 0]], 255);
    }
}
