//! Color space conversions: RGB <-> YIQ and RGB <-> HSB.
//!
//! Forward transforms split an image into three `f64` planes, inverse
//! transforms rebuild an 8-bit image from them. Forward planes are never
//! clamped; the inverse rounds to the nearest integer and clamps into
//! 0-255, so out-of-range edits saturate instead of failing.
//!
//! ## Supported Formats
//!
//! - **Grayscale (1 channel)**: rejected, the transforms need R, G and B
//! - **RGB (3 channels)**: full conversion
//! - **RGBA (4 channels)**: RGB converted, alpha carried through the planes

use ndarray::{Array2, Array3, ArrayView3};
use tracing::trace;

use super::core::{alpha_plane, require_rgb, rgb_output, round_to_u8};
use crate::error::{FilterError, FilterResult};

// ============================================================================
// Pixel Conversions
// ============================================================================

/// Convert one RGB sample triple to YIQ.
///
/// Components are left unclamped: I and Q are signed, Y spans 0-255.
#[inline]
pub fn rgb_to_yiq_pixel(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let i = 0.596 * r - 0.274 * g - 0.322 * b;
    let q = 0.211 * r - 0.523 * g + 0.312 * b;
    (y, i, q)
}

/// Convert one YIQ triple back to RGB, rounding and clamping each channel.
#[inline]
pub fn yiq_to_rgb_pixel(y: f64, i: f64, q: f64) -> [u8; 3] {
    let r = y + 0.956 * i + 0.621 * q;
    let g = y - 0.272 * i - 0.647 * q;
    let b = y - 1.106 * i + 1.703 * q;
    [round_to_u8(r), round_to_u8(g), round_to_u8(b)]
}

/// Convert one RGB sample triple to HSB.
///
/// Output: `(h, s, b)` with `h` in 0.0-360.0, `s` and `b` in 0.0-1.0.
/// When red is the maximum, `green >= blue` is tested first, so a red/green
/// tie resolves to 60 degrees and a red/blue tie to 300 degrees.
#[inline]
pub fn rgb_to_hsb_pixel(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if max == min {
        0.0
    } else if max == r && g >= b {
        60.0 * (g - b) / delta
    } else if max == r {
        60.0 * (g - b) / delta + 360.0
    } else if max == g {
        60.0 * (b - r) / delta + 120.0
    } else {
        60.0 * (r - g) / delta + 240.0
    };

    let saturation = if max == 0.0 { 0.0 } else { 1.0 - min / max };

    (hue, saturation, max)
}

/// Convert one HSB triple back to RGB.
///
/// Input: `h` in degrees, `s` and `b` in 0.0-1.0. Zero saturation is
/// achromatic and skips the sector table.
#[inline]
pub fn hsb_to_rgb_pixel(h: f64, s: f64, v: f64) -> [u8; 3] {
    if s == 0.0 {
        let gray = round_to_u8(v * 255.0);
        return [gray, gray, gray];
    }

    let sector_pos = h / 60.0;
    let floor = sector_pos.floor();
    let f = sector_pos - floor;
    let sector = (floor as i64).rem_euclid(6);

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [round_to_u8(r * 255.0), round_to_u8(g * 255.0), round_to_u8(b * 255.0)]
}

// ============================================================================
// Plane Conversions
// ============================================================================

/// Y, I and Q planes of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct YiqPlanes {
    pub y: Array2<f64>,
    pub i: Array2<f64>,
    pub q: Array2<f64>,
    /// Alpha of an RGBA source, restored by [`yiq_to_rgb`].
    pub alpha: Option<Array2<u8>>,
}

/// Hue, saturation and brightness planes of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct HsbPlanes {
    /// Degrees, 0.0-360.0.
    pub hue: Array2<f64>,
    /// 0.0-1.0.
    pub saturation: Array2<f64>,
    /// 0.0-1.0.
    pub brightness: Array2<f64>,
    /// Alpha of an RGBA source, restored by [`hsb_to_rgb`].
    pub alpha: Option<Array2<u8>>,
}

fn check_planes(
    planes: [&Array2<f64>; 3],
    alpha: Option<&Array2<u8>>,
) -> FilterResult<(usize, usize)> {
    let dim = planes[0].dim();
    if planes.iter().any(|p| p.dim() != dim) {
        return Err(FilterError::ShapeMismatch(format!(
            "channel planes differ: {:?}, {:?}, {:?}",
            planes[0].dim(),
            planes[1].dim(),
            planes[2].dim()
        )));
    }
    if let Some(a) = alpha {
        if a.dim() != dim {
            return Err(FilterError::ShapeMismatch(format!(
                "alpha plane {:?} does not match {:?}",
                a.dim(),
                dim
            )));
        }
    }
    Ok(dim)
}

/// Split an RGB(A) image into Y, I and Q planes.
pub fn rgb_to_yiq(input: ArrayView3<u8>) -> FilterResult<YiqPlanes> {
    require_rgb(&input)?;
    let (height, width, _) = input.dim();
    trace!(height, width, "rgb_to_yiq");

    let mut y_plane = Array2::<f64>::zeros((height, width));
    let mut i_plane = Array2::<f64>::zeros((height, width));
    let mut q_plane = Array2::<f64>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let (yv, iv, qv) = rgb_to_yiq_pixel(
                input[[y, x, 0]] as f64,
                input[[y, x, 1]] as f64,
                input[[y, x, 2]] as f64,
            );
            y_plane[[y, x]] = yv;
            i_plane[[y, x]] = iv;
            q_plane[[y, x]] = qv;
        }
    }

    Ok(YiqPlanes {
        y: y_plane,
        i: i_plane,
        q: q_plane,
        alpha: alpha_plane(&input),
    })
}

/// Rebuild an 8-bit image from Y, I and Q planes.
pub fn yiq_to_rgb(planes: &YiqPlanes) -> FilterResult<Array3<u8>> {
    let (height, width) = check_planes([&planes.y, &planes.i, &planes.q], planes.alpha.as_ref())?;
    trace!(height, width, "yiq_to_rgb");

    let mut output = rgb_output(height, width, planes.alpha.as_ref());
    for y in 0..height {
        for x in 0..width {
            let rgb = yiq_to_rgb_pixel(planes.y[[y, x]], planes.i[[y, x]], planes.q[[y, x]]);
            for (c, v) in rgb.into_iter().enumerate() {
                output[[y, x, c]] = v;
            }
        }
    }
    Ok(output)
}

/// Split an RGB(A) image into hue, saturation and brightness planes.
pub fn rgb_to_hsb(input: ArrayView3<u8>) -> FilterResult<HsbPlanes> {
    require_rgb(&input)?;
    let (height, width, _) = input.dim();
    trace!(height, width, "rgb_to_hsb");

    let mut hue = Array2::<f64>::zeros((height, width));
    let mut saturation = Array2::<f64>::zeros((height, width));
    let mut brightness = Array2::<f64>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let (h, s, v) =
                rgb_to_hsb_pixel(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            hue[[y, x]] = h;
            saturation[[y, x]] = s;
            brightness[[y, x]] = v;
        }
    }

    Ok(HsbPlanes {
        hue,
        saturation,
        brightness,
        alpha: alpha_plane(&input),
    })
}

/// Rebuild an 8-bit image from hue, saturation and brightness planes.
pub fn hsb_to_rgb(planes: &HsbPlanes) -> FilterResult<Array3<u8>> {
    let (height, width) = check_planes(
        [&planes.hue, &planes.saturation, &planes.brightness],
        planes.alpha.as_ref(),
    )?;
    trace!(height, width, "hsb_to_rgb");

    let mut output = rgb_output(height, width, planes.alpha.as_ref());
    for y in 0..height {
        for x in 0..width {
            let rgb = hsb_to_rgb_pixel(
                planes.hue[[y, x]],
                planes.saturation[[y, x]],
                planes.brightness[[y, x]],
            );
            for (c, v) in rgb.into_iter().enumerate() {
                output[[y, x, c]] = v;
            }
        }
    }
    Ok(output)
}
