//! WebAssembly exports for pixelops filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images travel as flat row-major byte buffers of
//! `width * height * channels` samples (3 for RGB, 4 for canvas RGBA).
//! Results come back in the same layout. Filter banks may shrink the image,
//! so they return a [`FilteredImage`] carrying the output dimensions.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::bank::{FilterBank, FilterBankOptions, PostProcess};
use crate::filters::color_adjust::{change_hue_sat, negative, negative_on_brightness, negative_on_luma};
use crate::filters::correlation::StrideIndexing;
use crate::filters::kernel::Grammar;
use crate::filters::levels::histogram_expand;
use crate::filters::noise::median_filter;

fn to_image(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Array3<u8>, JsError> {
    Array3::from_shape_vec((height, width, channels), data.to_vec()).map_err(|_| {
        FilterError::ShapeMismatch(format!(
            "buffer of {} bytes is not {width}x{height}x{channels}",
            data.len()
        ))
        .into()
    })
}

fn to_buffer(image: Array3<u8>) -> Vec<u8> {
    image.into_raw_vec_and_offset().0
}

/// Filter output together with its dimensions.
#[wasm_bindgen]
pub struct FilteredImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

#[wasm_bindgen]
impl FilteredImage {
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.channels
    }
}

impl From<Array3<u8>> for FilteredImage {
    fn from(image: Array3<u8>) -> Self {
        let (height, width, channels) = image.dim();
        Self {
            data: to_buffer(image),
            width,
            height,
            channels,
        }
    }
}

// ============================================================================
// Color Adjustments
// ============================================================================

/// Invert R, G and B.
#[wasm_bindgen]
pub fn negative_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let mut image = to_image(data, width, height, channels)?;
    negative(&mut image);
    Ok(to_buffer(image))
}

/// Invert the YIQ luma.
#[wasm_bindgen]
pub fn negative_on_luma_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let image = to_image(data, width, height, channels)?;
    Ok(to_buffer(negative_on_luma(image.view())?))
}

/// Invert the HSB brightness.
#[wasm_bindgen]
pub fn negative_on_brightness_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let image = to_image(data, width, height, channels)?;
    Ok(to_buffer(negative_on_brightness(image.view())?))
}

/// Rotate hue by `hue_delta` degrees and offset saturation by `sat_delta`.
#[wasm_bindgen]
pub fn change_hue_sat_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    hue_delta: f64,
    sat_delta: f64,
) -> Result<Vec<u8>, JsError> {
    let image = to_image(data, width, height, channels)?;
    Ok(to_buffer(change_hue_sat(image.view(), hue_delta, sat_delta)?))
}

// ============================================================================
// Window Operators
// ============================================================================

/// Median filter with an odd `rows` x `cols` window.
#[wasm_bindgen]
pub fn median_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    rows: usize,
    cols: usize,
) -> Result<Vec<u8>, JsError> {
    let image = to_image(data, width, height, channels)?;
    Ok(to_buffer(median_filter(image.view(), rows, cols)?))
}

/// Linear stretch of the pooled sample range onto 0-255.
#[wasm_bindgen]
pub fn histogram_expand_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let image = to_image(data, width, height, channels)?;
    Ok(to_buffer(histogram_expand(image.view())?))
}

/// Parse filter-bank text and apply it. Strided banks return a smaller image.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn apply_filter_bank_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    text: &str,
    extended: bool,
    legacy_indexing: bool,
    expand: bool,
) -> Result<FilteredImage, JsError> {
    let image = to_image(data, width, height, channels)?;
    let options = FilterBankOptions {
        grammar: if extended { Grammar::Extended } else { Grammar::Classic },
        indexing: if legacy_indexing {
            StrideIndexing::Legacy
        } else {
            StrideIndexing::Aligned
        },
        post_process: if expand { PostProcess::HistogramExpand } else { PostProcess::None },
    };
    let bank = FilterBank::parse(text, options)?;
    Ok(bank.apply(image.view())?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_bank_reports_shrunk_dimensions() {
        let data = vec![10u8; 12 * 12 * 3];
        // 3x3 with stride 1
        let text = "2\n0, 0\n1 1 1\n1 1 1\n1 1 1\n";

        let result = apply_filter_bank_wasm(&data, 12, 12, 3, text, true, false, false)
            .unwrap_or_else(|_| panic!("filter bank failed"));

        assert_eq!(result.height(), 4);
        assert_eq!(result.width(), 4);
        assert_eq!(result.channels(), 3);
        assert_eq!(result.data().len(), 4 * 4 * 3);
        assert!(result.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_filter_bank_classic_keeps_dimensions() {
        let data = vec![0u8; 5 * 7 * 4];
        let text = "0, 0\n1 1 1\n";

        let result = apply_filter_bank_wasm(&data, 7, 5, 4, text, false, false, false)
            .unwrap_or_else(|_| panic!("filter bank failed"));

        assert_eq!((result.height(), result.width(), result.channels()), (5, 7, 4));
    }
}
