//! pixelops
//!
//! Pixel-level image transforms and spatial filters on in-memory 8-bit
//! images, with optional Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Image Format
//! Images are `ndarray` arrays shaped (height, width, channels):
//! - **RGB**: (height, width, 3) - required by the color transforms
//! - **RGBA**: (height, width, 4) - alpha is carried through color transforms
//! - **Any channel count** - accepted by the median and correlation filters
//!
//! ## Operations
//! - Color space round trips: RGB <-> YIQ, RGB <-> HSB
//! - Derived edits: negative, negative on luma, negative on brightness,
//!   hue and saturation shift
//! - Window operators: median, padded correlation, strided correlation
//! - Filter banks: kernels parsed from text and chained
//! - Histogram expansion
//!
//! ## Example
//! ```
//! use ndarray::Array3;
//! use pixelops::filters::bank::{FilterBank, FilterBankOptions};
//!
//! let image = Array3::<u8>::from_elem((8, 8, 3), 255);
//! let bank = FilterBank::parse(
//!     "0, 0\n1/9 1/9 1/9\n1/9 1/9 1/9\n1/9 1/9 1/9\n",
//!     FilterBankOptions::classic(),
//! )?;
//! let blurred = bank.apply(image.view())?;
//! assert_eq!(blurred[[4, 4, 0]], 255);
//! # Ok::<(), pixelops::FilterError>(())
//! ```

mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, FilterResult};
pub use filters::bank::{apply_filter_bank, FilterBank, FilterBankOptions, PostProcess};
pub use filters::color_adjust::{change_hue_sat, negative, negative_on_brightness, negative_on_luma};
pub use filters::color_science::{hsb_to_rgb, rgb_to_hsb, rgb_to_yiq, yiq_to_rgb, HsbPlanes, YiqPlanes};
pub use filters::correlation::{correlate_padded, correlate_strided, StrideIndexing};
pub use filters::kernel::{parse_filter_bank, Coefficient, FilterStage, Grammar, Kernel};
pub use filters::levels::histogram_expand;
pub use filters::noise::median_filter;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{
        IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3, PyReadwriteArray3,
    };
    use pyo3::exceptions::{PyIOError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::bank::{FilterBank, FilterBankOptions, PostProcess};
    use crate::filters::color_science::{HsbPlanes, YiqPlanes};
    use crate::filters::correlation::StrideIndexing;
    use crate::filters::kernel::{Grammar, Kernel};
    use crate::filters::{color_adjust, color_science, correlation, levels, noise};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::Io(_) => PyIOError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    type Planes<'py> = (
        Bound<'py, PyArray2<f64>>,
        Bound<'py, PyArray2<f64>>,
        Bound<'py, PyArray2<f64>>,
    );

    fn kernel_from(weights: PyReadonlyArray2<'_, f64>) -> PyResult<Kernel> {
        Ok(Kernel::new(weights.as_array().to_owned())?)
    }

    fn indexing_from(legacy: bool) -> StrideIndexing {
        if legacy {
            StrideIndexing::Legacy
        } else {
            StrideIndexing::Aligned
        }
    }

    // ========================================================================
    // Color Space Conversions
    // ========================================================================

    /// Split an RGB image into Y, I and Q float planes.
    #[pyfunction]
    pub fn rgb_to_yiq<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Planes<'py>> {
        let planes = color_science::rgb_to_yiq(image.as_array())?;
        Ok((
            planes.y.into_pyarray(py),
            planes.i.into_pyarray(py),
            planes.q.into_pyarray(py),
        ))
    }

    /// Rebuild an RGB image from Y, I and Q planes.
    #[pyfunction]
    pub fn yiq_to_rgb<'py>(
        py: Python<'py>,
        y: PyReadonlyArray2<'py, f64>,
        i: PyReadonlyArray2<'py, f64>,
        q: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let planes = YiqPlanes {
            y: y.as_array().to_owned(),
            i: i.as_array().to_owned(),
            q: q.as_array().to_owned(),
            alpha: None,
        };
        Ok(color_science::yiq_to_rgb(&planes)?.into_pyarray(py))
    }

    /// Split an RGB image into hue (degrees), saturation and brightness planes.
    #[pyfunction]
    pub fn rgb_to_hsb<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Planes<'py>> {
        let planes = color_science::rgb_to_hsb(image.as_array())?;
        Ok((
            planes.hue.into_pyarray(py),
            planes.saturation.into_pyarray(py),
            planes.brightness.into_pyarray(py),
        ))
    }

    /// Rebuild an RGB image from hue, saturation and brightness planes.
    #[pyfunction]
    pub fn hsb_to_rgb<'py>(
        py: Python<'py>,
        hue: PyReadonlyArray2<'py, f64>,
        saturation: PyReadonlyArray2<'py, f64>,
        brightness: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let planes = HsbPlanes {
            hue: hue.as_array().to_owned(),
            saturation: saturation.as_array().to_owned(),
            brightness: brightness.as_array().to_owned(),
            alpha: None,
        };
        Ok(color_science::hsb_to_rgb(&planes)?.into_pyarray(py))
    }

    // ========================================================================
    // Color Adjustments
    // ========================================================================

    /// Invert R, G and B of the given array in place.
    #[pyfunction]
    pub fn negative<'py>(mut image: PyReadwriteArray3<'py, u8>) {
        color_adjust::negative(&mut image.as_array_mut());
    }

    #[pyfunction]
    pub fn negative_on_luma<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(color_adjust::negative_on_luma(image.as_array())?.into_pyarray(py))
    }

    #[pyfunction]
    pub fn negative_on_brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(color_adjust::negative_on_brightness(image.as_array())?.into_pyarray(py))
    }

    /// Rotate hue by `hue_delta` degrees and offset saturation by `sat_delta`.
    #[pyfunction]
    #[pyo3(signature = (image, hue_delta, sat_delta=0.0))]
    pub fn change_hue_sat<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        hue_delta: f64,
        sat_delta: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(color_adjust::change_hue_sat(image.as_array(), hue_delta, sat_delta)?.into_pyarray(py))
    }

    // ========================================================================
    // Window Operators
    // ========================================================================

    #[pyfunction]
    pub fn median_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        rows: usize,
        cols: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(noise::median_filter(image.as_array(), rows, cols)?.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, kernel, offset=(0, 0)))]
    pub fn correlate_padded<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: PyReadonlyArray2<'py, f64>,
        offset: (isize, isize),
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = kernel_from(kernel)?;
        Ok(correlation::correlate_padded(image.as_array(), &kernel, offset)?.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, kernel, offset=(0, 0), stride=0, legacy_indexing=false))]
    pub fn correlate_strided<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: PyReadonlyArray2<'py, f64>,
        offset: (isize, isize),
        stride: usize,
        legacy_indexing: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = kernel_from(kernel)?;
        let result = correlation::correlate_strided(
            image.as_array(),
            &kernel,
            offset,
            stride,
            indexing_from(legacy_indexing),
        )?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn histogram_expand<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(levels::histogram_expand(image.as_array())?.into_pyarray(py))
    }

    // ========================================================================
    // Filter Banks
    // ========================================================================

    /// Parse filter-bank text and apply it to `image`.
    #[pyfunction]
    #[pyo3(signature = (image, text, extended=false, legacy_indexing=false, expand=false))]
    pub fn apply_filter_bank<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        text: &str,
        extended: bool,
        legacy_indexing: bool,
        expand: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let options = FilterBankOptions {
            grammar: if extended { Grammar::Extended } else { Grammar::Classic },
            indexing: indexing_from(legacy_indexing),
            post_process: if expand { PostProcess::HistogramExpand } else { PostProcess::None },
        };
        let bank = FilterBank::parse(text, options)?;
        Ok(bank.apply(image.as_array())?.into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn pixelops(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Color space conversions
        m.add_function(wrap_pyfunction!(rgb_to_yiq, m)?)?;
        m.add_function(wrap_pyfunction!(yiq_to_rgb, m)?)?;
        m.add_function(wrap_pyfunction!(rgb_to_hsb, m)?)?;
        m.add_function(wrap_pyfunction!(hsb_to_rgb, m)?)?;

        // Color adjustments
        m.add_function(wrap_pyfunction!(negative, m)?)?;
        m.add_function(wrap_pyfunction!(negative_on_luma, m)?)?;
        m.add_function(wrap_pyfunction!(negative_on_brightness, m)?)?;
        m.add_function(wrap_pyfunction!(change_hue_sat, m)?)?;

        // Window operators
        m.add_function(wrap_pyfunction!(median_filter, m)?)?;
        m.add_function(wrap_pyfunction!(correlate_padded, m)?)?;
        m.add_function(wrap_pyfunction!(correlate_strided, m)?)?;
        m.add_function(wrap_pyfunction!(histogram_expand, m)?)?;

        // Filter banks
        m.add_function(wrap_pyfunction!(apply_filter_bank, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixelops;
