//! Filter modules for pixel transforms and window operators.
//!
//! ## Supported Formats
//!
//! All filters take `ArrayView3<u8>` images shaped (height, width, channels):
//!
//! | Format | Shape | Color transforms | Window operators |
//! |--------|-------|------------------|------------------|
//! | Grayscale8 | (H, W, 1) | rejected (direct negative only) | yes |
//! | RGB8 | (H, W, 3) | yes | yes |
//! | RGBA8 | (H, W, 4) | yes, alpha preserved | yes, alpha filtered like any channel |
//!
//! ## Architecture
//!
//! - **Pure** - every filter returns a new image, except [`color_adjust::negative`]
//!   which edits the caller's image in place
//! - **Saturating** - results are clamped into 0-255, never wrapped
//! - **Validated up front** - kernel geometry is checked before any pixel work
//!
//! ## Filter Categories
//!
//! - **Color science**: RGB <-> YIQ, RGB <-> HSB
//! - **Color adjust**: negative, negative on luma / brightness, hue and saturation
//! - **Noise**: median
//! - **Correlation**: padded and strided kernels, filter banks
//! - **Tonal**: histogram expansion

pub mod bank;
pub mod color_adjust;
pub mod color_science;
pub mod core;
pub mod correlation;
pub mod kernel;
pub mod levels;
pub mod noise;
