//! Shared test utilities for the himawari-wallpaper workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Font lookup and a skip macro for font-dependent tests
//! - Synthetic tile and image generators
//! - Common test fixtures (tile palettes, clock readings)
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_font, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if no TrueType font can be found.
///
/// Label rendering needs a real font file. CI images without fonts can set
/// `TEST_FONT` to point at one.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_font;
///
/// #[test]
/// fn test_label() {
///     let font_path = require_font!();
///     // Test code using font_path...
/// }
/// ```
///
/// If no font is found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: No TrueType font found. Set TEST_FONT to a .ttf file.");
                return;
            }
        }
    }};
}

/// Assert two float channel values agree within `epsilon`.
///
/// Grading works on `f32` channels in `[0, 255]`; this keeps tolerance
/// checks on those values to one line.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(renderer::grading::levels(255.0, 1.3), 255.0, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let (actual, expected, epsilon) = ($actual as f64, $expected as f64, $epsilon as f64);
        if (actual - expected).abs() > epsilon {
            panic!(
                "channel value {} not within {} of {}",
                actual, epsilon, expected
            );
        }
    }};
}

/// Macro asserting that two 8-bit colors differ by at most `tolerance` per channel.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_color_near;
///
/// assert_color_near!([10, 20, 30], [11, 20, 29], 1);
/// ```
#[macro_export]
macro_rules! assert_color_near {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left: [u8; 3] = $left;
        let right: [u8; 3] = $right;
        let tolerance: i16 = $tolerance as i16;
        for i in 0..3 {
            let diff = (left[i] as i16 - right[i] as i16).abs();
            if diff > tolerance {
                panic!(
                    "assertion failed: colors differ\n  left: `{:?}`,\n right: `{:?}`,\n  channel {} diff {} > tolerance {}",
                    left, right, i, diff, tolerance
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_color_near_passes() {
        assert_color_near!([10, 20, 30], [11, 20, 29], 1);
    }

    #[test]
    #[should_panic(expected = "colors differ")]
    fn test_assert_color_near_fails() {
        assert_color_near!([10, 20, 30], [10, 25, 30], 2);
    }
}
