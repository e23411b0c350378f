// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts pointer positions into normalized progress values
//! and maps them to the preview panel's horizontal offset.

/// Horizontal pointer position across a row, normalized to 0.0..=1.0.
///
/// A row without width reports the centre.
pub fn horizontal_progress(pointer_x: f32, row_left: f32, row_width: f32) -> f32 {
    if row_width.is_nan() || row_width <= 0.0 {
        return 0.5;
    }
    let ratio = (pointer_x - row_left) / row_width;
    if !ratio.is_finite() {
        return 0.5;
    }
    ratio.clamp(0.0, 1.0)
}

/// Preview panel offset as a percentage of its own width.
///
/// The panel rests 85% to the left and drifts 5% either way with the cursor.
pub fn preview_offset_percent(progress: f32) -> f32 {
    -85.0 + (progress.clamp(0.0, 1.0) - 0.5) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_inside_row() {
        assert!((horizontal_progress(960.0, 0.0, 1920.0) - 0.5).abs() < 0.0001);
        assert_eq!(horizontal_progress(100.0, 100.0, 200.0), 0.0);
        assert_eq!(horizontal_progress(300.0, 100.0, 200.0), 1.0);
    }

    #[test]
    fn test_progress_clamps_and_handles_degenerate_rows() {
        assert_eq!(horizontal_progress(-50.0, 0.0, 100.0), 0.0);
        assert_eq!(horizontal_progress(150.0, 0.0, 100.0), 1.0);
        assert_eq!(horizontal_progress(10.0, 0.0, 0.0), 0.5);
        assert_eq!(horizontal_progress(f32::NAN, 0.0, 100.0), 0.5);
    }

    #[test]
    fn test_progress_with_non_finite_row_edge() {
        assert_eq!(horizontal_progress(10.0, f32::NAN, 100.0), 0.5);
        assert_eq!(horizontal_progress(10.0, f32::INFINITY, 100.0), 0.5);
        assert_eq!(horizontal_progress(f32::INFINITY, 0.0, 100.0), 0.5);
    }

    #[test]
    fn test_preview_offset_range() {
        assert_eq!(preview_offset_percent(0.5), -85.0);
        assert_eq!(preview_offset_percent(0.0), -90.0);
        assert_eq!(preview_offset_percent(1.0), -80.0);
    }
}
