//! Fit-mode placement of an image inside a target canvas
//!
//! Three policies:
//! - stretch: fill the canvas, aspect ratio may distort
//! - contain: largest aspect-preserving rect that fits inside, centered
//! - cover: smallest aspect-preserving rect that covers the canvas, centered

use serde::{Deserialize, Serialize};

/// Placement policy for mapping an image onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FitMode {
    /// Fill the canvas, ignoring aspect ratio
    Stretch,
    /// Fit entirely inside the canvas, letterboxing as needed
    Contain,
    /// Fill the canvas, cropping whatever overflows
    #[default]
    Cover,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Stretch => "stretch",
            FitMode::Contain => "contain",
            FitMode::Cover => "cover",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stretch" => Some(FitMode::Stretch),
            "contain" | "fit" => Some(FitMode::Contain),
            "cover" | "fill" => Some(FitMode::Cover),
            _ => None,
        }
    }
}

/// Draw rectangle produced by [`fit_rect`], in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FitRect {
    /// Aspect ratio (width over height)
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.w / self.h
    }
}

/// Compute the draw rectangle for an image of intrinsic size
/// `image_w` x `image_h` on a canvas of `canvas_w` x `canvas_h`.
///
/// Pure and idempotent; callers skip the draw entirely while the image
/// has no intrinsic size yet (still loading).
pub fn fit_rect(image_w: f32, image_h: f32, canvas_w: f32, canvas_h: f32, mode: FitMode) -> FitRect {
    if mode == FitMode::Stretch {
        return FitRect {
            x: 0.0,
            y: 0.0,
            w: canvas_w,
            h: canvas_h,
        };
    }

    let sx = canvas_w / image_w;
    let sy = canvas_h / image_h;
    let scale = match mode {
        FitMode::Contain => sx.min(sy),
        FitMode::Cover => sx.max(sy),
        FitMode::Stretch => unreachable!(),
    };

    let w = image_w * scale;
    let h = image_h * scale;
    FitRect {
        x: (canvas_w - w) / 2.0,
        y: (canvas_h - h) / 2.0,
        w,
        h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_stretch_fills_canvas() {
        let r = fit_rect(320.0, 240.0, 400.0, 800.0, FitMode::Stretch);
        assert_eq!(r, FitRect { x: 0.0, y: 0.0, w: 400.0, h: 800.0 });
    }

    #[test]
    fn test_contain_fits_and_preserves_aspect() {
        // Wide image on a tall canvas: width-limited
        let r = fit_rect(640.0, 480.0, 400.0, 800.0, FitMode::Contain);
        assert!((r.w - 400.0).abs() < EPS);
        assert!((r.h - 300.0).abs() < EPS);
        assert!((r.x - 0.0).abs() < EPS);
        assert!((r.y - 250.0).abs() < EPS);
        assert!((r.aspect() - 640.0 / 480.0).abs() < EPS);
    }

    #[test]
    fn test_cover_fills_and_preserves_aspect() {
        // Wide image on a tall canvas: height-limited, crops left/right
        let r = fit_rect(640.0, 480.0, 400.0, 800.0, FitMode::Cover);
        assert!((r.h - 800.0).abs() < EPS);
        assert!((r.w - 800.0 * (640.0 / 480.0)).abs() < EPS);
        assert!(r.x < 0.0);
        assert!((r.y - 0.0).abs() < EPS);
        assert!((r.aspect() - 640.0 / 480.0).abs() < EPS);
    }

    #[test]
    fn test_square_image_square_canvas() {
        // All three modes agree when aspect ratios match
        for mode in [FitMode::Stretch, FitMode::Contain, FitMode::Cover] {
            let r = fit_rect(100.0, 100.0, 500.0, 500.0, mode);
            assert!((r.x).abs() < EPS && (r.y).abs() < EPS);
            assert!((r.w - 500.0).abs() < EPS && (r.h - 500.0).abs() < EPS);
        }
    }

    #[test]
    fn test_idempotent() {
        let a = fit_rect(123.0, 456.0, 1024.0, 768.0, FitMode::Cover);
        let b = fit_rect(123.0, 456.0, 1024.0, 768.0, FitMode::Cover);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mode_round_trip() {
        for mode in [FitMode::Stretch, FitMode::Contain, FitMode::Cover] {
            assert_eq!(FitMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(FitMode::from_str("COVER"), Some(FitMode::Cover));
        assert_eq!(FitMode::from_str("tile"), None);
    }

    proptest! {
        #[test]
        fn prop_contain_inside_canvas(
            iw in 1.0f32..4096.0,
            ih in 1.0f32..4096.0,
            cw in 1.0f32..4096.0,
            ch in 1.0f32..4096.0,
        ) {
            let r = fit_rect(iw, ih, cw, ch, FitMode::Contain);
            let tol = cw.max(ch) * 1e-4;
            prop_assert!(r.x >= -tol && r.y >= -tol);
            prop_assert!(r.x + r.w <= cw + tol);
            prop_assert!(r.y + r.h <= ch + tol);
            // Aspect preserved (relative tolerance)
            prop_assert!((r.aspect() - iw / ih).abs() <= (iw / ih) * 1e-3);
        }

        #[test]
        fn prop_cover_covers_canvas(
            iw in 1.0f32..4096.0,
            ih in 1.0f32..4096.0,
            cw in 1.0f32..4096.0,
            ch in 1.0f32..4096.0,
        ) {
            let r = fit_rect(iw, ih, cw, ch, FitMode::Cover);
            let tol = cw.max(ch) * 1e-4;
            prop_assert!(r.w >= cw - tol && r.h >= ch - tol);
            prop_assert!(r.x <= tol && r.y <= tol);
            prop_assert!(r.x + r.w >= cw - tol);
            prop_assert!(r.y + r.h >= ch - tol);
            prop_assert!((r.aspect() - iw / ih).abs() <= (iw / ih) * 1e-3);
        }

        #[test]
        fn prop_contain_touches_one_axis(
            iw in 1.0f32..4096.0,
            ih in 1.0f32..4096.0,
            cw in 1.0f32..4096.0,
            ch in 1.0f32..4096.0,
        ) {
            let r = fit_rect(iw, ih, cw, ch, FitMode::Contain);
            let tol = cw.max(ch) * 1e-3;
            prop_assert!((r.w - cw).abs() <= tol || (r.h - ch).abs() <= tol);
        }
    }
}
