//! Viewport layout for the garden scene's DOM elements
//!
//! The sun sits near the top, capped in width; the flower is anchored to
//! the bottom and shrunk to fit the space left below the sun. Both keep
//! the aspect ratio of their source image. Layout is recomputed
//! synchronously on resize and when an image finishes loading.

use glam::Vec2;

use crate::consts::*;
use crate::fit::FitRect;
use crate::lerp;

/// Intrinsic image size, substituting a default while the image loads
#[inline]
pub fn natural_or_default(natural_w: f32, natural_h: f32) -> Vec2 {
    if natural_w >= 1.0 && natural_h >= 1.0 {
        Vec2::new(natural_w, natural_h)
    } else {
        Vec2::splat(DEFAULT_NATURAL_SIZE)
    }
}

/// Place the sun: centered horizontally, near the top, width-capped
pub fn sun_box(viewport: Vec2, natural: Vec2) -> FitRect {
    let w = (viewport.x * SUN_WIDTH_FRAC).min(SUN_MAX_WIDTH);
    let h = w * (natural.y / natural.x);
    FitRect {
        x: (viewport.x - w) / 2.0,
        y: viewport.y * SUN_TOP_FRAC,
        w,
        h,
    }
}

/// Place the flower: bottom-anchored, centered, shrunk to the space
/// remaining below the sun
pub fn flower_box(viewport: Vec2, natural: Vec2, sun: &FitRect) -> FitRect {
    let mut w = viewport.x * FLOWER_WIDTH_FRAC;
    let mut h = w * (natural.y / natural.x.max(1.0));

    let max_h = viewport.y - sun.y - sun.h - FLOWER_MARGIN - FLOWER_RESERVE;
    if h > max_h {
        h = max_h;
        w = h * (natural.x / natural.y.max(1.0));
    }

    FitRect {
        x: (viewport.x - w) / 2.0,
        y: viewport.y - h - FLOWER_MARGIN,
        w,
        h,
    }
}

/// Sun x position for the current tilt progress: sweeps the full viewport
/// width, flush left at 0 and flush right at 1
#[inline]
pub fn sun_x(viewport_w: f32, sun_w: f32, t: f32) -> f32 {
    lerp(0.0, viewport_w - sun_w, t)
}
