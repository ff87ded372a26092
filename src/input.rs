//! Tilt input sources and tilt-to-progress mapping
//!
//! A tilt sample is degrees in [-45, 45]. Three providers are tried in
//! priority order and the first with a value wins:
//! 1. orientation: `deviceorientation` gamma
//! 2. rotation: runtime-supplied rotation fallback
//! 3. pointer: pointer/touch x position, already normalized to [0, 1]
//!
//! With no provider active the sample is 0 degrees (progress 0.5).

use crate::consts::TILT_RANGE_DEG;
use crate::map_range;

/// Which provider produced a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltSource {
    /// Device orientation sensor (gamma axis)
    Orientation,
    /// Rotation fallback reported by the host runtime
    Rotation,
    /// Pointer or touch x position
    Pointer,
    /// No provider active; resting sample
    Idle,
}

/// A single tilt reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSample {
    /// Tilt in degrees, clamped to ±[`TILT_RANGE_DEG`]
    pub degrees: f32,
    pub source: TiltSource,
}

impl TiltSample {
    /// Normalized progress in [0, 1]; -45° maps to 0, +45° to 1
    pub fn progress(&self) -> f32 {
        progress_from_degrees(self.degrees)
    }
}

/// Map tilt degrees to normalized progress
#[inline]
pub fn progress_from_degrees(degrees: f32) -> f32 {
    map_range(degrees, -TILT_RANGE_DEG, TILT_RANGE_DEG, 0.0, 1.0).clamp(0.0, 1.0)
}

/// Latest readings from each input provider
///
/// Event listeners write the fields; the frame loop reads one snapshot per
/// frame via [`TiltState::sample`]. Single writer per event, single reader
/// per frame, all on one thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltState {
    /// Last `deviceorientation` gamma in degrees, if any has arrived
    pub gamma: Option<f32>,
    /// Rotation fallback in degrees, if the runtime provides one
    pub rotation: Option<f32>,
    /// Pointer x normalized to [0, 1], while a pointer/touch is down
    pub pointer: Option<f32>,
}

impl TiltState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the current tilt sample from the highest-priority live provider
    pub fn sample(&self) -> TiltSample {
        self.orientation()
            .or_else(|| self.rotation_fallback())
            .or_else(|| self.pointer_fallback())
            .unwrap_or(TiltSample {
                degrees: 0.0,
                source: TiltSource::Idle,
            })
    }

    fn orientation(&self) -> Option<TiltSample> {
        self.gamma.map(|deg| TiltSample {
            degrees: deg.clamp(-TILT_RANGE_DEG, TILT_RANGE_DEG),
            source: TiltSource::Orientation,
        })
    }

    fn rotation_fallback(&self) -> Option<TiltSample> {
        self.rotation.map(|deg| TiltSample {
            degrees: deg.clamp(-TILT_RANGE_DEG, TILT_RANGE_DEG),
            source: TiltSource::Rotation,
        })
    }

    fn pointer_fallback(&self) -> Option<TiltSample> {
        self.pointer.map(|t| TiltSample {
            degrees: map_range(t.clamp(0.0, 1.0), 0.0, 1.0, -TILT_RANGE_DEG, TILT_RANGE_DEG),
            source: TiltSource::Pointer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_progress_endpoints() {
        assert!((progress_from_degrees(-45.0) - 0.0).abs() < EPS);
        assert!((progress_from_degrees(0.0) - 0.5).abs() < EPS);
        assert!((progress_from_degrees(45.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_progress_clamps_out_of_range() {
        assert!((progress_from_degrees(-90.0) - 0.0).abs() < EPS);
        assert!((progress_from_degrees(90.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_idle_sample_is_centered() {
        let s = TiltState::new().sample();
        assert_eq!(s.source, TiltSource::Idle);
        assert!((s.degrees).abs() < EPS);
        assert!((s.progress() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_orientation_beats_other_providers() {
        let state = TiltState {
            gamma: Some(30.0),
            rotation: Some(-30.0),
            pointer: Some(0.0),
        };
        let s = state.sample();
        assert_eq!(s.source, TiltSource::Orientation);
        assert!((s.degrees - 30.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_beats_pointer() {
        let state = TiltState {
            gamma: None,
            rotation: Some(-10.0),
            pointer: Some(1.0),
        };
        let s = state.sample();
        assert_eq!(s.source, TiltSource::Rotation);
        assert!((s.degrees + 10.0).abs() < EPS);
    }

    #[test]
    fn test_pointer_maps_to_full_range() {
        let mut state = TiltState::new();
        state.pointer = Some(0.0);
        assert!((state.sample().degrees + 45.0).abs() < EPS);
        state.pointer = Some(0.5);
        assert!((state.sample().degrees).abs() < EPS);
        state.pointer = Some(1.0);
        assert!((state.sample().degrees - 45.0).abs() < EPS);
    }

    #[test]
    fn test_gamma_clamped_to_range() {
        let state = TiltState {
            gamma: Some(80.0),
            ..Default::default()
        };
        assert!((state.sample().degrees - 45.0).abs() < EPS);
    }

    proptest! {
        #[test]
        fn prop_progress_formula(theta in -45.0f32..=45.0) {
            let expected = ((theta + 45.0) / 90.0).clamp(0.0, 1.0);
            prop_assert!((progress_from_degrees(theta) - expected).abs() < 1e-4);
        }

        #[test]
        fn prop_progress_bounded(theta in -1000.0f32..=1000.0) {
            let p = progress_from_degrees(theta);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
