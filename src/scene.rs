//! Per-frame scene state: brightness easing and playback start/pause
//!
//! All reactive logic lives here and is pure: the frame loop feeds one
//! progress value per frame into [`SceneState::advance`] and applies the
//! returned [`FrameOutput`] to the DOM. No rendering or platform
//! dependencies.

use crate::consts::*;
use crate::lerp;

/// Whether the flower animation is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Paused,
    Playing,
}

/// Edge produced by a threshold crossing, to be applied as a side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// Show the flower at full opacity and restart its loop from frame one
    Started,
    /// Hide the flower (opacity 0)
    Stopped,
}

/// What the frame loop should draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Veil alpha in [0, 255]; higher progress means a more transparent veil
    pub veil_alpha: f32,
    /// Progress driving the sun's horizontal travel
    pub sun_t: f32,
    /// Playback edge crossed this frame, if any
    pub change: Option<PlaybackChange>,
}

/// Smoothed state carried across frames
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneState {
    /// Eased brightness in [0, 1]
    pub brightness: f32,
    pub playback: Playback,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame with the given tilt progress in [0, 1].
    ///
    /// Brightness is a first-order low-pass toward `progress^1.2`; the
    /// smoothing factor is per-frame, not time-normalized. The start branch
    /// is checked before the stop branch, so at progress exactly equal to
    /// the (shared) threshold a paused scene starts.
    pub fn advance(&mut self, progress: f32) -> FrameOutput {
        let progress = progress.clamp(0.0, 1.0);
        let target = progress.powf(BRIGHTNESS_EXPONENT);
        self.brightness = lerp(self.brightness, target, BRIGHTNESS_SMOOTHING).clamp(0.0, 1.0);

        let change = if self.playback == Playback::Paused && progress >= START_T {
            self.playback = Playback::Playing;
            Some(PlaybackChange::Started)
        } else if self.playback == Playback::Playing && progress <= STOP_T {
            self.playback = Playback::Paused;
            Some(PlaybackChange::Stopped)
        } else {
            None
        };

        FrameOutput {
            veil_alpha: (1.0 - self.brightness) * DIM_ALPHA_MAX,
            sun_t: progress,
            change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a progress sequence, collecting the playback edges
    fn edges(scene: &mut SceneState, seq: &[f32]) -> Vec<Option<PlaybackChange>> {
        seq.iter().map(|&p| scene.advance(p).change).collect()
    }

    #[test]
    fn test_playback_transitions_at_thresholds() {
        let mut scene = SceneState::new();
        let out = edges(&mut scene, &[0.0, 0.2, 0.4, 0.3, 0.5]);
        assert_eq!(
            out,
            vec![
                None,
                None,
                Some(PlaybackChange::Started), // first progress >= 0.35
                Some(PlaybackChange::Stopped), // next progress <= 0.35
                Some(PlaybackChange::Started),
            ]
        );
        assert_eq!(scene.playback, Playback::Playing);
    }

    #[test]
    fn test_no_repeat_edges_without_crossing() {
        let mut scene = SceneState::new();
        let out = edges(&mut scene, &[0.5, 0.6, 0.7, 0.9]);
        assert_eq!(out[0], Some(PlaybackChange::Started));
        assert!(out[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_tie_break_at_exact_threshold() {
        // Both thresholds are 0.35; from Paused, the start branch wins
        let mut scene = SceneState::new();
        assert_eq!(scene.advance(0.35).change, Some(PlaybackChange::Started));
        // From Playing, the same value now satisfies the stop branch
        assert_eq!(scene.advance(0.35).change, Some(PlaybackChange::Stopped));
    }

    #[test]
    fn test_brightness_converges_monotonically() {
        let mut scene = SceneState::new();
        let mut prev = scene.brightness;
        for _ in 0..500 {
            scene.advance(1.0);
            assert!(scene.brightness >= prev);
            assert!(scene.brightness <= 1.0);
            prev = scene.brightness;
        }
        // Well converged after 500 frames at factor 0.12
        assert!(scene.brightness > 0.999);
    }

    #[test]
    fn test_brightness_never_overshoots_downward() {
        let mut scene = SceneState::new();
        for _ in 0..200 {
            scene.advance(1.0);
        }
        let mut prev = scene.brightness;
        for _ in 0..500 {
            scene.advance(0.0);
            assert!(scene.brightness <= prev);
            assert!(scene.brightness >= 0.0);
            prev = scene.brightness;
        }
    }

    #[test]
    fn test_veil_alpha_range() {
        let mut scene = SceneState::new();
        let out = scene.advance(0.0);
        // Dark start: near-opaque veil
        assert!(out.veil_alpha <= DIM_ALPHA_MAX && out.veil_alpha > DIM_ALPHA_MAX * 0.9);
        for _ in 0..500 {
            scene.advance(1.0);
        }
        let out = scene.advance(1.0);
        assert!(out.veil_alpha < 1.0);
    }

    #[test]
    fn test_sun_t_follows_progress() {
        let mut scene = SceneState::new();
        assert!((scene.advance(0.25).sun_t - 0.25).abs() < 1e-6);
        // Out-of-range input is clamped before use
        assert!((scene.advance(2.0).sun_t - 1.0).abs() < 1e-6);
    }
}
