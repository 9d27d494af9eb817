//! # Viewer Configuration
//!
//! Fixed constants for the slice viewer plus a small set of environment
//! overrides. Everything here is read once at startup; nothing is a runtime
//! flag of the frame pipeline.
//!
//! | Variable             | Effect                                           |
//! |----------------------|--------------------------------------------------|
//! | `SLICESCOPE_SLICES`  | number of horizontal cutting planes              |
//! | `SLICESCOPE_MODE`    | `slices` or `hidden-line`                        |
//! | `SLICESCOPE_FPS`     | fixed redraw rate; absent or `0` means continuous |

use std::time::Duration;

use cgmath::{Point3, Vector3};

use crate::{
    gfx::camera::camera_pipeline::DEFAULT_MODEL_SCALE, render_loop::FramePacing,
    slicing::frame::RenderMode,
};

pub const DEFAULT_SLICE_COUNT: usize = 128;
pub const DEFAULT_FOV_DEGREES: f64 = 35.0;
pub const DEFAULT_NEAR: f64 = 0.1;
pub const DEFAULT_FAR: f64 = 100.0;
pub const SLICE_STROKE_WIDTH: f32 = 3.0;
pub const HIDDEN_LINE_STROKE_WIDTH: f32 = 1.0;
pub const SIMPLIFY_TOLERANCE: f64 = 1e-6;
pub const HIDDEN_LINE_STEP: f64 = 0.01;
pub const DEFAULT_MODEL_PATH: &str = "suzanne.obj";

/// Startup configuration of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub model_path: String,
    pub slice_count: usize,
    pub eye: Point3<f64>,
    pub center: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    /// Uniform scale applied to the rotated mesh before the view transform in
    /// slice mode. Hidden-line mode draws the mesh unscaled.
    pub model_scale: f64,
    pub slice_stroke_width: f32,
    pub hidden_line_stroke_width: f32,
    pub simplify_tolerance: f64,
    /// Sampling step along mesh edges in hidden-line mode.
    pub hidden_line_step: f64,
    pub mode: RenderMode,
    pub pacing: FramePacing,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            slice_count: DEFAULT_SLICE_COUNT,
            eye: Point3::new(-0.5, 0.5, 2.0),
            center: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            model_scale: DEFAULT_MODEL_SCALE,
            slice_stroke_width: SLICE_STROKE_WIDTH,
            hidden_line_stroke_width: HIDDEN_LINE_STROKE_WIDTH,
            simplify_tolerance: SIMPLIFY_TOLERANCE,
            hidden_line_step: HIDDEN_LINE_STEP,
            mode: RenderMode::Slices,
            pacing: FramePacing::Continuous,
        }
    }
}

impl ViewerConfig {
    /// Defaults with overrides taken from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides taken from `lookup`.
    ///
    /// Values that fail to parse are reported and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("SLICESCOPE_SLICES") {
            match raw.trim().parse::<usize>() {
                Ok(count) => config.slice_count = count,
                Err(_) => log::warn!("ignoring SLICESCOPE_SLICES={raw:?}: not a slice count"),
            }
        }

        if let Some(raw) = lookup("SLICESCOPE_MODE") {
            match raw.trim().parse::<RenderMode>() {
                Ok(mode) => config.mode = mode,
                Err(()) => log::warn!("ignoring SLICESCOPE_MODE={raw:?}: expected `slices` or `hidden-line`"),
            }
        }

        if let Some(raw) = lookup("SLICESCOPE_FPS") {
            match raw.trim().parse::<u32>() {
                Ok(0) => config.pacing = FramePacing::Continuous,
                Ok(fps) => {
                    config.pacing =
                        FramePacing::FixedRate(Duration::from_nanos(1_000_000_000 / fps as u64))
                }
                Err(_) => log::warn!("ignoring SLICESCOPE_FPS={raw:?}: not a frame rate"),
            }
        }

        config
    }

    /// Replaces the model path, builder style.
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.slice_count, 128);
        assert_eq!(config.fov_degrees, 35.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 100.0);
        assert_eq!(config.slice_stroke_width, 3.0);
        assert_eq!(config.hidden_line_stroke_width, 1.0);
        assert_eq!(config.model_scale, 0.5);
        assert_eq!(config.eye, Point3::new(-0.5, 0.5, 2.0));
        assert_eq!(config.mode, RenderMode::Slices);
        assert_eq!(config.pacing, FramePacing::Continuous);
    }

    #[test]
    fn test_env_overrides() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            ("SLICESCOPE_SLICES", "16"),
            ("SLICESCOPE_MODE", "hidden-line"),
            ("SLICESCOPE_FPS", "50"),
        ]));
        assert_eq!(config.slice_count, 16);
        assert_eq!(config.mode, RenderMode::HiddenLine);
        assert_eq!(
            config.pacing,
            FramePacing::FixedRate(Duration::from_millis(20))
        );
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            ("SLICESCOPE_SLICES", "many"),
            ("SLICESCOPE_MODE", "sideways"),
            ("SLICESCOPE_FPS", "-3"),
        ]));
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_zero_fps_means_continuous() {
        let config = ViewerConfig::from_lookup(lookup_from(&[("SLICESCOPE_FPS", "0")]));
        assert_eq!(config.pacing, FramePacing::Continuous);
    }
}
