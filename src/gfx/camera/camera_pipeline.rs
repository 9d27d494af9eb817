//! Per-frame transform pipeline
//!
//! Builds the matrix that carries a point of the (unrotated, unit-cube) mesh
//! to Y-up pixel space:
//!
//! ```text
//! M = ScreenMap ∘ Perspective ∘ View ∘ Scale ∘ RotateY(θ)
//! ```
//!
//! The stages are kept as an explicit ordered list and folded by [`compose`],
//! so the application order is data rather than call order.
//!
//! Slice contours go through every stage as a plain position transform: each
//! stage sees `(x, y, z, 1)` and its `w` output is dropped ([`compose_affine`]).
//! There is no perspective divide, and the 0.5 model scale is sized for that.
//! Hidden-line mode instead rotates the unscaled mesh and divides by `w`
//! ([`CameraPipeline::hidden_line_matrix`]).

use cgmath::{Deg, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use super::camera_utils::Viewport;
use crate::config::ViewerConfig;

/// Uniform scale applied to the rotated mesh before viewing.
pub const DEFAULT_MODEL_SCALE: f64 = 0.5;

/// Rotation speed around the vertical axis.
pub const RADIANS_PER_MS: f64 = 0.001;

/// One named step of the frame transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStage {
    RotateY(Rad<f64>),
    Scale(f64),
    View {
        eye: Point3<f64>,
        center: Point3<f64>,
        up: Vector3<f64>,
    },
    Perspective {
        fovy: Deg<f64>,
        aspect: f64,
        near: f64,
        far: f64,
    },
    /// Maps normalized device coordinates to Y-up pixels: `(ndc + 1) * size / 2`.
    ScreenMap { width: f64, height: f64 },
}

impl TransformStage {
    pub fn name(&self) -> &'static str {
        match self {
            TransformStage::RotateY(_) => "rotate",
            TransformStage::Scale(_) => "scale",
            TransformStage::View { .. } => "view",
            TransformStage::Perspective { .. } => "perspective",
            TransformStage::ScreenMap { .. } => "screen-map",
        }
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        match *self {
            TransformStage::RotateY(angle) => Matrix4::from_angle_y(angle),
            TransformStage::Scale(factor) => Matrix4::from_scale(factor),
            TransformStage::View { eye, center, up } => Matrix4::look_at_rh(eye, center, up),
            TransformStage::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => cgmath::perspective(fovy, aspect, near, far),
            TransformStage::ScreenMap { width, height } => {
                Matrix4::from_nonuniform_scale(width / 2.0, height / 2.0, 1.0)
                    * Matrix4::from_translation(Vector3::new(1.0, 1.0, 0.0))
            }
        }
    }

    /// [`Self::matrix`] with its bottom row reset to `(0, 0, 0, 1)`, so a
    /// point keeps `w = 1`. Only the perspective stage changes.
    pub fn affine_matrix(&self) -> Matrix4<f64> {
        let mut m = self.matrix();
        // Column-major: the bottom row is the `w` component of each column.
        m.x.w = 0.0;
        m.y.w = 0.0;
        m.z.w = 0.0;
        m.w.w = 1.0;
        m
    }
}

/// Folds `stages` into one matrix; `stages[0]` is applied to a point first.
///
/// Matrix products are associative, so any grouping of adjacent stages gives
/// the same result, but swapping two stages does not.
pub fn compose(stages: &[TransformStage]) -> Matrix4<f64> {
    stages
        .iter()
        .fold(Matrix4::identity(), |acc, stage| stage.matrix() * acc)
}

/// Like [`compose`], but every stage is applied to `(x, y, z, 1)` and its `w`
/// output is dropped before the next stage.
pub fn compose_affine(stages: &[TransformStage]) -> Matrix4<f64> {
    stages
        .iter()
        .fold(Matrix4::identity(), |acc, stage| stage.affine_matrix() * acc)
}

/// Camera parameters fixed for the session.
///
/// Every matrix is recomputed from `(elapsed_ms, viewport)` on request;
/// nothing is cached between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPipeline {
    pub eye: Point3<f64>,
    pub center: Point3<f64>,
    pub up: Vector3<f64>,
    pub fovy: Deg<f64>,
    pub znear: f64,
    pub zfar: f64,
    pub model_scale: f64,
}

impl CameraPipeline {
    pub fn new(
        eye: Point3<f64>,
        center: Point3<f64>,
        up: Vector3<f64>,
        fov_degrees: f64,
        znear: f64,
        zfar: f64,
    ) -> Self {
        Self {
            eye,
            center,
            up,
            fovy: Deg(fov_degrees),
            znear,
            zfar,
            model_scale: DEFAULT_MODEL_SCALE,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.eye,
            config.center,
            config.up,
            config.fov_degrees,
            config.near,
            config.far,
        )
        .with_model_scale(config.model_scale)
    }

    pub fn with_model_scale(mut self, model_scale: f64) -> Self {
        self.model_scale = model_scale;
        self
    }

    /// Rotation about the vertical axis after `elapsed_ms`. Never wrapped.
    pub fn rotation_angle(elapsed_ms: f64) -> f64 {
        elapsed_ms * RADIANS_PER_MS
    }

    /// The ordered stages for one frame.
    pub fn stages(&self, elapsed_ms: f64, viewport: Viewport) -> [TransformStage; 5] {
        [
            TransformStage::RotateY(Rad(Self::rotation_angle(elapsed_ms))),
            TransformStage::Scale(self.model_scale),
            self.view_stage(),
            self.perspective_stage(viewport),
            Self::screen_map_stage(viewport),
        ]
    }

    /// Object space to Y-up pixel space for slice contours, without a
    /// perspective divide.
    pub fn matrix(&self, elapsed_ms: f64, viewport: Viewport) -> Matrix4<f64> {
        compose_affine(&self.stages(elapsed_ms, viewport))
    }

    /// The hidden-line stages: the unscaled mesh is rotated, viewed and
    /// projected.
    pub fn hidden_line_stages(&self, elapsed_ms: f64, viewport: Viewport) -> [TransformStage; 4] {
        [
            TransformStage::RotateY(Rad(Self::rotation_angle(elapsed_ms))),
            self.view_stage(),
            self.perspective_stage(viewport),
            Self::screen_map_stage(viewport),
        ]
    }

    /// Object space to homogeneous Y-up pixel space for hidden-line contours.
    /// Points must be divided by `w` afterwards.
    pub fn hidden_line_matrix(&self, elapsed_ms: f64, viewport: Viewport) -> Matrix4<f64> {
        compose(&self.hidden_line_stages(elapsed_ms, viewport))
    }

    /// Rotation only; the model transform of hidden-line mode.
    pub fn rotation_matrix(&self, elapsed_ms: f64) -> Matrix4<f64> {
        TransformStage::RotateY(Rad(Self::rotation_angle(elapsed_ms))).matrix()
    }

    fn screen_map_stage(viewport: Viewport) -> TransformStage {
        TransformStage::ScreenMap {
            width: viewport.width() as f64,
            height: viewport.height() as f64,
        }
    }

    fn view_stage(&self) -> TransformStage {
        TransformStage::View {
            eye: self.eye,
            center: self.center,
            up: self.up,
        }
    }

    fn perspective_stage(&self, viewport: Viewport) -> TransformStage {
        TransformStage::Perspective {
            fovy: self.fovy,
            aspect: viewport.aspect(),
            near: self.znear,
            far: self.zfar,
        }
    }
}

impl Default for CameraPipeline {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
