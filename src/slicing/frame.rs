//! Frame assembly
//!
//! [`FrameAssembler::compose_frame`] is a pure function of the elapsed time,
//! the viewport and the current [`RenderMode`]. It never touches the window;
//! when the next frame is requested is decided by
//! [`crate::render_loop::RenderLoop`].

use std::{fmt, str::FromStr};

use super::{
    colorizer::{Rgba, SliceColorizer},
    planner::SlicePlanner,
    projector::{ContourProjector, ScreenPolyline},
};
use crate::{
    config::ViewerConfig,
    error::Result,
    geometry::{Geometry, HiddenLineView, Mesh, MeshGeometry},
    gfx::camera::{CameraPipeline, Viewport},
};

/// What a frame draws.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Colored contours of the horizontal slice stack.
    #[default]
    Slices,
    /// Visible edges of the whole mesh.
    HiddenLine,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Slices => RenderMode::HiddenLine,
            RenderMode::HiddenLine => RenderMode::Slices,
        }
    }
}

impl FromStr for RenderMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slices" => Ok(RenderMode::Slices),
            "hidden-line" | "hidden_line" | "hiddenline" => Ok(RenderMode::HiddenLine),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Slices => write!(f, "slices"),
            RenderMode::HiddenLine => write!(f, "hidden-line"),
        }
    }
}

/// Everything needed to draw one redraw. Not kept between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub rotation_angle: f64,
    pub viewport: Viewport,
    /// Polylines in draw order.
    pub draw_list: Vec<ScreenPolyline>,
    pub background: Rgba,
}

/// Builds frames for one mesh.
pub struct FrameAssembler<G: Geometry = MeshGeometry> {
    mesh: Mesh,
    geometry: G,
    config: ViewerConfig,
    camera: CameraPipeline,
    planner: SlicePlanner,
    colorizer: SliceColorizer,
    mode: RenderMode,
}

impl<G: Geometry> FrameAssembler<G> {
    pub fn new(mesh: Mesh, geometry: G, config: ViewerConfig) -> Self {
        Self {
            camera: CameraPipeline::from_config(&config),
            planner: SlicePlanner::new(config.slice_count),
            colorizer: SliceColorizer::default(),
            mode: config.mode,
            mesh,
            geometry,
            config,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switches between the two modes and returns the new one.
    pub fn toggle_mode(&mut self) -> RenderMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Builds the frame shown `elapsed_ms` after session start on a surface
    /// of `size` pixels.
    ///
    /// Fails only for a zero-sized surface, before any matrix is built.
    pub fn compose_frame(&self, elapsed_ms: f64, size: (u32, u32)) -> Result<Frame> {
        let viewport = Viewport::try_from(size)?;

        let draw_list = match self.mode {
            RenderMode::Slices => self.slice_polylines(elapsed_ms, viewport),
            RenderMode::HiddenLine => self.hidden_line_polylines(elapsed_ms, viewport),
        };

        log::trace!(
            "frame at {elapsed_ms:.0}ms ({}): {} polylines",
            self.mode,
            draw_list.len()
        );

        Ok(Frame {
            rotation_angle: CameraPipeline::rotation_angle(elapsed_ms),
            viewport,
            draw_list,
            background: Rgba::WHITE,
        })
    }

    fn slice_polylines(&self, elapsed_ms: f64, viewport: Viewport) -> Vec<ScreenPolyline> {
        let projector =
            ContourProjector::new(self.camera.matrix(elapsed_ms, viewport), viewport.height());

        let mut polylines = Vec::new();
        for slice in self.planner.planes() {
            let contours = self.geometry.intersect(&slice.plane, &self.mesh);
            if contours.is_empty() {
                continue;
            }
            let contours = self
                .geometry
                .simplify(contours, self.config.simplify_tolerance);
            let color = self.colorizer.color_for(slice.offset);

            polylines.extend(projector.project(&contours).into_iter().map(|points| {
                ScreenPolyline {
                    points,
                    stroke_width: self.config.slice_stroke_width,
                    color,
                }
            }));
        }
        polylines
    }

    /// Visible edges of the rotated, unscaled mesh, projected with a
    /// perspective divide.
    fn hidden_line_polylines(&self, elapsed_ms: f64, viewport: Viewport) -> Vec<ScreenPolyline> {
        let model = self.camera.rotation_matrix(elapsed_ms);
        let view = HiddenLineView::from_config(&self.config, viewport);
        let contours = self.geometry.render_hidden_line(&self.mesh, &model, &view);

        let projector = ContourProjector::perspective(
            self.camera.hidden_line_matrix(elapsed_ms, viewport),
            viewport.height(),
        );
        projector
            .project(&contours)
            .into_iter()
            .map(|points| ScreenPolyline {
                points,
                stroke_width: self.config.hidden_line_stroke_width,
                color: Rgba::BLACK,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ViewError,
        geometry::{generate_cube, ContourSet, Plane},
    };
    use cgmath::{Matrix4, Point3};
    use std::cell::Cell;

    /// Returns a fixed contour for every plane and counts calls.
    #[derive(Default)]
    struct FixedGeometry {
        contour: ContourSet,
        intersects: Cell<usize>,
        hidden_line_passes: Cell<usize>,
    }

    impl FixedGeometry {
        fn with_segment() -> Self {
            Self {
                contour: vec![vec![Point3::new(-0.25, 0.0, 0.0), Point3::new(0.25, 0.0, 0.0)]],
                ..Self::default()
            }
        }
    }

    impl Geometry for FixedGeometry {
        fn intersect(&self, _plane: &Plane, _mesh: &Mesh) -> ContourSet {
            self.intersects.set(self.intersects.get() + 1);
            self.contour.clone()
        }

        fn simplify(&self, contours: ContourSet, _tolerance: f64) -> ContourSet {
            contours
        }

        fn render_hidden_line(
            &self,
            _mesh: &Mesh,
            _model: &Matrix4<f64>,
            _view: &HiddenLineView,
        ) -> ContourSet {
            self.hidden_line_passes.set(self.hidden_line_passes.get() + 1);
            self.contour.clone()
        }
    }

    fn assembler(slices: usize, geometry: FixedGeometry) -> FrameAssembler<FixedGeometry> {
        let config = ViewerConfig {
            slice_count: slices,
            ..ViewerConfig::default()
        };
        FrameAssembler::new(generate_cube(), geometry, config)
    }

    fn close(a: Rgba, b: Rgba) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_single_slice_single_segment() {
        let frames = assembler(1, FixedGeometry::with_segment());
        let frame = frames.compose_frame(0.0, (800, 600)).unwrap();

        assert_eq!(frame.draw_list.len(), 1);
        let polyline = &frame.draw_list[0];
        assert_eq!(polyline.points.len(), 2);
        assert_eq!(polyline.stroke_width, 3.0);
        assert!(close(polyline.color, Rgba::new(0.84, 0.36, 0.36, 1.0)));
        assert_eq!(frame.background, Rgba::WHITE);
        assert_eq!(frame.rotation_angle, 0.0);
    }

    #[test]
    fn test_zero_slices_gives_empty_frame() {
        let frames = assembler(0, FixedGeometry::with_segment());
        let frame = frames.compose_frame(1000.0, (800, 600)).unwrap();
        assert!(frame.draw_list.is_empty());
        assert_eq!(frames.geometry.intersects.get(), 0);
    }

    #[test]
    fn test_aspect_change_between_frames() {
        let frames = assembler(1, FixedGeometry::with_segment());
        let wide = frames.compose_frame(500.0, (1600, 800)).unwrap();
        let square = frames.compose_frame(500.0, (800, 800)).unwrap();

        assert_eq!(wide.viewport.aspect(), 2.0);
        assert_eq!(square.viewport.aspect(), 1.0);

        let span = |f: &Frame| {
            let p = &f.draw_list[0].points;
            (p[1][0] - p[0][0]).abs()
        };
        // Same height and field of view, so the horizontal span in pixels
        // stays put while the centre moves with the width.
        assert!((span(&wide) - span(&square)).abs() < 1e-3);
        assert!((wide.draw_list[0].points[0][0] - square.draw_list[0].points[0][0]).abs() > 100.0);
    }

    #[test]
    fn test_zero_viewport_is_rejected() {
        let frames = assembler(4, FixedGeometry::with_segment());
        let err = frames.compose_frame(0.0, (0, 600)).unwrap_err();
        assert!(matches!(err, ViewError::InvalidViewport { width: 0, height: 600 }));
        assert_eq!(frames.geometry.intersects.get(), 0);
    }

    #[test]
    fn test_slices_keep_plane_order_and_color() {
        let frames = assembler(4, FixedGeometry::with_segment());
        let frame = frames.compose_frame(0.0, (640, 480)).unwrap();

        let colorizer = SliceColorizer::default();
        let expected: Vec<Rgba> = [-1.0, -0.5, 0.0, 0.5]
            .iter()
            .map(|s| colorizer.color_for(*s))
            .collect();
        let colors: Vec<Rgba> = frame.draw_list.iter().map(|p| p.color).collect();
        assert_eq!(colors, expected);
        assert_eq!(frames.geometry.intersects.get(), 4);
    }

    #[test]
    fn test_empty_slices_are_skipped() {
        let frames = assembler(8, FixedGeometry::default());
        let frame = frames.compose_frame(0.0, (640, 480)).unwrap();
        assert!(frame.draw_list.is_empty());
    }

    #[test]
    fn test_hidden_line_mode_uses_black_hairlines() {
        let mut frames = assembler(8, FixedGeometry::with_segment());
        assert_eq!(frames.toggle_mode(), RenderMode::HiddenLine);

        let frame = frames.compose_frame(250.0, (640, 480)).unwrap();
        assert_eq!(frame.draw_list.len(), 1);
        assert_eq!(frame.draw_list[0].color, Rgba::BLACK);
        assert_eq!(frame.draw_list[0].stroke_width, 1.0);
        assert_eq!(frames.geometry.intersects.get(), 0);
        assert_eq!(frames.geometry.hidden_line_passes.get(), 1);
    }

    #[test]
    fn test_rotation_changes_projection() {
        let frames = assembler(1, FixedGeometry::with_segment());
        let a = frames.compose_frame(0.0, (800, 600)).unwrap();
        let b = frames.compose_frame(1500.0, (800, 600)).unwrap();
        assert!((b.rotation_angle - 1.5).abs() < 1e-12);
        assert_ne!(a.draw_list[0].points, b.draw_list[0].points);
    }

    #[test]
    fn test_frames_are_repeatable() {
        let frames = assembler(3, FixedGeometry::with_segment());
        let a = frames.compose_frame(777.0, (320, 240)).unwrap();
        let b = frames.compose_frame(777.0, (320, 240)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_real_geometry_slices_cube() {
        let config = ViewerConfig {
            slice_count: 8,
            ..ViewerConfig::default()
        };
        let frames = FrameAssembler::new(generate_cube(), MeshGeometry, config);
        let frame = frames.compose_frame(0.0, (512, 512)).unwrap();
        // -1.0 and -0.75 miss the cube; -0.5 and 0.5 trace its bottom and top
        // rims through the side faces; the rest cut it once.
        assert_eq!(frame.draw_list.len(), 5);
        assert!(frame
            .draw_list
            .iter()
            .all(|p| p.points.first() == p.points.last()));
    }

    fn horizontal_span(frame: &Frame) -> (f32, f32) {
        frame
            .draw_list
            .iter()
            .flat_map(|p| p.points.iter())
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])))
    }

    #[test]
    fn test_cube_slices_fill_the_view() {
        let config = ViewerConfig {
            slice_count: 8,
            ..ViewerConfig::default()
        };
        let frames = FrameAssembler::new(generate_cube(), MeshGeometry, config);
        let frame = frames.compose_frame(0.0, (800, 800)).unwrap();

        // No perspective divide: the half-scale cube spans 769.2 px, from
        // 15.4 to 784.6.
        let (lo, hi) = horizontal_span(&frame);
        assert!((lo - 15.39).abs() < 0.1, "left edge {lo}");
        assert!((hi - 784.61).abs() < 0.1, "right edge {hi}");
    }

    #[test]
    fn test_hidden_line_projects_rotated_mesh_with_divide() {
        let mut frames = assembler(1, FixedGeometry::with_segment());
        frames.toggle_mode();
        let elapsed_ms = 400.0;
        let frame = frames.compose_frame(elapsed_ms, (800, 600)).unwrap();

        let camera = CameraPipeline::default();
        let clip_matrix = cgmath::perspective(cgmath::Deg(35.0), 800.0 / 600.0, 0.1, 100.0)
            * Matrix4::look_at_rh(camera.eye, camera.center, camera.up)
            * camera.rotation_matrix(elapsed_ms);
        let expected: Vec<[f32; 2]> = frames.geometry.contour[0]
            .iter()
            .map(|p| {
                let clip = clip_matrix * cgmath::Vector4::new(p.x, p.y, p.z, 1.0);
                let x = (clip.x / clip.w + 1.0) * 400.0;
                let y = (clip.y / clip.w + 1.0) * 300.0;
                [x as f32, (600.0 - y) as f32]
            })
            .collect();

        let points = &frame.draw_list[0].points;
        for (got, want) in points.iter().zip(&expected) {
            assert!((got[0] - want[0]).abs() < 1e-3 && (got[1] - want[1]).abs() < 1e-3);
        }
        assert_eq!(points.len(), expected.len());
    }

    #[test]
    fn test_hidden_line_passes_rotation_only() {
        struct ModelCheck;
        impl Geometry for ModelCheck {
            fn intersect(&self, _plane: &Plane, _mesh: &Mesh) -> ContourSet {
                ContourSet::new()
            }
            fn simplify(&self, contours: ContourSet, _tolerance: f64) -> ContourSet {
                contours
            }
            fn render_hidden_line(
                &self,
                _mesh: &Mesh,
                model: &Matrix4<f64>,
                _view: &HiddenLineView,
            ) -> ContourSet {
                let v = model * cgmath::Vector4::new(1.0, 0.0, 0.0, 1.0);
                assert!((v.x * v.x + v.z * v.z - 1.0).abs() < 1e-12, "model scales: {v:?}");
                ContourSet::new()
            }
        }

        let config = ViewerConfig {
            mode: RenderMode::HiddenLine,
            ..ViewerConfig::default()
        };
        let frames = FrameAssembler::new(generate_cube(), ModelCheck, config);
        assert!(frames.compose_frame(900.0, (320, 240)).unwrap().draw_list.is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("slices".parse::<RenderMode>(), Ok(RenderMode::Slices));
        assert_eq!("Hidden-Line".parse::<RenderMode>(), Ok(RenderMode::HiddenLine));
        assert_eq!("wireframe".parse::<RenderMode>(), Err(()));
        assert_eq!(RenderMode::HiddenLine.to_string(), "hidden-line");
    }
}
