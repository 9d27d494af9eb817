use std::{sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    error::{Result, ViewError},
    geometry::{builtin_mesh, Mesh, MeshGeometry},
    gfx::{camera::Viewport, rendering::RenderEngine},
    performance::FrameStats,
    render_loop::{RenderLoop, SessionClock},
    slicing::{Frame, FrameAssembler},
};

pub struct SlicerApp {
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    assembler: FrameAssembler<MeshGeometry>,
    render_loop: RenderLoop,
    clock: Option<SessionClock>,
    size: (u32, u32),
    stats: FrameStats,
    /// First unrecoverable error; ends the event loop.
    fatal: Option<ViewError>,
}

impl SlicerApp {
    /// Loads and normalizes the mesh named by `config.model_path`.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let mesh = load_mesh(&config.model_path)?;
        log::info!(
            "{}: {} triangles, {} slices, {} mode",
            config.model_path,
            mesh.triangle_count(),
            config.slice_count,
            config.mode
        );

        Ok(Self {
            app_state: AppState {
                window: None,
                render_engine: None,
                render_loop: RenderLoop::new(config.pacing),
                assembler: FrameAssembler::new(mesh, MeshGeometry, config),
                clock: None,
                size: (0, 0),
                stats: FrameStats::new(),
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err).context("viewer stopped"),
            None => Ok(()),
        }
    }
}

/// `builtin:` primitives or an OBJ file, scaled into the unit cube.
pub fn load_mesh(path: &str) -> Result<Mesh> {
    let mesh = match builtin_mesh(path) {
        Some(mesh) => mesh,
        None => Mesh::load_obj(path)?,
    };
    if mesh.is_empty() {
        return Err(ViewError::EmptyMesh);
    }
    Ok(mesh.unit_cube())
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewError) {
        log::error!("{err}");
        self.fatal.get_or_insert(err);
        event_loop.exit();
    }

    /// Composes the next frame, or `None` while the surface has no area.
    ///
    /// Frame timing starts only once the size is known to be drawable, so a
    /// skipped frame never leaves a started frame behind.
    fn next_frame(&mut self, elapsed_ms: f64) -> Result<Option<Frame>> {
        if Viewport::try_from(self.size).is_err() {
            // Minimized windows report a zero size; wait for the next resize.
            return Ok(None);
        }
        self.stats.begin_frame();
        self.assembler.compose_frame(elapsed_ms, self.size).map(Some)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_engine.is_none() {
            return;
        }
        let clock = *self.clock.get_or_insert_with(SessionClock::start);

        let frame = match self.next_frame(clock.elapsed_ms()) {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(err) => return self.fail(event_loop, err),
        };

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        match render_engine.render(&frame) {
            Ok(vertices) => {
                self.stats.end_frame(frame.draw_list.len(), vertices);
                self.render_loop.frame_presented(Instant::now());
            }
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("slicescope")
                .with_inner_size(winit::dpi::LogicalSize::new(1024, 1024)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                return self.fail(event_loop, ViewError::Surface(err.to_string()));
            }
        };

        let PhysicalSize { width, height } = window.inner_size();
        self.size = (width, height);

        let window_clone = window.clone();
        let renderer =
            pollster::block_on(async move { RenderEngine::new(window_clone, width, height).await });

        match renderer {
            Ok(renderer) => {
                log::info!("surface {}x{} ({:?})", width, height, renderer.surface_format());
                self.render_engine = Some(renderer);
                self.window = Some(window);
                self.clock.get_or_insert_with(SessionClock::start);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Tab => {
                    let mode = self.assembler.toggle_mode();
                    log::info!("render mode: {mode}");
                    window.request_redraw();
                }
                _ => (),
            },
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.size = (width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        let now = Instant::now();
        if self.render_loop.should_redraw(now) {
            window.request_redraw();
        }
        event_loop.set_control_flow(self.render_loop.control_flow(now));
    }
}
