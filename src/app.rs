//! Interactive viewer: window, event loop and the per-frame wiring between
//! input, the sculpture and the renderer.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SculptureConfig;
use crate::error::AppError;
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode};
use crate::progress::TreeState;
use crate::repulsion::pointer_to_world;
use crate::sculpture::{FrameInput, Sculpture};
use crate::time::FrameClock;

const WINDOW_TITLE: &str = "Evergreen";

/// Build the sculpture from `config` and open the viewer. Blocks until the
/// window is closed.
///
/// Space, Enter or a right click toggles between chaos and the formed tree.
/// Left-drag orbits, the wheel zooms and Escape quits.
pub fn run(config: SculptureConfig) -> Result<(), AppError> {
    let sculpture = Sculpture::initialize(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(sculpture);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    sculpture: Option<Sculpture>,
    input: Input,
    clock: FrameClock,
    state: TreeState,
    /// First fatal error seen inside the event loop.
    error: Option<AppError>,
}

impl App {
    fn new(sculpture: Sculpture) -> Self {
        Self {
            window: None,
            gpu: None,
            sculpture: Some(sculpture),
            input: Input::new(),
            clock: FrameClock::new(),
            state: TreeState::default(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let Some(sculpture) = self.sculpture.as_ref() else {
            return Ok(());
        };

        let window_attrs = Window::default_attributes()
            .with_title(title(self.state, None))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let gpu = pollster::block_on(GpuState::new(window.clone(), sculpture))?;
        self.gpu = Some(gpu);
        self.window = Some(window);
        // Don't count window and device setup as the first frame's delta.
        self.clock = FrameClock::new();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(sculpture)) = (self.gpu.as_mut(), self.sculpture.as_mut()) else {
            return;
        };

        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }

        let toggled = self.input.toggle_requested();
        if toggled {
            self.state = self.state.toggled();
            log::info!("Tree state -> {:?}", self.state);
        }

        gpu.camera.orbit(self.input.drag_delta());
        gpu.camera.zoom(self.input.scroll_delta());

        let (time, dt, fps_refreshed) = self.clock.tick();
        let pointer = pointer_to_world(
            self.input.pointer_ndc(),
            gpu.camera.viewport_size(gpu.aspect()),
        );
        let frame = FrameInput {
            state: self.state,
            pointer,
            time,
        };
        let commands = sculpture.advance(&frame, dt);

        match gpu.render(&commands) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                });
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if fps_refreshed {
            log::debug!("{:.1} fps, frame {}", self.clock.fps(), self.clock.frame());
        }
        if toggled || fps_refreshed {
            if let Some(window) = &self.window {
                window.set_title(&title(self.state, Some(self.clock.fps())));
            }
        }

        self.input.begin_frame();
    }
}

/// Window title: the action the toggle will perform next, plus FPS once known.
fn title(state: TreeState, fps: Option<f32>) -> String {
    match fps {
        Some(fps) => format!("{} - {} [Space] - {:.0} fps", WINDOW_TITLE, state.action_label(), fps),
        None => format!("{} - {} [Space]", WINDOW_TITLE, state.action_label()),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GPU resources before the sculpture reports its final state.
        self.gpu = None;
        if let Some(sculpture) = self.sculpture.take() {
            sculpture.teardown();
        }
    }
}
