use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use airfield::cli::Cli;
use airfield::config::SceneConfig;
use airfield::core::Clock;
use airfield::input::{Bindings, WinitController};
use airfield::render::Renderer;
use airfield::scene::SceneState;

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: SceneState,
    controller: WinitController,
    bindings: Bindings,
    clock: Clock,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl App {
    fn new(config: &SceneConfig, presentation: bool) -> Result<Self> {
        let mut scene = SceneState::from_config(config)?;
        if presentation {
            scene.toggle_presentation();
        }
        Ok(Self {
            window: None,
            renderer: None,
            scene,
            controller: WinitController::new(),
            bindings: Bindings::new(&config.camera),
            clock: Clock::new(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
        })
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            log::debug!("fps: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    fn toggle_mouse_look(&mut self, window: &Window) {
        let enabled = !self.controller.look_enabled();
        self.controller.set_look_enabled(enabled);
        let grab = if enabled {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(grab) {
            log::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(!enabled);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Airfield")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let renderer = match pollster::block_on(Renderer::new(window.clone())) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("failed to initialize renderer: {e}");
                    event_loop.exit();
                    return;
                }
            };

            self.window = Some(window);
            self.renderer = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // HUD gets first refusal on the event.
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::KeyC),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(window) = self.window.clone() {
                    self.toggle_mouse_look(&window);
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                let tick = self.clock.tick();
                self.update_fps(tick.delta);

                self.bindings
                    .apply(&mut self.controller, &mut self.scene, tick.delta);

                let frame = match self.scene.advance(tick.elapsed) {
                    Ok(frame) => frame,
                    Err(e) => {
                        log::error!("frame derivation failed: {e}");
                        return;
                    }
                };

                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    if let Err(e) = renderer.render(window, &frame, &self.scene, self.fps) {
                        log::error!("render error: {e}");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Headless smoke run: derive a few seconds of frames and report where
/// the scene ended up.
fn run_check(config: &SceneConfig, presentation: bool) -> Result<()> {
    let mut scene = SceneState::from_config(config)?;
    if presentation {
        scene.toggle_presentation();
    }
    for frame_index in 0..120 {
        let _ = scene.advance(frame_index as f32 / 60.0)?;
    }
    log::info!(
        "check passed: orbit at {:.1} deg, airplane at {}",
        scene.orbit().angle_deg(),
        scene.orbit().position()
    );
    println!("ok");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if cli.check {
        return run_check(&config, cli.presentation);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&config, cli.presentation)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
