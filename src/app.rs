use std::{path::PathBuf, sync::Arc};

use rand::{rngs::StdRng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::{AnimationLoop, WindowClock},
    config::SceneConfig,
    error::{Error, Result},
    gfx::{
        rendering::{RenderEngine, Renderer},
        resources::ImageLoader,
        scene::TransformSnapshot,
    },
    input::{InputState, PageKey, VirtualPage},
    world::{build_camera_rig, build_world},
};

/// Snapshot files to read at startup and write on exit
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub restore: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

pub struct ScrollscapeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    session: Session,
    window: Option<Arc<Window>>,
    animation: Option<AnimationLoop<WindowClock, RenderEngine>>,
    input: InputState,
    page: VirtualPage,
    modifiers: ModifiersState,
    scale_factor: f64,
    error: Option<Error>,
}

impl ScrollscapeApp {
    pub fn new(config: SceneConfig, session: Session) -> Result<Self> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Window(format!("failed to create event loop: {e}")))?;

        let page = VirtualPage::new(
            config.page.height_px,
            config.window.height as f32,
            config.page.line_px,
        );

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                session,
                window: None,
                animation: None,
                input: InputState::default(),
                page,
                modifiers: ModifiersState::default(),
                scale_factor: 1.0,
                error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Err(Error::Window("event loop already consumed".into()));
        };
        // Ticks are requested by the animation clock, so idle between redraws
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| Error::Window(format!("event loop failed: {e}")))?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Builds the app from `config` and blocks until the window closes
pub fn run(config: SceneConfig, session: Session) -> Result<()> {
    ScrollscapeApp::new(config, session)?.run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    /// Same exit path as closing the window
    Quit,
    Page(PageKey),
}

fn key_action(code: KeyCode) -> Option<KeyAction> {
    let page = match code {
        KeyCode::Escape => return Some(KeyAction::Quit),
        KeyCode::ArrowUp => PageKey::LineUp,
        KeyCode::ArrowDown => PageKey::LineDown,
        KeyCode::PageUp => PageKey::PageUp,
        KeyCode::PageDown | KeyCode::Space => PageKey::PageDown,
        KeyCode::Home => PageKey::Home,
        KeyCode::End => PageKey::End,
        _ => return None,
    };
    Some(KeyAction::Page(page))
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(LogicalSize::new(window_config.width, window_config.height)),
            )
            .map_err(|e| Error::Window(format!("failed to create window: {e}")))?;
        let window = Arc::new(window);

        self.scale_factor = window.scale_factor();
        let physical = window.inner_size();
        let logical: LogicalSize<u32> = physical.to_logical(self.scale_factor);
        log::info!(
            "Window created: {}x{} logical, scale factor {}",
            logical.width,
            logical.height,
            self.scale_factor
        );

        let mut renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            physical.width,
            physical.height,
        ))?;
        renderer.set_pixel_ratio(self.scale_factor);
        renderer.set_size(logical.width, logical.height);

        let loader = ImageLoader::new(self.config.assets.root.clone());
        let mut rng = match self.config.starfield.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut world = build_world(&self.config, &loader, &mut rng);

        if let Some(path) = &self.session.restore {
            let snapshot = TransformSnapshot::load(path)?;
            world.scene.restore_transforms(&snapshot)?;
            log::info!("Restored {} node transforms from {}", snapshot.nodes.len(), path.display());
        }

        let rig = build_camera_rig(
            &self.config.camera,
            &self.config.controls,
            logical.width,
            logical.height,
        );
        self.page
            .set_viewport_height(&mut self.input.scroll, logical.height as f32);

        let spinners = world.spinners();
        let mut animation = AnimationLoop::new(
            world.scene,
            rig,
            spinners,
            WindowClock::new(window.clone()),
            renderer,
        );
        animation.start(&mut self.input);

        self.animation = Some(animation);
        self.window = Some(window);
        Ok(())
    }

    fn save_snapshot(&self) -> Result<()> {
        let (Some(path), Some(animation)) = (&self.session.save, &self.animation) else {
            return Ok(());
        };
        animation.scene().snapshot_transforms().save(path)?;
        log::info!("Saved transform snapshot to {}", path.display());
        Ok(())
    }

    /// Writes the exit snapshot, if one was asked for, and leaves the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        match self.save_snapshot() {
            Ok(()) => event_loop.exit(),
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(error) = self.init(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                let logical: LogicalSize<u32> =
                    PhysicalSize::new(width, height).to_logical(self.scale_factor);
                animation.resize(logical.width, logical.height);
                self.page
                    .set_viewport_height(&mut self.input.scroll, logical.height as f32);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                animation.set_pixel_ratio(scale_factor);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.input.pointer.on_button(state.is_pressed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(self.scale_factor);
                self.input.pointer.on_cursor(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.pointer.on_cursor_left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel up is positive here and scrolls toward the top of the page
                let (lines, pixels) = match delta {
                    MouseScrollDelta::LineDelta(_, y) => (y, y * self.page.line_px),
                    MouseScrollDelta::PixelDelta(position) => {
                        let y = position.to_logical::<f64>(self.scale_factor).y as f32;
                        (y / self.page.line_px, y)
                    }
                };
                if self.modifiers.shift_key() {
                    self.input.pointer.on_zoom(-lines);
                } else {
                    self.page.scroll_pixels(&mut self.input.scroll, pixels);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_action(key_code) {
                Some(KeyAction::Quit) => self.shutdown(event_loop),
                Some(KeyAction::Page(key)) => self.page.apply_key(&mut self.input.scroll, key),
                None => (),
            },
            WindowEvent::RedrawRequested => {
                animation.on_frame(&mut self.input);
            }
            _ => (),
        }
    }
}
