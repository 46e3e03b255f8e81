//! Application host
//!
//! [`AppHost`] owns the winit event loop, the window, the [`RenderEngine`] and
//! the ImGui layer. All scene state and the sketch live in [`AppCore`], which
//! only talks to the GPU through [`RenderTarget`] and can be driven without a
//! window.

use log::{error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    error::{AppError, InitializationFailure},
    gfx::{
        camera::{OrbitControls, PerspectiveCamera},
        clock::Clock,
        environment::EnvironmentLoader,
        rendering::{OverlayPass, RenderEngine, RenderSettings, RenderTarget},
        scene::Scene,
    },
    sketch::{FrameContext, SetupContext, Sketch},
    ui::{DebugPanel, UiManager},
};

/// Lifecycle of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    /// Waiting for [`Sketch::setup`] to resolve
    Initializing,
    Running,
    Stopped,
    /// Setup returned an error; no frame will ever run
    Failed,
}

/// What a call to [`AppCore::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// The application is not running yet (or failed); nothing happened
    Skipped,
    Stopped,
}

/// Requests a running application to stop, from any thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Window and renderer configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Initial inner size in logical pixels
    pub width: u32,
    pub height: u32,
    pub render_settings: RenderSettings,
    pub panel_title: String,
    pub environment_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "sketchbook".to_string(),
            width: 1200,
            height: 800,
            render_settings: RenderSettings::default(),
            panel_title: "Debug".to_string(),
            environment_timeout: EnvironmentLoader::DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_render_settings(mut self, settings: RenderSettings) -> Self {
        self.render_settings = settings;
        self
    }

    pub fn with_panel_title(mut self, title: &str) -> Self {
        self.panel_title = title.to_string();
        self
    }

    pub fn with_environment_timeout(mut self, timeout: Duration) -> Self {
        self.environment_timeout = timeout;
        self
    }
}

/// Scene, camera, controls, clock, debug panel and the sketch driving them
pub struct AppCore<S> {
    sketch: S,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: Option<OrbitControls>,
    clock: Clock,
    panel: DebugPanel,
    loader: EnvironmentLoader,
    phase: Phase,
    stop: StopHandle,
}

impl<S: Sketch> AppCore<S> {
    pub fn new(sketch: S, config: &AppConfig) -> Self {
        Self {
            sketch,
            scene: Scene::new(),
            camera: PerspectiveCamera::for_viewport(config.width, config.height),
            controls: None,
            clock: Clock::new(),
            panel: DebugPanel::new(&config.panel_title),
            loader: EnvironmentLoader::new().with_timeout(config.environment_timeout),
            phase: Phase::Constructed,
            stop: StopHandle::default(),
        }
    }

    /// Runs the sketch's setup; frames are skipped until this resolves `Ok`
    pub async fn initialize(&mut self, renderer: &mut dyn RenderTarget) -> Result<(), AppError> {
        if self.phase != Phase::Constructed {
            warn!("Ignoring initialize in phase {:?}", self.phase);
            return Ok(());
        }
        self.phase = Phase::Initializing;
        info!("Initializing sketch");

        let (width, height) = renderer.size();
        self.camera.set_viewport(width, height);

        let mut ctx = SetupContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            renderer,
            panel: &mut self.panel,
            controls: &mut self.controls,
            loader: &self.loader,
        };

        match self.sketch.setup(&mut ctx).await {
            Ok(()) => {
                self.phase = Phase::Running;
                info!(
                    "Sketch running with {} object(s) and {} parameter(s)",
                    self.scene.get_object_count(),
                    self.panel.params().len()
                );
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Failed;
                error!("Sketch setup failed: {:#}", err);
                Err(InitializationFailure::Setup(err).into())
            }
        }
    }

    /// Follows a window resize; zero sizes (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32, renderer: &mut dyn RenderTarget) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        renderer.resize(width, height);
        if let Some(controls) = self.controls.as_mut() {
            controls.set_viewport_height(height);
        }
    }

    /// Advances by the wall-clock time since the previous frame
    pub fn frame(
        &mut self,
        renderer: &mut dyn RenderTarget,
        overlay: &mut dyn FnMut(OverlayPass<'_>, &mut DebugPanel),
    ) -> Result<FrameOutcome, AppError> {
        if let Some(outcome) = self.check_running() {
            return Ok(outcome);
        }
        let delta = self.clock.get_delta();
        self.run_frame(delta, renderer, overlay)
    }

    /// Ticks the sketch by `delta` seconds and renders one frame
    ///
    /// `overlay` runs after the scene is drawn and receives the debug panel.
    /// Negative deltas count as zero.
    pub fn step(
        &mut self,
        delta: f32,
        renderer: &mut dyn RenderTarget,
        overlay: &mut dyn FnMut(OverlayPass<'_>, &mut DebugPanel),
    ) -> Result<FrameOutcome, AppError> {
        if let Some(outcome) = self.check_running() {
            return Ok(outcome);
        }
        let delta = self.clock.advance(delta);
        self.run_frame(delta, renderer, overlay)
    }

    /// Applies a pending stop request; `None` means a frame may run
    fn check_running(&mut self) -> Option<FrameOutcome> {
        if self.phase == Phase::Running && self.stop.is_stopped() {
            self.phase = Phase::Stopped;
            info!("Sketch stopped after {:.2}s", self.clock.elapsed_time());
        }
        match self.phase {
            Phase::Running => None,
            Phase::Stopped => Some(FrameOutcome::Stopped),
            _ => Some(FrameOutcome::Skipped),
        }
    }

    fn run_frame(
        &mut self,
        delta: f32,
        renderer: &mut dyn RenderTarget,
        overlay: &mut dyn FnMut(OverlayPass<'_>, &mut DebugPanel),
    ) -> Result<FrameOutcome, AppError> {
        let mut ctx = FrameContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            controls: self.controls.as_mut(),
            params: self.panel.params(),
            elapsed: self.clock.elapsed_time(),
            delta,
        };
        self.sketch.tick(&mut ctx);

        let panel = &mut self.panel;
        renderer.render(&self.scene, &self.camera, &mut |pass| overlay(pass, panel))?;
        Ok(FrameOutcome::Rendered)
    }

    /// Stops before the next frame
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let Some(controls) = self.controls.as_mut() {
            controls.handle_window_event(event);
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let Some(controls) = self.controls.as_mut() {
            controls.handle_device_event(event);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut DebugPanel {
        &mut self.panel
    }
}

/// Runs a [`Sketch`] in a window
///
/// ```no_run
/// use sketchbook::prelude::*;
///
/// fn main() -> Result<(), AppError> {
///     let sketch = SpinningMesh::new(EnvironmentSource::parse("studio.hdr"));
///     AppHost::new(AppConfig::default(), sketch)?.run()
/// }
/// ```
pub struct AppHost<S: Sketch> {
    event_loop: EventLoop<()>,
    state: HostState<S>,
}

struct HostState<S: Sketch> {
    config: AppConfig,
    core: AppCore<S>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    error: Option<AppError>,
}

impl<S: Sketch> AppHost<S> {
    pub fn new(config: AppConfig, sketch: S) -> Result<Self, AppError> {
        let event_loop = EventLoop::new().map_err(InitializationFailure::EventLoop)?;
        event_loop.set_control_flow(ControlFlow::Poll);

        Ok(Self {
            event_loop,
            state: HostState {
                core: AppCore::new(sketch, &config),
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                error: None,
            },
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.state.core.stop_handle()
    }

    /// Blocks until the window closes, the sketch is stopped, or something fails
    pub fn run(self) -> Result<(), AppError> {
        let Self {
            event_loop,
            mut state,
        } = self;

        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<S: Sketch> HostState<S> {
    /// Creates the window, renderer and UI, then runs the sketch setup
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_transparent(self.config.render_settings.transparent);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(InitializationFailure::from)?,
        );

        let PhysicalSize { width, height } = window.inner_size();
        let mut render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config.render_settings,
        ))
        .map_err(InitializationFailure::Renderer)?;

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        pollster::block_on(self.core.initialize(&mut render_engine))?;

        window.request_redraw();
        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let result = self.core.frame(render_engine, &mut |pass, panel| {
            ui_manager.draw(
                pass.device,
                pass.queue,
                pass.encoder,
                window,
                pass.view,
                |ui| panel.draw(ui),
            );
        });

        match result {
            Ok(FrameOutcome::Stopped) => event_loop.exit(),
            Ok(_) => {}
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl<S: Sketch> ApplicationHandler for HostState<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // The panel gets first look at input; the camera only sees what it leaves
        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let ui_event: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui_manager.handle_input(window, &ui_event)
            }
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.core.stop();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    self.core.resize(width, height, render_engine);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if !ui_captured {
                    self.core.handle_window_event(&other);
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_mouse())
        {
            return;
        }

        self.core.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.core.phase() == Phase::Stopped {
            event_loop.exit();
            return;
        }
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
