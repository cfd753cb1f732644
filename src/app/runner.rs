//! Main application handler

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

#[cfg(feature = "gamepad")]
use super::gamepad::GamepadSource;
use super::platform::PlatformInput;
use super::window::window_attributes_from_config;
use crate::config::AppConfig;
use crate::input::{
    AxisHandle, BindingSet, ButtonHandle, InputCoordinator, InputEvent, InputResult,
    InputSettings, RegisteredInputs, StickHandle,
};

/// Handles for the inputs the demo loop reports on
#[derive(Debug, Clone, Copy)]
struct DemoInputs {
    confirm: Option<ButtonHandle>,
    cancel: Option<ButtonHandle>,
    action: Option<ButtonHandle>,
    horizontal: Option<AxisHandle>,
    movement: Option<StickHandle>,
}

impl DemoInputs {
    fn from_registered(registered: &RegisteredInputs) -> Self {
        Self {
            confirm: registered.button("confirm").ok(),
            cancel: registered.button("cancel").ok(),
            action: registered.button("action").ok(),
            horizontal: registered.axis("horizontal").ok(),
            movement: registered.stick("move").ok(),
        }
    }
}

/// Main application
///
/// Owns the window and the input coordinator. Window and gamepad events are
/// fed to the coordinator as they arrive; the coordinator steps once per loop
/// iteration, before anything reads it.
pub struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    input: InputCoordinator,
    platform: PlatformInput,
    pending: Vec<InputEvent>,
    #[cfg(feature = "gamepad")]
    gamepads: Option<GamepadSource>,
    demo: DemoInputs,
    started: Instant,
}

impl App {
    /// Creates the application and registers its binding set
    pub fn new(config: AppConfig, bindings: &BindingSet) -> InputResult<Self> {
        info!(profile = %config.profile, "Starting application");
        info!(?config.window, "Window configuration");

        let mut input = InputCoordinator::new(InputSettings::from(&config.input));
        let registered = bindings.register(&mut input)?;
        info!(inputs = registered.len(), "Input bindings registered");

        #[cfg(feature = "gamepad")]
        let gamepads = match GamepadSource::new() {
            Ok(source) => {
                input.handle_all(source.connected());
                Some(source)
            }
            Err(e) => {
                warn!(error = %e, "Gamepad backend unavailable");
                None
            }
        };

        Ok(Self {
            config,
            window: None,
            input,
            platform: PlatformInput::new(),
            pending: Vec::new(),
            #[cfg(feature = "gamepad")]
            gamepads,
            demo: DemoInputs::from_registered(&registered),
            started: Instant::now(),
        })
    }

    /// Creates the application from the environment profile
    ///
    /// Falls back to the default configuration and the built-in bindings when
    /// either fails to load.
    pub fn from_env() -> InputResult<Self> {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        let bindings = load_bindings(&config);
        Self::new(config, &bindings)
    }

    /// The input coordinator
    pub fn input(&self) -> &InputCoordinator {
        &self.input
    }

    fn flush_pending(&mut self) {
        self.input.handle_all(self.pending.drain(..));
    }

    fn report_demo_inputs(&self) {
        let input = &self.input;
        let pressed = |handle: Option<ButtonHandle>| {
            handle
                .and_then(|h| input.button(h))
                .is_some_and(|b| b.pressed() || b.repeated())
        };

        if pressed(self.demo.confirm) {
            info!(frame = input.frame(), "Confirm");
        }
        if pressed(self.demo.cancel) {
            info!(frame = input.frame(), "Cancel");
        }
        if pressed(self.demo.action) {
            info!(frame = input.frame(), "Action");
        }
        if let Some(axis) = self.demo.horizontal.and_then(|h| input.axis(h))
            && axis.pressed()
        {
            debug!(sign = axis.pressed_sign(), "Horizontal");
        }
        if let Some(stick) = self.demo.movement.and_then(|h| input.stick(h))
            && stick.pressed()
        {
            debug!(direction = ?stick.direction(), value = ?stick.value(), "Move");
        }
        if !input.text().is_empty() {
            debug!(text = input.text(), "Text input");
        }
    }
}

/// Loads the configured binding set, falling back to the built-in one
pub fn load_bindings(config: &AppConfig) -> BindingSet {
    let Some(path) = config.bindings_path() else {
        info!("No binding set configured, using built-in bindings");
        return BindingSet::builtin();
    };

    match BindingSet::load(&path) {
        Ok(bindings) => bindings,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load bindings, using built-in bindings");
            BindingSet::builtin()
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = window_attributes_from_config(&self.config.window);

            match event_loop.create_window(window_attributes) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!(
                        window.width = size.width,
                        window.height = size.height,
                        "Window created successfully"
                    );
                    self.platform.set_scale_factor(window.scale_factor() as f32);
                    self.window = Some(Arc::new(window));
                }
                Err(e) => {
                    error!(error = %e, "Failed to create window");
                    event_loop.exit();
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(feature = "gamepad")]
        if let Some(gamepads) = &mut self.gamepads {
            gamepads.poll(&mut self.pending);
        }
        self.flush_pending();

        // Step BEFORE anything reads input this frame
        self.input.step(self.started.elapsed());
        self.report_demo_inputs();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.platform.translate(&event, &mut self.pending);
        self.flush_pending();

        if let WindowEvent::CloseRequested = event {
            info!("Close requested, exiting");
            event_loop.exit();
        }
    }
}
