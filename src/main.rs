//! Diorama - an animated 3D scene
//!
//! Renders a small diorama of spinning and bouncing shapes under ambient,
//! hemisphere, and directional light with exponential fog.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use diorama::config::AppConfig;
use diorama::input::{InputAction, InputMapper};
use diorama::scene::Diorama;
use diorama::systems::{AnimationSystem, RenderError, RenderSystem, TitleStatus, WindowSystem};
use diorama_core::{AssetLoader, Scene};
use diorama_render::{Camera3D, Lighting};

/// Main application state
struct App {
    config: AppConfig,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
    diorama: Diorama,
    loader: AssetLoader,
    animation: AnimationSystem,
    camera: Camera3D,
    lighting: Lighting,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = Scene::load(&config.scene.path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load scene '{}': {}. Using the built-in diorama.",
                config.scene.path.display(),
                e
            );
            Scene::diorama()
        });

        let mut loader = AssetLoader::new(&config.scene.assets_dir);
        let diorama = Diorama::from_scene(&scene, &mut loader);

        Self {
            camera: config.camera(),
            lighting: config.lighting(),
            animation: AnimationSystem::new(config.debug.start_paused),
            window_system: None,
            render_system: None,
            diorama,
            loader,
            config,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window_system) = &self.window_system {
                    window_system.toggle_fullscreen();
                }
            }
            InputAction::TogglePause => {
                self.animation.toggle_pause();
                self.refresh_title();
            }
        }
    }

    fn refresh_title(&mut self) {
        let status = TitleStatus {
            paused: self.animation.is_paused(),
            loading: self.diorama.pending_count(),
        };
        if let Some(window_system) = &mut self.window_system {
            window_system.set_status(status);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let attached = self.diorama.attach_loaded(&mut self.loader);
        if attached > 0 {
            if !self.diorama.is_loading() {
                log::info!("All assets loaded ({} nodes)", self.diorama.graph.node_count());
            }
            self.refresh_title();
        }

        self.animation.update(&self.diorama.registry, &mut self.diorama.graph);

        if let Some(render_system) = &mut self.render_system {
            match render_system.render_frame(&self.diorama.graph, &self.camera, &self.lighting) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render_system.reconfigure(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        if let Some(window_system) = &self.window_system {
            window_system.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }

        let window_system = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window_system) => window_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system =
            match RenderSystem::new(window_system.window().clone(), self.config.rendering.clone()) {
                Ok(render_system) => render_system,
                Err(e) => {
                    log::error!("Failed to initialize rendering: {}", e);
                    event_loop.exit();
                    return;
                }
            };

        let (width, height) = render_system.size();
        self.camera.set_aspect(width, height);
        window_system.request_redraw();

        self.window_system = Some(window_system);
        self.render_system = Some(render_system);
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(physical_size.width, physical_size.height);
                }
                self.camera.set_aspect(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load();

    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Diorama ({})", InputMapper::help());

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
