use std::io;
use std::thread;
use std::time::Duration;

use sdl2::keyboard::Keycode;

use wireshade::config::{parse_args, usage, CliAction, CliOptions, Config};
use wireshade::control::Command;
use wireshade::display::{Display, FrameBuffer, InputEvent, RenderTarget};
use wireshade::util::Rng;
use wireshade::{Error, HullSet, Point2D, Renderer, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Solid,
    Hull,
}

/// Everything the event loop mutates between frames
struct Viewer {
    config: Config,
    renderer: Renderer,
    hull: HullSet,
    rng: Rng,
    mode: AppMode,
    /// Last mouse position while a drag is in progress
    drag_from: Option<(i32, i32)>,
    dirty: bool,
}

impl Viewer {
    fn new(config: Config) -> Self {
        let mut rng = config.hull.seed.map_or_else(Rng::from_time, Rng::new);
        let mut hull = HullSet::new();
        hull.regenerate(
            config.hull.random_points,
            config.hull_x_range(),
            config.hull_y_range(),
            &mut rng,
        );
        Self {
            renderer: Renderer::new(&config),
            config,
            hull,
            rng,
            mode: AppMode::Solid,
            drag_from: None,
            dirty: true,
        }
    }

    /// Apply one command; returns false when the viewer should exit
    fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => return false,
            Command::Drag { dx, dy } => self.renderer.on_drag_delta(dx, dy),
            Command::Size { steps } => self
                .renderer
                .on_size_delta(steps.saturating_mul(self.config.solid.size_step)),
            Command::Closeness { steps } => self
                .renderer
                .on_closeness_delta(steps.saturating_mul(self.config.solid.closeness_step)),
            Command::ToggleMode => {
                self.mode = match self.mode {
                    AppMode::Solid => AppMode::Hull,
                    AppMode::Hull => AppMode::Solid,
                };
                self.drag_from = None;
                println!("Mode: {:?}", self.mode);
            },
            Command::Regenerate { count } => {
                let n = count.unwrap_or(self.config.hull.random_points);
                self.hull.regenerate(
                    n,
                    self.config.hull_x_range(),
                    self.config.hull_y_range(),
                    &mut self.rng,
                );
                println!("Hull: {} points, {} on the hull", self.hull.len(), self.hull.hull().len());
            },
            Command::AddPoint { x, y } => self.hull.push(Point2D::new(x, y)),
            Command::Clear => self.hull.clear(),
        }
        self.dirty = true;
        true
    }

    /// Translate a window event; returns false when the viewer should exit
    fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Quit => false,
            InputEvent::KeyDown(key) => match key_command(key, self.mode) {
                Some(cmd) => self.apply(cmd),
                None => true,
            },
            InputEvent::MouseDown { x, y } => match self.mode {
                AppMode::Solid => {
                    // Only a press on the solid itself starts a drag
                    if self.renderer.hit_test(x, y) {
                        self.drag_from = Some((x, y));
                    }
                    true
                },
                AppMode::Hull => self.apply(Command::AddPoint { x, y }),
            },
            InputEvent::MouseMove { x, y } => match self.drag_from {
                Some((px, py)) if (x, y) != (px, py) => {
                    self.drag_from = Some((x, y));
                    self.apply(Command::Drag {
                        dx: x - px,
                        dy: y - py,
                    })
                },
                _ => true,
            },
            InputEvent::MouseUp { .. } => {
                self.drag_from = None;
                true
            },
        }
    }

    fn render(&mut self) -> &FrameBuffer {
        self.dirty = false;
        match self.mode {
            AppMode::Solid => self.renderer.render_frame(),
            AppMode::Hull => self.renderer.render_hull(&self.hull),
        }
    }
}

fn key_command(key: Keycode, mode: AppMode) -> Option<Command> {
    let cmd = match key {
        Keycode::Escape => Command::Quit,
        Keycode::Tab => Command::ToggleMode,
        Keycode::Equals | Keycode::KpPlus => Command::Size { steps: 1 },
        Keycode::Minus | Keycode::KpMinus => Command::Size { steps: -1 },
        Keycode::RightBracket => Command::Closeness { steps: 1 },
        Keycode::LeftBracket => Command::Closeness { steps: -1 },
        Keycode::R if mode == AppMode::Hull => Command::Regenerate { count: None },
        Keycode::C if mode == AppMode::Hull => Command::Clear,
        _ => return None,
    };
    Some(cmd)
}

/// Load the config file, falling back to defaults when it does not exist
fn load_config(options: &CliOptions) -> Result<Config> {
    let mut config = match Config::load(&options.config_path) {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("config: {} not found, using defaults", options.config_path);
            Config::default()
        },
        Err(e) => return Err(e),
    };
    config.apply(options);
    config.validate()?;
    Ok(config)
}

/// Remote command sources; each one is optional and failures only disable it
struct Remotes {
    #[cfg(unix)]
    socket: Option<wireshade::control::Controller>,
    #[cfg(feature = "mqtt")]
    mqtt: Option<wireshade::mqtt::MqttClient>,
}

impl Remotes {
    fn connect(config: &Config) -> Self {
        #[cfg(unix)]
        let socket = config.control_socket.as_ref().and_then(|path| {
            match wireshade::control::Controller::bind(path) {
                Ok(controller) => {
                    println!("Control socket: {}", controller.path().display());
                    Some(controller)
                },
                Err(e) => {
                    eprintln!("control: {}", e);
                    None
                },
            }
        });

        #[cfg(feature = "mqtt")]
        let mqtt = config.mqtt.as_ref().and_then(|m| {
            match wireshade::mqtt::MqttClient::new(&m.host, &m.topic) {
                Ok(client) => Some(client),
                Err(e) => {
                    eprintln!("MQTT: {}", e);
                    None
                },
            }
        });
        #[cfg(not(feature = "mqtt"))]
        if config.mqtt.is_some() {
            eprintln!("MQTT: support not compiled in, rebuild with --features mqtt");
        }

        Self {
            #[cfg(unix)]
            socket,
            #[cfg(feature = "mqtt")]
            mqtt,
        }
    }

    fn poll(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        #[cfg(unix)]
        if let Some(socket) = &self.socket {
            commands.extend(socket.poll());
        }
        #[cfg(feature = "mqtt")]
        if let Some(mqtt) = &self.mqtt {
            commands.extend(mqtt.poll());
        }
        commands
    }
}

fn print_banner(config: &Config) {
    println!("=== wireshade ===");
    println!("Resolution: {}x{}", config.width, config.height);
    if config.vsync {
        println!("VSync: ON. Use --no-vsync to disable.");
    } else {
        println!("VSync: OFF");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Tab        - Switch between solid and hull view");
    println!("  Escape     - Quit");
    println!();
    println!("Solid view:");
    println!("  Drag       - Move the solid (press on the solid)");
    println!("  = / -      - Grow / shrink");
    println!("  ] / [      - Closer / farther");
    println!();
    println!("Hull view:");
    println!("  Click      - Add a point");
    println!("  R          - Regenerate {} random points", config.hull.random_points);
    println!("  C          - Clear all points");
}

fn main() -> Result<()> {
    let options = match parse_args(std::env::args().skip(1)) {
        CliAction::Run(options) => options,
        CliAction::Help => {
            println!("{}", usage());
            return Ok(());
        },
    };
    let config = load_config(&options)?;

    let (mut display, texture_creator) =
        Display::with_options("wireshade", config.width, config.height, config.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, config.width, config.height)?;

    print_banner(&config);
    let remotes = Remotes::connect(&config);
    let vsync = config.vsync;
    let mut viewer = Viewer::new(config);

    'main: loop {
        for event in display.poll_events() {
            if !viewer.handle_event(&event) {
                break 'main;
            }
        }
        for cmd in remotes.poll() {
            if !viewer.apply(cmd) {
                break 'main;
            }
        }

        if viewer.dirty {
            let frame = viewer.render();
            display.present(&mut target, frame)?;
        } else if !vsync {
            // Nothing changed; avoid spinning
            thread::sleep(Duration::from_millis(5));
        } else {
            display.present(&mut target, viewer.renderer.frame())?;
        }
    }

    Ok(())
}
