//! Viewer configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below. Command line flags are applied on top.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::display::{Rgb, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::raster::Sphere;
use crate::solid::{SolidParams, MAX_EXPANSION};

pub const DEFAULT_CONFIG_PATH: &str = "wireshade.json";
pub const DEFAULT_MQTT_TOPIC: &str = "wireshade";

/// Colors for every surface the viewer draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub edge: Rgb,
    pub solid: Rgb,
    pub sphere: Rgb,
    pub hull_points: Rgb,
    pub hull_outline: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: (255, 255, 255),
            edge: (0, 0, 0),
            solid: (0, 0, 255),
            sphere: (255, 0, 0),
            hull_points: (0, 0, 0),
            hull_outline: (255, 0, 0),
        }
    }
}

/// Depth shading coefficient per surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shading {
    pub edge: f64,
    pub solid: f64,
    pub sphere: f64,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            edge: 0.0,
            solid: 0.4,
            sphere: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidConfig {
    pub initial: SolidParams,
    /// Expansion change per size button press
    pub size_step: i32,
    /// Depth change per closeness button press
    pub closeness_step: i32,
    pub min_expansion: i32,
}

impl Default for SolidConfig {
    fn default() -> Self {
        Self {
            initial: SolidParams::default(),
            size_step: 5,
            closeness_step: 10,
            min_expansion: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Points generated by a regenerate request
    pub random_points: usize,
    /// Inclusive x bounds; defaults to the middle half of the window
    pub x_range: Option<(i32, i32)>,
    /// Inclusive y bounds; defaults to the middle half of the window
    pub y_range: Option<(i32, i32)>,
    /// Fixed seed for reproducible point sets
    pub seed: Option<u64>,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            random_points: 50,
            x_range: None,
            y_range: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_topic() -> String {
    DEFAULT_MQTT_TOPIC.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub palette: Palette,
    pub shading: Shading,
    pub solid: SolidConfig,
    pub sphere: Sphere,
    pub hull: HullConfig,
    pub mqtt: Option<MqttConfig>,
    pub control_socket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            palette: Palette::default(),
            shading: Shading::default(),
            solid: SolidConfig::default(),
            sphere: Sphere::new(200, 200, 200.0, 80),
            hull: HullConfig::default(),
            mqtt: None,
            control_socket: None,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.solid.min_expansion < 1 {
            return Err(Error::Config("solid.min_expansion must be at least 1".into()));
        }
        let expansion = self.solid.initial.expansion;
        if expansion < self.solid.min_expansion || expansion > MAX_EXPANSION {
            return Err(Error::Config(format!(
                "solid.initial.expansion must be within {}..={}, got {}",
                self.solid.min_expansion, MAX_EXPANSION, expansion
            )));
        }
        if self.sphere.radius < 0 {
            return Err(Error::Config("sphere.radius must not be negative".into()));
        }
        for (name, range) in [("x_range", self.hull.x_range), ("y_range", self.hull.y_range)] {
            if let Some((lo, hi)) = range {
                if lo > hi {
                    return Err(Error::Config(format!("hull.{} is empty: {}..={}", name, lo, hi)));
                }
            }
        }
        Ok(())
    }

    /// Horizontal bounds for random hull points
    pub fn hull_x_range(&self) -> RangeInclusive<i32> {
        let (lo, hi) = self
            .hull
            .x_range
            .unwrap_or((self.width as i32 / 4, 3 * self.width as i32 / 4));
        lo..=hi
    }

    /// Vertical bounds for random hull points
    pub fn hull_y_range(&self) -> RangeInclusive<i32> {
        let (lo, hi) = self
            .hull
            .y_range
            .unwrap_or((self.height as i32 / 4, 3 * self.height as i32 / 4));
        lo..=hi
    }

    /// Apply command line overrides
    pub fn apply(&mut self, options: &CliOptions) {
        if let Some(w) = options.width {
            self.width = w;
        }
        if let Some(h) = options.height {
            self.height = h;
        }
        if options.no_vsync {
            self.vsync = false;
        }
        if let Some(host) = &options.mqtt_host {
            let topic = options
                .mqtt_topic
                .clone()
                .or_else(|| self.mqtt.as_ref().map(|m| m.topic.clone()))
                .unwrap_or_else(default_topic);
            self.mqtt = Some(MqttConfig {
                host: host.clone(),
                topic,
            });
        } else if let (Some(topic), Some(mqtt)) = (&options.mqtt_topic, self.mqtt.as_mut()) {
            mqtt.topic = topic.clone();
        }
        if let Some(socket) = &options.socket {
            self.control_socket = Some(socket.clone());
        }
    }
}

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub no_vsync: bool,
    pub mqtt_host: Option<String>,
    pub mqtt_topic: Option<String>,
    pub socket: Option<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            width: None,
            height: None,
            no_vsync: false,
            mqtt_host: None,
            mqtt_topic: None,
            socket: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(CliOptions),
    Help,
}

/// Parse command line arguments (without the program name).
/// Unknown flags and unparsable values are ignored.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> CliAction {
    let args: Vec<String> = args.into_iter().collect();
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--no-vsync" => options.no_vsync = true,
            "--width" | "-w" => {
                options.width = value.and_then(|v| v.parse().ok()).or(options.width);
                i += 1;
            },
            "--height" | "-h" => {
                options.height = value.and_then(|v| v.parse().ok()).or(options.height);
                i += 1;
            },
            "--resolution" | "-r" => {
                // WxH, e.g. 1920x1080
                if let Some((w, h)) = value.and_then(|v| v.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                        options.width = Some(w);
                        options.height = Some(h);
                    }
                }
                i += 1;
            },
            "--config" | "-c" => {
                if let Some(v) = value {
                    options.config_path = v.clone();
                }
                i += 1;
            },
            "--mqtt" => {
                options.mqtt_host = value.cloned().or(options.mqtt_host);
                i += 1;
            },
            "--topic" => {
                options.mqtt_topic = value.cloned().or(options.mqtt_topic);
                i += 1;
            },
            "--socket" => {
                options.socket = value.cloned().or(options.socket);
                i += 1;
            },
            "--help" => return CliAction::Help,
            _ => {},
        }
        i += 1;
    }

    CliAction::Run(options)
}

pub fn usage() -> String {
    format!(
        "Usage: wireshade [OPTIONS]

Options:
  --width W, -w W           Set window width (default: {w})
  --height H, -h H          Set window height (default: {h})
  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)
  --no-vsync                Disable VSync
  --config PATH, -c PATH    Configuration file (default: {cfg})
  --mqtt HOST               Accept remote commands from an MQTT broker
  --topic TOPIC             MQTT topic (default: {topic})
  --socket PATH             Accept remote commands on a Unix socket
  --help                    Show this help message",
        w = DEFAULT_WIDTH,
        h = DEFAULT_HEIGHT,
        cfg = DEFAULT_CONFIG_PATH,
        topic = DEFAULT_MQTT_TOPIC,
    )
}
