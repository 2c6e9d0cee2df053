//! Show configuration.
//!
//! Timing, launch geometry, firework template and trigger settings for a
//! headless show. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use skyburst_common::Color;
use skyburst_gameplay::{LaunchSite, LayerCompletion};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "skyburst.toml";

/// Color used when the configured one cannot be parsed.
const DEFAULT_COLOR: &str = "yellow";

/// Firework family selected in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowShape {
    /// Spherical burst
    #[default]
    Peony,
    /// Spherical burst with sparkle trail
    Chrysanthemum,
    /// Pixel-art burst, needs `pixel_art_path`
    Illustration,
}

/// Show configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    // === Timing ===
    /// Frames per second when running in real time
    pub target_fps: u32,
    /// Simulation step in seconds
    pub fixed_dt: f32,
    /// Show length in simulated seconds
    pub run_seconds: f32,
    /// Pace the loop against the wall clock
    pub realtime: bool,

    // === Launch ===
    /// Seconds a launch trail takes to reach its target
    pub launch_duration: f32,
    /// Burst height above the launch point
    pub explosion_height: f32,
    /// Launch Y
    pub launch_floor_y: f32,
    /// Width of the random X/Z band for button and timer launches
    pub launch_spread: f32,
    /// Camera viewport width in pixels, for jump mapping
    pub viewport_width: u32,

    // === Burst ===
    /// Firework family
    pub shape: ShowShape,
    /// CSS color name or `#rrggbb`
    pub color: String,
    /// Burst size factor
    pub size: f32,
    /// Concentric layers
    pub layers: u32,
    /// When a multi-layer burst counts as finished
    pub layer_completion: LayerCompletion,
    /// Extra burst seconds for each layer after the first
    pub layer_stagger: f32,

    // === Triggers ===
    /// Seconds between automatic launches (0 = disabled)
    pub auto_launch_interval: f32,
    /// Seed for deterministic placement and sparkle (None = random)
    pub seed: Option<u64>,

    // === Illustration ===
    /// JSON illustration record
    pub pixel_art_path: Option<PathBuf>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            // Timing
            target_fps: 60,
            fixed_dt: 1.0 / 60.0,
            run_seconds: 12.0,
            realtime: false,

            // Launch
            launch_duration: 2.0,
            explosion_height: 10.0,
            launch_floor_y: -10.0,
            launch_spread: 10.0,
            viewport_width: 1280,

            // Burst
            shape: ShowShape::Peony,
            color: DEFAULT_COLOR.to_string(),
            size: 1.0,
            layers: 1,
            layer_completion: LayerCompletion::AllLayers,
            layer_stagger: 0.0,

            // Triggers
            auto_launch_interval: 1.5,
            seed: None,

            pixel_art_path: None,
        }
    }
}

impl ShowConfig {
    /// Load configuration from `skyburst.toml` in the working directory.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Timing
        self.target_fps = self.target_fps.clamp(1, 240);
        self.fixed_dt = clamp_finite(self.fixed_dt, 0.001, 0.1, 1.0 / 60.0);
        self.run_seconds = clamp_finite(self.run_seconds, 0.0, 3600.0, 12.0);

        // Launch
        self.launch_duration = clamp_finite(self.launch_duration, 0.1, 10.0, 2.0);
        self.explosion_height = clamp_finite(self.explosion_height, 1.0, 100.0, 10.0);
        self.launch_floor_y = clamp_finite(self.launch_floor_y, -100.0, 100.0, -10.0);
        self.launch_spread = clamp_finite(self.launch_spread, 0.0, 100.0, 10.0);
        self.viewport_width = self.viewport_width.clamp(1, 7680);

        // Burst
        if Color::parse(&self.color).is_err() {
            warn!(color = %self.color, "Unknown color, using {DEFAULT_COLOR}");
            self.color = DEFAULT_COLOR.to_string();
        }
        self.size = clamp_finite(self.size, 0.1, 10.0, 1.0);
        self.layers = self.layers.clamp(1, 8);
        self.layer_stagger = clamp_finite(self.layer_stagger, 0.0, 10.0, 0.0);

        // Triggers
        self.auto_launch_interval = clamp_finite(self.auto_launch_interval, 0.0, 60.0, 0.0);
        if self.auto_launch_interval > 0.0 && self.auto_launch_interval < self.fixed_dt {
            warn!(
                interval = self.auto_launch_interval,
                "Auto-launch interval shorter than one step, using {}",
                self.fixed_dt
            );
            self.auto_launch_interval = self.fixed_dt;
        }
    }

    /// Parsed burst color.
    pub fn burst_color(&self) -> Color {
        Color::parse(&self.color).unwrap_or(Color::rgb(1.0, 1.0, 0.0))
    }

    /// Launch geometry for the planner.
    pub fn launch_site(&self) -> LaunchSite {
        LaunchSite {
            floor_y: self.launch_floor_y,
            explosion_height: self.explosion_height,
            spread: self.launch_spread,
            viewport_width: self.viewport_width as f32,
        }
    }
}

/// Clamps `value` into `[min, max]`, replacing NaN/inf with `fallback`.
fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
