//! Launch triggers.
//!
//! A [`Trigger`] is a request to fire one firework. The [`LaunchPlanner`]
//! turns it into a [`FireworkSpec`] by picking a launch point and filling in
//! the show's current firework template. [`AutoLauncher`] produces timer
//! triggers at a fixed interval.

use glam::Vec3;
use skyburst_common::{Color, SkyburstResult};
use skyburst_kernel::PixelGrid;

use crate::spec::{FireworkSpec, LayerCompletion, DEFAULT_LAUNCH_DURATION};

/// Screen pixels per world unit when mapping a jump to a launch point.
pub const PIXELS_PER_WORLD_UNIT: f32 = 30.0;

/// A request to launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Launch button pressed
    Button,
    /// Auto-launch interval elapsed
    Timer,
    /// Jump detected at normalized screen X (0 = left edge, 1 = right edge)
    Jump {
        /// Mean hip X
        hip_x: f32,
    },
}

/// Which firework family to fly.
#[derive(Debug, Clone, PartialEq)]
pub enum FireworkStyle {
    /// Plain spherical burst
    Peony,
    /// Spherical burst with sparkle trail
    Chrysanthemum,
    /// Pixel-art burst
    Illustration(PixelGrid),
}

/// Everything about a firework except where it flies.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworkTemplate {
    /// Family
    pub style: FireworkStyle,
    /// Base color
    pub color: Color,
    /// Size factor
    pub size: f32,
    /// Peony layers
    pub layers: u32,
    /// Launch seconds
    pub launch_duration: f32,
    /// Multi-layer completion rule
    pub layer_completion: LayerCompletion,
    /// Extra lifetime per successive layer, in seconds
    pub layer_stagger: f32,
}

impl Default for FireworkTemplate {
    fn default() -> Self {
        Self {
            style: FireworkStyle::Peony,
            color: Color::rgb(1.0, 1.0, 0.0),
            size: 1.0,
            layers: 1,
            launch_duration: DEFAULT_LAUNCH_DURATION,
            layer_completion: LayerCompletion::AllLayers,
            layer_stagger: 0.0,
        }
    }
}

impl FireworkTemplate {
    /// Spec for a firework flying from `origin` to `target`.
    #[must_use]
    pub fn spec(&self, origin: Vec3, target: Vec3) -> FireworkSpec {
        let spec = match &self.style {
            FireworkStyle::Peony => FireworkSpec::peony(origin, target, self.color),
            FireworkStyle::Chrysanthemum => FireworkSpec::chrysanthemum(origin, target, self.color),
            FireworkStyle::Illustration(grid) => {
                FireworkSpec::illustration(origin, target, self.color, grid.clone())
            },
        };
        spec.with_size(self.size)
            .with_layers(self.layers)
            .with_launch_duration(self.launch_duration)
            .with_layer_completion(self.layer_completion)
            .with_layer_stagger(self.layer_stagger)
    }
}

/// Where launches start and how high they burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSite {
    /// Launch Y
    pub floor_y: f32,
    /// Burst height above the launch point
    pub explosion_height: f32,
    /// Width of the random X/Z band for button and timer launches
    pub spread: f32,
    /// Camera viewport width in pixels, for jump mapping
    pub viewport_width: f32,
}

impl Default for LaunchSite {
    fn default() -> Self {
        Self {
            floor_y: -10.0,
            explosion_height: 10.0,
            spread: 10.0,
            viewport_width: 1280.0,
        }
    }
}

/// Turns triggers into firework specs.
#[derive(Debug, Clone)]
pub struct LaunchPlanner {
    /// Launch geometry
    site: LaunchSite,
    /// Current firework template
    template: FireworkTemplate,
    /// Placement randomness
    rng: fastrand::Rng,
}

impl LaunchPlanner {
    /// Creates a planner with random placement.
    #[must_use]
    pub fn new(site: LaunchSite, template: FireworkTemplate) -> Self {
        Self {
            site,
            template,
            rng: fastrand::Rng::new(),
        }
    }

    /// Makes placement deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Launch point for a trigger.
    pub fn origin(&mut self, trigger: Trigger) -> Vec3 {
        match trigger {
            Trigger::Button | Trigger::Timer => {
                let x = (self.rng.f32() - 0.5) * self.site.spread;
                let z = (self.rng.f32() - 0.5) * self.site.spread;
                Vec3::new(x, self.site.floor_y, z)
            },
            Trigger::Jump { hip_x } => {
                let x = (hip_x - 0.5) * self.site.viewport_width / PIXELS_PER_WORLD_UNIT;
                Vec3::new(x, self.site.floor_y, 0.0)
            },
        }
    }

    /// Validated spec for a trigger.
    pub fn plan(&mut self, trigger: Trigger) -> SkyburstResult<FireworkSpec> {
        let origin = self.origin(trigger);
        let target = origin + Vec3::new(0.0, self.site.explosion_height, 0.0);
        let spec = self.template.spec(origin, target);
        spec.validate()?;
        Ok(spec)
    }

    /// Replaces the firework template.
    pub fn set_template(&mut self, template: FireworkTemplate) {
        self.template = template;
    }

    /// Current firework template.
    #[must_use]
    pub const fn template(&self) -> &FireworkTemplate {
        &self.template
    }

    /// Launch geometry.
    #[must_use]
    pub const fn site(&self) -> &LaunchSite {
        &self.site
    }
}

/// Most timer launches a single tick can report.
pub const MAX_LAUNCHES_PER_TICK: u32 = 4;

/// Fires a timer trigger every `interval` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoLauncher {
    /// Seconds between launches; zero or less disables
    interval: f32,
    /// Seconds since the last launch
    accumulator: f32,
}

impl AutoLauncher {
    /// Creates a launcher. The first launch happens after one full interval.
    #[must_use]
    pub const fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Whether the launcher ever fires.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.interval.is_finite() && self.interval > 0.0
    }

    /// Advances by `dt` and returns how many launches fell due, at most
    /// [`MAX_LAUNCHES_PER_TICK`]. Time past the cap is dropped.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.is_enabled() || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        if self.accumulator < self.interval {
            return 0;
        }

        let due = (self.accumulator / self.interval).floor();
        if due >= MAX_LAUNCHES_PER_TICK as f32 {
            self.accumulator = 0.0;
            return MAX_LAUNCHES_PER_TICK;
        }
        self.accumulator = (self.accumulator - due * self.interval).max(0.0);
        due as u32
    }

    /// Seconds between launches.
    #[must_use]
    pub const fn interval(&self) -> f32 {
        self.interval
    }
}
