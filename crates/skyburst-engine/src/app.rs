//! Show runner.
//!
//! Headless main loop: launches fireworks from the configured triggers,
//! steps the scene at a fixed timestep, packs every frame into GPU-ready
//! vertices and logs what happened once per simulated second.

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use skyburst_gameplay::{
    AutoLauncher, FireworkStyle, FireworkTemplate, IllustrationRecord, LaunchPlanner,
    SceneCoordinator, ShowEvent, Trigger,
};
use skyburst_kernel::{BatchKind, PointBatch, RenderSurface, VertexBuffer};

use crate::config::{ShowConfig, ShowShape};
use crate::timing::FrameTiming;

/// Render surface that packs vertices and counts what it was given.
#[derive(Debug, Default)]
pub struct FrameSurface {
    /// Packed vertices for the current frame
    vertices: VertexBuffer,
    /// Launch-trail points this frame
    trail_points: usize,
    /// Star points this frame
    star_points: usize,
    /// Sparkle-trail points this frame
    sparkle_points: usize,
}

impl FrameSurface {
    /// Starts a new frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.trail_points = 0;
        self.star_points = 0;
        self.sparkle_points = 0;
    }

    /// Points drawn this frame.
    pub fn point_count(&self) -> usize {
        self.vertices.len()
    }

    /// Bytes that would be uploaded this frame.
    pub fn byte_count(&self) -> usize {
        self.vertices.as_bytes().len()
    }
}

impl RenderSurface for FrameSurface {
    fn draw_points(&mut self, batch: &PointBatch<'_>) {
        match batch.kind {
            BatchKind::LaunchTrail => self.trail_points += batch.len(),
            BatchKind::Stars => self.star_points += batch.len(),
            BatchKind::SparkleTrail => self.sparkle_points += batch.len(),
        }
        self.vertices.draw_points(batch);
    }
}

/// Totals for a whole show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowStats {
    /// Simulation steps run
    pub steps: u64,
    /// Fireworks spawned
    pub launched: u32,
    /// Fireworks that reached their burst
    pub exploded: u32,
    /// Fireworks that completed
    pub completed: u32,
    /// Fireworks still in flight at shutdown
    pub removed: u32,
    /// Triggers rejected by validation
    pub rejected: u32,
    /// Most fireworks in flight at once
    pub peak_active: usize,
    /// Most points drawn in one frame
    pub peak_points: usize,
    /// Show events lost to a full bus
    pub dropped_events: u64,
}

/// Owns the scene and everything that feeds it.
pub struct ShowRunner {
    /// Validated configuration
    config: ShowConfig,
    /// Active fireworks
    scene: SceneCoordinator,
    /// Trigger to spec
    planner: LaunchPlanner,
    /// Timer triggers
    auto: AutoLauncher,
    /// Frame pacing
    timing: FrameTiming,
    /// Per-frame render target
    surface: FrameSurface,
    /// Running totals
    stats: ShowStats,
    /// Simulated seconds
    sim_time: f32,
    /// Last whole second logged
    logged_second: u32,
}

impl ShowRunner {
    /// Builds a runner from a configuration.
    pub fn new(mut config: ShowConfig) -> Result<Self> {
        config.validate();

        let template = FireworkTemplate {
            style: firework_style(&config)?,
            color: config.burst_color(),
            size: config.size,
            layers: config.layers,
            launch_duration: config.launch_duration,
            layer_completion: config.layer_completion,
            layer_stagger: config.layer_stagger,
        };

        let mut planner = LaunchPlanner::new(config.launch_site(), template);
        let mut scene = SceneCoordinator::new();
        if let Some(seed) = config.seed {
            planner = planner.with_seed(seed);
            scene = scene.with_seed(seed);
        }

        let mut timing = FrameTiming::new(config.target_fps);
        timing.set_fixed_dt(config.fixed_dt);

        Ok(Self {
            auto: AutoLauncher::new(config.auto_launch_interval),
            config,
            scene,
            planner,
            timing,
            surface: FrameSurface::default(),
            stats: ShowStats::default(),
            sim_time: 0.0,
            logged_second: 0,
        })
    }

    /// Runs the whole show and returns its totals.
    pub fn run(mut self) -> Result<ShowStats> {
        info!(
            shape = ?self.config.shape,
            seconds = self.config.run_seconds,
            realtime = self.config.realtime,
            "Show starting"
        );

        self.trigger(Trigger::Button);

        if self.config.realtime {
            info!("Pacing at {} fps", self.timing.target_fps());
            self.timing.reset();
            while self.sim_time < self.config.run_seconds {
                let dt = self.timing.delta_time();
                for _ in 0..self.timing.accumulate(dt) {
                    self.step();
                }
                self.render_frame();
                self.timing.sleep_remainder();
            }
        } else {
            let dt = self.timing.fixed_dt();
            let steps = (self.config.run_seconds / dt).ceil() as u64;
            for _ in 0..steps {
                self.step();
                self.render_frame();
            }
        }

        self.shutdown();
        Ok(self.stats)
    }

    fn trigger(&mut self, trigger: Trigger) {
        if self.scene.launch(&mut self.planner, trigger).is_err() {
            self.stats.rejected += 1;
        }
    }

    /// One fixed simulation step.
    fn step(&mut self) {
        let dt = self.timing.fixed_dt();

        for _ in 0..self.auto.tick(dt) {
            self.trigger(Trigger::Timer);
        }

        self.scene.update(dt);
        self.collect_events();

        self.stats.steps += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.scene.active_count());
        self.sim_time += dt;

        let second = self.sim_time as u32;
        if second > self.logged_second {
            self.logged_second = second;
            self.log_second(second);
        }
    }

    fn render_frame(&mut self) {
        self.surface.clear();
        self.scene.render(&mut self.surface);
        self.stats.peak_points = self.stats.peak_points.max(self.surface.point_count());
    }

    fn collect_events(&mut self) {
        for event in self.scene.drain_events() {
            debug!(id = %event.id(), ?event, "show event");
            match event {
                ShowEvent::Spawned { .. } => self.stats.launched += 1,
                ShowEvent::Exploded { .. } => self.stats.exploded += 1,
                ShowEvent::Completed { .. } => self.stats.completed += 1,
                ShowEvent::Removed { .. } => self.stats.removed += 1,
            }
        }
    }

    fn log_second(&self, second: u32) {
        info!(
            second,
            active = self.scene.active_count(),
            particles = self.scene.particle_count(),
            trail_points = self.surface.trail_points,
            star_points = self.surface.star_points,
            sparkle_points = self.surface.sparkle_points,
            bytes = self.surface.byte_count(),
            fps = self.timing.current_fps(),
            "Show stats"
        );
    }

    fn shutdown(&mut self) {
        let remaining = self.scene.active_count();
        if remaining > 0 {
            debug!(remaining, "Removing fireworks still in flight");
        }
        self.scene.clear();
        self.collect_events();
        self.stats.dropped_events = self.scene.events().dropped();
        if self.stats.dropped_events > 0 {
            warn!(dropped = self.stats.dropped_events, "Show totals are missing events");
        }
        info!(
            steps = self.stats.steps,
            launched = self.stats.launched,
            exploded = self.stats.exploded,
            completed = self.stats.completed,
            removed = self.stats.removed,
            rejected = self.stats.rejected,
            peak_active = self.stats.peak_active,
            peak_points = self.stats.peak_points,
            "Show finished"
        );
    }
}

/// Resolves the configured firework family, loading pixel art if needed.
fn firework_style(config: &ShowConfig) -> Result<FireworkStyle> {
    match config.shape {
        ShowShape::Peony => Ok(FireworkStyle::Peony),
        ShowShape::Chrysanthemum => Ok(FireworkStyle::Chrysanthemum),
        ShowShape::Illustration => {
            let Some(path) = &config.pixel_art_path else {
                bail!("shape = \"illustration\" needs pixel_art_path");
            };
            let record = IllustrationRecord::load(path)
                .with_context(|| format!("Failed to load pixel art from {}", path.display()))?;
            if !record.is_shareable {
                warn!(id = record.id, "Illustration is not marked shareable");
            }
            Ok(FireworkStyle::Illustration(record.to_grid()?))
        },
    }
}

/// Loads the configuration and runs one show.
pub fn run(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => ShowConfig::load_from(path),
        None => ShowConfig::load(),
    };
    let stats = ShowRunner::new(config)?.run()?;
    debug!(?stats, "Show totals");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_gameplay::LayerCompletion;

    fn quick_config() -> ShowConfig {
        ShowConfig {
            run_seconds: 8.0,
            auto_launch_interval: 0.0,
            seed: Some(7),
            ..ShowConfig::default()
        }
    }

    #[test]
    fn test_single_launch_runs_to_completion() {
        let stats = ShowRunner::new(quick_config())
            .expect("valid config")
            .run()
            .expect("show runs");

        assert_eq!(stats.launched, 1);
        assert_eq!(stats.exploded, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.removed, 0);
        assert_eq!(stats.peak_active, 1);
        assert!(stats.peak_points >= 400);
    }

    #[test]
    fn test_auto_launch_and_shutdown() {
        let config = ShowConfig {
            run_seconds: 3.0,
            auto_launch_interval: 0.9,
            ..quick_config()
        };
        let stats = ShowRunner::new(config).expect("valid config").run().expect("show runs");

        assert_eq!(stats.launched, 4);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.removed, 4);
        assert_eq!(stats.rejected, 0);
    }

    #[test]
    fn test_tiny_auto_launch_interval_stays_bounded() {
        let config = ShowConfig {
            run_seconds: 1.0,
            auto_launch_interval: 1e-10,
            ..quick_config()
        };
        let stats = ShowRunner::new(config).expect("valid config").run().expect("show runs");

        assert!(u64::from(stats.launched) <= stats.steps + 1);
        assert!(stats.launched > 1);
        assert_eq!(stats.removed, stats.launched);
        assert_eq!(stats.dropped_events, 0);
    }

    #[test]
    fn test_realtime_loop() {
        let config = ShowConfig {
            run_seconds: 0.05,
            realtime: true,
            ..quick_config()
        };
        let stats = ShowRunner::new(config).expect("valid config").run().expect("show runs");

        assert!(stats.steps >= 3);
        assert_eq!(stats.launched, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.rejected, 0);
    }

    #[test]
    fn test_staggered_layers_outlast_first_layer_rule() {
        let layered = ShowConfig {
            layers: 2,
            layer_stagger: 1.0,
            run_seconds: 6.5,
            ..quick_config()
        };
        let all = ShowRunner::new(layered.clone()).expect("valid config").run().expect("show runs");
        assert_eq!(all.completed, 0);
        assert_eq!(all.removed, 1);

        let first = ShowConfig {
            layer_completion: LayerCompletion::FirstLayer,
            ..layered
        };
        let first = ShowRunner::new(first).expect("valid config").run().expect("show runs");
        assert_eq!(first.completed, 1);
        assert_eq!(first.removed, 0);
    }

    #[test]
    fn test_layered_chrysanthemum() {
        let config = ShowConfig {
            shape: ShowShape::Chrysanthemum,
            layers: 2,
            layer_completion: LayerCompletion::FirstLayer,
            ..quick_config()
        };
        let stats = ShowRunner::new(config).expect("valid config").run().expect("show runs");
        assert_eq!(stats.completed, 1);
        assert!(stats.peak_points > 800);
    }

    #[test]
    fn test_illustration_needs_pixel_art() {
        let config = ShowConfig {
            shape: ShowShape::Illustration,
            ..quick_config()
        };
        assert!(ShowRunner::new(config).is_err());
    }

    #[test]
    fn test_illustration_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("star.json");
        std::fs::write(&path, r#"{"id": 5, "is_shareable": true, "pixel_data": [[0,1,0],[1,1,1],[0,1,0]]}"#)
            .expect("write");

        let config = ShowConfig {
            shape: ShowShape::Illustration,
            pixel_art_path: Some(path),
            ..quick_config()
        };
        let stats = ShowRunner::new(config).expect("valid config").run().expect("show runs");
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_frame_surface_counts_by_kind() {
        let positions = [skyburst_common::Vec3::ZERO; 3];
        let mut surface = FrameSurface::default();
        surface.draw_points(&PointBatch::new(
            BatchKind::Stars,
            &positions,
            skyburst_common::Color::WHITE,
            1.0,
            1.0,
        ));
        assert_eq!(surface.star_points, 3);
        assert_eq!(surface.point_count(), 3);
        assert_eq!(surface.byte_count(), 3 * skyburst_kernel::PointVertex::SIZE);

        surface.clear();
        assert_eq!(surface.point_count(), 0);
    }
}
