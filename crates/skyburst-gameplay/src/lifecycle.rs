//! Firework lifecycle.
//!
//! A [`LifecycleController`] sequences one firework through
//! `Launching → Exploding → Completed`. It owns the launch emitter while
//! launching and the burst layers while exploding, never both: the emitter
//! is disposed on the same tick the layers are built.
//!
//! Completion is reported to the caller through [`Transition::Completed`]
//! and, when registered, through a one-shot callback. Neither can fire twice.

use std::fmt;

use skyburst_common::SkyburstResult;
use skyburst_kernel::{BurstSimulator, RenderSurface, TickOutcome, TrailEmitter};
use tracing::{debug, warn};

use crate::spec::{FireworkSpec, LayerCompletion};

/// Phase of a firework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Launch trail rising toward the target
    Launching,
    /// Burst layers animating
    Exploding,
    /// Finished; every further update is a no-op
    Completed,
}

/// What changed during one [`LifecycleController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same phase as before
    Unchanged,
    /// Launch finished and the burst began
    Exploded,
    /// Burst finished
    Completed,
}

/// One-shot completion callback.
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

/// Drives one firework from launch to extinguishment.
pub struct LifecycleController {
    /// What to fly
    spec: FireworkSpec,
    /// Current phase
    state: LifecycleState,
    /// Present only while launching
    emitter: Option<TrailEmitter>,
    /// Present only while exploding
    layers: Vec<BurstSimulator>,
    /// Per-layer completion flags, parallel to `layers`
    layer_done: Vec<bool>,
    /// Fired once on completion
    on_complete: Option<CompletionCallback>,
    /// Seed for deterministic sparkle
    seed: Option<u64>,
    /// Resources released
    disposed: bool,
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("state", &self.state)
            .field("layers", &self.layers.len())
            .field("has_callback", &self.on_complete.is_some())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl LifecycleController {
    /// Validates `spec` and starts the launch.
    pub fn new(spec: FireworkSpec) -> SkyburstResult<Self> {
        spec.validate()?;
        let emitter = TrailEmitter::new(spec.origin, spec.target, spec.launch_duration, spec.color)?;

        Ok(Self {
            spec,
            state: LifecycleState::Launching,
            emitter: Some(emitter),
            layers: Vec::new(),
            layer_done: Vec::new(),
            on_complete: None,
            seed: None,
            disposed: false,
        })
    }

    /// Registers a callback invoked exactly once when the firework completes.
    pub fn with_on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Makes launch and burst sparkle deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.emitter = self.emitter.take().map(|emitter| emitter.with_seed(seed));
        self.seed = Some(seed);
        self
    }

    /// Advances by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Transition {
        if self.disposed {
            return Transition::Unchanged;
        }
        match self.state {
            LifecycleState::Launching => self.update_launch(dt),
            LifecycleState::Exploding => self.update_burst(dt),
            LifecycleState::Completed => Transition::Unchanged,
        }
    }

    fn update_launch(&mut self, dt: f32) -> Transition {
        let Some(emitter) = self.emitter.as_mut() else {
            return Transition::Unchanged;
        };
        if !emitter.update(dt).is_completed() {
            return Transition::Unchanged;
        }

        emitter.dispose();
        self.emitter = None;
        self.explode();
        self.state = LifecycleState::Exploding;
        debug!(layers = self.layers.len(), "launching -> exploding");
        Transition::Exploded
    }

    fn explode(&mut self) {
        let center = self.spec.target;
        for index in 0..self.spec.layer_count {
            let layer = BurstSimulator::new(
                &self.spec.shape,
                center,
                self.spec.layer_color(index),
                self.spec.layer_size(index),
                self.spec.layer_params(index),
            );
            match layer {
                Ok(layer) => {
                    let layer = match self.seed {
                        Some(seed) => layer.with_seed(seed.wrapping_add(u64::from(index) + 1)),
                        None => layer,
                    };
                    self.layers.push(layer);
                    self.layer_done.push(false);
                },
                // Only reachable for specs mutated after validation
                Err(error) => warn!(%error, layer = index, "burst layer skipped"),
            }
        }
    }

    fn update_burst(&mut self, dt: f32) -> Transition {
        for (layer, done) in self.layers.iter_mut().zip(self.layer_done.iter_mut()) {
            if *done {
                continue;
            }
            if layer.update(dt) == TickOutcome::Completed {
                *done = true;
                layer.dispose();
            }
        }

        let finished = match self.spec.layer_completion {
            LayerCompletion::AllLayers => self.layer_done.iter().all(|done| *done),
            LayerCompletion::FirstLayer => {
                self.layer_done.is_empty() || self.layer_done.iter().any(|done| *done)
            },
        };
        if !finished {
            return Transition::Unchanged;
        }

        self.release_layers();
        self.state = LifecycleState::Completed;
        debug!("exploding -> completed");
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        Transition::Completed
    }

    /// Hands the active phase's buffers to the renderer.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        match self.state {
            LifecycleState::Launching => {
                if let Some(emitter) = &self.emitter {
                    emitter.render(surface);
                }
            },
            LifecycleState::Exploding => {
                for (layer, done) in self.layers.iter().zip(&self.layer_done) {
                    if !done {
                        layer.render(surface);
                    }
                }
            },
            LifecycleState::Completed => {},
        }
    }

    /// Releases the emitter and every burst layer. Idempotent.
    ///
    /// Disposing before completion does not fire the completion callback.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(mut emitter) = self.emitter.take() {
            emitter.dispose();
        }
        self.release_layers();
        self.on_complete = None;
        self.disposed = true;
    }

    fn release_layers(&mut self) {
        for layer in &mut self.layers {
            layer.dispose();
        }
        self.layers.clear();
        self.layer_done.clear();
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// The spec being flown.
    #[must_use]
    pub const fn spec(&self) -> &FireworkSpec {
        &self.spec
    }

    /// Launch emitter, while launching.
    #[must_use]
    pub const fn emitter(&self) -> Option<&TrailEmitter> {
        self.emitter.as_ref()
    }

    /// Burst layers, while exploding.
    #[must_use]
    pub fn layers(&self) -> &[BurstSimulator] {
        &self.layers
    }

    /// Stars across all live layers.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.layers
            .iter()
            .zip(&self.layer_done)
            .filter(|(_, done)| !**done)
            .map(|(layer, _)| layer.particle_count())
            .sum()
    }

    /// Whether the firework has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == LifecycleState::Completed
    }

    /// Whether resources have been released by [`dispose`](Self::dispose).
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }
}
