//! Scene coordination.
//!
//! The [`SceneCoordinator`] owns every active firework in a map keyed by
//! [`FireworkId`]. It spawns controllers from accepted triggers, advances
//! them each frame, removes the ones that completed and publishes what
//! happened on its [`EventBus`].
//!
//! Controllers never reach back into the coordinator. Completion is observed
//! through the tick result, so removal happens after iteration and the map is
//! never mutated while it is being walked.

use ahash::AHashMap;
use skyburst_common::{FireworkId, SkyburstResult};
use skyburst_kernel::RenderSurface;
use tracing::{info, warn};

use crate::events::{EventBus, ShowEvent};
use crate::lifecycle::{LifecycleController, LifecycleState, Transition};
use crate::spec::FireworkSpec;
use crate::trigger::{LaunchPlanner, Trigger};

/// Summary of one coordinator tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Fireworks whose burst began this tick
    pub exploded: Vec<FireworkId>,
    /// Fireworks that completed and were removed this tick
    pub completed: Vec<FireworkId>,
}

/// The set of in-flight fireworks.
#[derive(Debug, Default)]
pub struct SceneCoordinator {
    /// Active fireworks
    active: AHashMap<FireworkId, LifecycleController>,
    /// Show events
    events: EventBus,
    /// Seed source for deterministic fireworks
    seeds: Option<fastrand::Rng>,
}

impl SceneCoordinator {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every spawned firework a seed derived from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = Some(fastrand::Rng::with_seed(seed));
        self
    }

    /// Uses `events` as the show event bus.
    #[must_use]
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Validates `spec` and adds a launching firework.
    pub fn spawn(&mut self, spec: FireworkSpec) -> SkyburstResult<FireworkId> {
        let controller = self.controller(spec)?;
        Ok(self.insert(controller))
    }

    /// Like [`spawn`](Self::spawn), with a callback fired once on completion.
    pub fn spawn_with(
        &mut self,
        spec: FireworkSpec,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> SkyburstResult<FireworkId> {
        let controller = self.controller(spec)?.with_on_complete(on_complete);
        Ok(self.insert(controller))
    }

    /// Plans and spawns a firework for `trigger`.
    pub fn launch(
        &mut self,
        planner: &mut LaunchPlanner,
        trigger: Trigger,
    ) -> SkyburstResult<FireworkId> {
        let spec = planner.plan(trigger).map_err(|error| {
            warn!(%error, ?trigger, "trigger rejected");
            error
        })?;
        self.spawn(spec)
    }

    fn controller(&mut self, spec: FireworkSpec) -> SkyburstResult<LifecycleController> {
        let controller = LifecycleController::new(spec).map_err(|error| {
            warn!(%error, "firework rejected");
            error
        })?;
        Ok(match self.seeds.as_mut() {
            Some(seeds) => controller.with_seed(seeds.u64(..)),
            None => controller,
        })
    }

    fn insert(&mut self, controller: LifecycleController) -> FireworkId {
        let id = FireworkId::new();
        let spec = controller.spec();
        info!(%id, origin = ?spec.origin, target = ?spec.target, "firework spawned");
        self.active.insert(id, controller);
        self.events.publish(ShowEvent::Spawned { id });
        id
    }

    /// Advances every active firework by `dt` and drops the completed ones.
    pub fn update(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();

        for (id, controller) in &mut self.active {
            match controller.update(dt) {
                Transition::Exploded => {
                    self.events.publish(ShowEvent::Exploded {
                        id: *id,
                        particles: controller.particle_count(),
                    });
                    report.exploded.push(*id);
                },
                Transition::Completed => report.completed.push(*id),
                Transition::Unchanged => {},
            }
        }

        for id in &report.completed {
            if let Some(mut controller) = self.active.remove(id) {
                controller.dispose();
            }
            info!(%id, "firework completed");
            self.events.publish(ShowEvent::Completed { id: *id });
        }

        report
    }

    /// Renders every active firework.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        for controller in self.active.values() {
            controller.render(surface);
        }
    }

    /// Removes a firework before it completes. Returns whether it was active.
    pub fn remove(&mut self, id: FireworkId) -> bool {
        let Some(mut controller) = self.active.remove(&id) else {
            return false;
        };
        controller.dispose();
        info!(%id, "firework removed");
        self.events.publish(ShowEvent::Removed { id });
        true
    }

    /// Removes every active firework.
    pub fn clear(&mut self) {
        let ids: Vec<FireworkId> = self.active.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Number of active fireworks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether `id` is still active.
    #[must_use]
    pub fn contains(&self, id: FireworkId) -> bool {
        self.active.contains_key(&id)
    }

    /// Phase of an active firework.
    #[must_use]
    pub fn state(&self, id: FireworkId) -> Option<LifecycleState> {
        self.active.get(&id).map(LifecycleController::state)
    }

    /// Stars across every exploding firework.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.active.values().map(LifecycleController::particle_count).sum()
    }

    /// Active firework IDs, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = FireworkId> + '_ {
        self.active.keys().copied()
    }

    /// Drains pending show events.
    pub fn drain_events(&self) -> Vec<ShowEvent> {
        self.events.drain()
    }

    /// The show event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }
}
