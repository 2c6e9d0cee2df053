//! Event bus for show-level notifications.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use skyburst_common::FireworkId;

/// Default channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Things that happen to fireworks during a show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShowEvent {
    /// A firework was accepted and started its launch
    Spawned {
        /// Firework ID
        id: FireworkId,
    },
    /// The launch trail reached its target and the burst began
    Exploded {
        /// Firework ID
        id: FireworkId,
        /// Stars across all layers
        particles: usize,
    },
    /// The burst finished and the firework was released
    Completed {
        /// Firework ID
        id: FireworkId,
    },
    /// The firework was removed before it completed
    Removed {
        /// Firework ID
        id: FireworkId,
    },
}

impl ShowEvent {
    /// Firework the event is about.
    #[must_use]
    pub const fn id(&self) -> FireworkId {
        match self {
            Self::Spawned { id }
            | Self::Exploded { id, .. }
            | Self::Completed { id }
            | Self::Removed { id } => *id,
        }
    }
}

/// Bounded queue of [`ShowEvent`]s, drained by the show loop once per step.
///
/// Publishing never blocks. When the queue is full the event is discarded
/// and counted, so a caller that drains late can tell its totals are short.
#[derive(Debug)]
pub struct EventBus {
    /// Publishing side
    sender: Sender<ShowEvent>,
    /// Draining side
    receiver: Receiver<ShowEvent>,
    /// Events discarded because the queue was full
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            dropped: 0,
        }
    }

    /// Queues an event. Returns `false` and counts it as dropped if the
    /// queue is full.
    pub fn publish(&mut self, event: ShowEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                if self.dropped == 1 {
                    warn!(capacity = self.capacity(), "event bus full, dropping events");
                }
                false
            },
        }
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> Vec<ShowEvent> {
        self.receiver.try_iter().collect()
    }

    /// Events waiting to be drained.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Most events the bus holds at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.receiver.capacity().unwrap_or(DEFAULT_EVENT_CAPACITY)
    }

    /// Events discarded since the bus was created.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}
