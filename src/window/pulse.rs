//! Cosmetic acknowledgment pulses.
//!
//! A pulse is purely presentational: scheduling one never delays or gates a
//! state change, and scheduling a new pulse for a panel replaces whatever was
//! running for it.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseReason {
    EnterFullscreen,
    ExitFullscreen,
    DragDropped,
}

#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    pub reason: PulseReason,
    pub started: Instant,
    // bumps on every schedule so a renderer can restart its animation
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct PulseTracker {
    duration: Duration,
    active: BTreeMap<PanelId, Pulse>,
    generation: u64,
}

impl PulseTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn schedule(&mut self, id: PanelId, reason: PulseReason, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        let replaced = self.active.insert(
            id,
            Pulse {
                reason,
                started: now,
                generation: self.generation,
            },
        );
        if let Some(prev) = replaced {
            tracing::trace!(panel = %id, reason = ?prev.reason, "pulse cancelled");
        }
    }

    pub fn cancel(&mut self, id: PanelId) {
        self.active.remove(&id);
    }

    pub fn get(&self, id: PanelId, now: Instant) -> Option<Pulse> {
        self.active
            .get(&id)
            .copied()
            .filter(|pulse| now.saturating_duration_since(pulse.started) < self.duration)
    }

    /// Drop finished pulses; returns how many ended.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        let duration = self.duration;
        self.active
            .retain(|_, pulse| now.saturating_duration_since(pulse.started) < duration);
        before - self.active.len()
    }
}
