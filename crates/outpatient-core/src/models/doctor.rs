//! Doctor model.

use serde::{Deserialize, Serialize};

use super::DoctorId;
use crate::schedule::{RoutineQueue, SlotRegistry};

/// A doctor with their own slot schedule and routine queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
    /// Slots in insertion order
    pub slots: SlotRegistry,
    /// Bounded FIFO of routine tokens not tied to a slot
    pub queue: RoutineQueue,
}

impl Doctor {
    /// Create a doctor with an empty schedule and a queue of the given capacity.
    pub fn new(
        id: DoctorId,
        name: impl Into<String>,
        specialization: impl Into<String>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            specialization: specialization.into(),
            slots: SlotRegistry::new(),
            queue: RoutineQueue::with_capacity(queue_capacity),
        }
    }

    /// Work waiting for this doctor: queued tokens plus taken slots.
    pub fn pending_count(&self) -> usize {
        self.queue.len() + self.slots.taken_count()
    }
}
