//! Per-doctor and global scheduling structures.
//!
//! - [`SlotRegistry`]: ordered slots of one doctor, free or taken
//! - [`RoutineQueue`]: bounded FIFO of routine tokens for one doctor
//! - [`TriageQueue`]: global emergency priority queue

mod routine;
mod slots;
mod triage;

pub use routine::*;
pub use slots::*;
pub use triage::*;

use thiserror::Error;

use crate::models::SlotId;

/// Structure-level errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Queue is empty")]
    QueueEmpty,

    #[error("Slot {0} already exists")]
    DuplicateSlot(SlotId),

    #[error("Slot {0} not found")]
    SlotNotFound(SlotId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
