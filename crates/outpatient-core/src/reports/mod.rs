//! Read-only reports over engine state.
//!
//! Each report is a plain serializable value with a pretty JSON form and a
//! `Display` text form. Nothing here mutates the engine.

mod doctor;
mod summary;

pub use doctor::*;
pub use summary::*;

use crate::engine::SchedulingEngine;

/// Builds reports from a borrowed engine.
pub struct ReportBuilder<'a> {
    engine: &'a SchedulingEngine,
}

impl<'a> ReportBuilder<'a> {
    /// Create a report builder.
    pub fn new(engine: &'a SchedulingEngine) -> Self {
        Self { engine }
    }
}
