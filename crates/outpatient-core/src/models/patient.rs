//! Patient models.

use serde::{Deserialize, Serialize};

use super::PatientId;

/// A patient record as held by the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Caller-assigned identifier
    pub id: PatientId,
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Free-text medical history
    pub history: String,
    /// Number of bookings, triage admissions and serves seen for this patient
    pub frequency: u32,
}

impl Patient {
    /// Create a patient with a zero visit frequency.
    pub fn new(id: PatientId, name: impl Into<String>, age: u32, history: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            history: history.into(),
            frequency: 0,
        }
    }

    /// Name with the `_` word separators used by line-oriented input turned into spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }
}
