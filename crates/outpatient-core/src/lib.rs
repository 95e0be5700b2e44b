//! Outpatient Core Library
//!
//! Scheduling engine for an outpatient department: doctor time slots, routine
//! visit queues, a global emergency triage stream, and single-step undo.
//!
//! # Architecture
//!
//! ```text
//!                         caller (CLI / host app)
//!                                  │
//!                       ┌──────────▼──────────┐
//!                       │  SchedulingEngine   │── issues token ids
//!                       └──┬──────┬──────┬────┘
//!                          │      │      │
//!          ┌───────────────┘      │      └────────────────┐
//!          ▼                      ▼                       ▼
//!   per doctor:            PatientRegistry           TriageQueue
//!   SlotRegistry           (frequency counter)       (severity, token id)
//!   RoutineQueue
//!                                  │
//!                     every committed mutation
//!                                  ▼
//!                              UndoLog ── undo_last() applies the inverse
//! ```
//!
//! # Serving order
//!
//! Emergencies preempt everything: `serve_next` takes the most urgent triage
//! entry regardless of which doctor asks, then the doctor's routine queue,
//! then the doctor's first booked slot.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Doctor, Slot, Token)
//! - [`schedule`]: Slot registry, routine queue and triage queue
//! - [`registry`]: Patient registry and name search
//! - [`undo`]: Undo records and log
//! - [`engine`]: The scheduling engine
//! - [`reports`]: Doctor, slot, summary and frequency reports

pub mod engine;
pub mod models;
pub mod registry;
pub mod reports;
pub mod schedule;
pub mod undo;

// Re-export commonly used types
pub use engine::{
    EngineConfig, EngineError, EngineResult, ErrorKind, SchedulingEngine, Served,
    DEFAULT_QUEUE_CAPACITY,
};
pub use models::{
    Doctor, DoctorId, Patient, PatientId, Severity, Slot, SlotId, Token, TokenId, TokenKind,
};
pub use registry::PatientRegistry;
pub use reports::ReportBuilder;
pub use undo::{ActionKind, ServeOrigin, UndoRecord};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

/// Number of matches returned by name search when the host passes no limit.
const DEFAULT_SEARCH_LIMIT: u32 = 10;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum OutpatientError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Undo conflict: {0}")]
    UndoConflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for OutpatientError {
    fn from(e: EngineError) -> Self {
        let message = e.to_string();
        match e.kind() {
            ErrorKind::NotFound => OutpatientError::NotFound(message),
            ErrorKind::AlreadyExists => OutpatientError::AlreadyExists(message),
            ErrorKind::Unavailable => OutpatientError::Unavailable(message),
            ErrorKind::UndoConflict => OutpatientError::UndoConflict(message),
        }
    }
}

impl From<serde_json::Error> for OutpatientError {
    fn from(e: serde_json::Error) -> Self {
        OutpatientError::Internal(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for OutpatientError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        OutpatientError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a scheduler. A zero capacity falls back to the built-in default.
#[uniffi::export]
pub fn new_scheduler(
    default_queue_capacity: u32,
    seed_sample_data: bool,
) -> Result<Arc<OutpatientCore>, OutpatientError> {
    let config = EngineConfig {
        default_queue_capacity: match default_queue_capacity {
            0 => DEFAULT_QUEUE_CAPACITY,
            n => n as usize,
        },
        seed_sample_data,
    };
    let engine = SchedulingEngine::from_config(config)?;
    Ok(Arc::new(OutpatientCore {
        engine: Arc::new(Mutex::new(engine)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine wrapper for FFI.
///
/// Every call takes the one lock for its whole duration, so operations are
/// strictly serialized.
#[derive(uniffi::Object)]
pub struct OutpatientCore {
    engine: Arc<Mutex<SchedulingEngine>>,
}

#[uniffi::export]
impl OutpatientCore {
    // =========================================================================
    // Doctor & Slot Operations
    // =========================================================================

    /// Add a doctor. `None` capacity uses the configured default.
    pub fn add_doctor(
        &self,
        doctor_id: u32,
        name: String,
        specialization: String,
        queue_capacity: Option<u32>,
    ) -> Result<(), OutpatientError> {
        let mut engine = self.engine.lock()?;
        let capacity = queue_capacity
            .map(|c| c as usize)
            .unwrap_or(engine.config().default_queue_capacity);
        engine.add_doctor(doctor_id, &name, &specialization, capacity)?;
        Ok(())
    }

    /// Append a free slot to a doctor's schedule.
    pub fn add_slot(
        &self,
        doctor_id: u32,
        slot_id: u32,
        start: String,
        end: String,
    ) -> Result<(), OutpatientError> {
        let mut engine = self.engine.lock()?;
        engine.add_slot(doctor_id, slot_id, &start, &end)?;
        Ok(())
    }

    /// Cancel a slot, returning it as it was before removal.
    pub fn cancel_slot(&self, doctor_id: u32, slot_id: u32) -> Result<FfiSlot, OutpatientError> {
        let mut engine = self.engine.lock()?;
        let slot = engine.cancel_slot(doctor_id, slot_id)?;
        Ok(slot.into())
    }

    /// Doctor workload report as JSON.
    pub fn doctor_report_json(&self, doctor_id: u32) -> Result<String, OutpatientError> {
        let engine = self.engine.lock()?;
        let report = ReportBuilder::new(&engine).doctor_report(doctor_id)?;
        Ok(report.to_json()?)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register or overwrite a patient. Returns true if a record was replaced.
    pub fn register_patient(&self, patient: FfiPatient) -> Result<bool, OutpatientError> {
        let mut engine = self.engine.lock()?;
        Ok(engine.register_patient(patient.into()))
    }

    /// Get a patient by id.
    pub fn get_patient(&self, patient_id: u32) -> Result<Option<FfiPatient>, OutpatientError> {
        let engine = self.engine.lock()?;
        Ok(engine.patients().get(patient_id).cloned().map(Into::into))
    }

    /// Search patients by name.
    pub fn search_patients(
        &self,
        query: String,
        limit: Option<u32>,
    ) -> Result<Vec<FfiPatient>, OutpatientError> {
        let engine = self.engine.lock()?;
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT) as usize;
        Ok(engine
            .patients()
            .search(&query, limit)
            .into_iter()
            .map(|m| m.patient.clone().into())
            .collect())
    }

    // =========================================================================
    // Booking, Triage & Serving
    // =========================================================================

    /// Book a routine visit. Returns the new token id.
    pub fn book_routine(
        &self,
        patient_id: u32,
        doctor_id: u32,
        slot_id: Option<u32>,
    ) -> Result<u64, OutpatientError> {
        let mut engine = self.engine.lock()?;
        Ok(engine.book_routine(patient_id, doctor_id, slot_id)?)
    }

    /// Admit an emergency. Lower severity is more urgent.
    pub fn triage_insert(&self, patient_id: u32, severity: i32) -> Result<u64, OutpatientError> {
        let mut engine = self.engine.lock()?;
        Ok(engine.triage_insert(patient_id, severity)?)
    }

    /// Serve the next token for a doctor.
    pub fn serve_next(&self, doctor_id: u32) -> Result<FfiServed, OutpatientError> {
        let mut engine = self.engine.lock()?;
        let served = engine.serve_next(doctor_id)?;
        Ok(served.into())
    }

    /// Revert the most recent action. Returns its kind.
    pub fn undo_last(&self) -> Result<String, OutpatientError> {
        let mut engine = self.engine.lock()?;
        let record = engine.undo_last()?;
        Ok(record.kind().to_string())
    }

    /// Served and pending totals.
    pub fn get_summary(&self) -> Result<FfiSummary, OutpatientError> {
        let engine = self.engine.lock()?;
        let summary = ReportBuilder::new(&engine).summary();
        Ok(FfiSummary {
            served: summary.served,
            pending: summary.pending as u64,
            triage_waiting: summary.triage_waiting as u64,
            undo_depth: summary.undo_depth as u64,
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub history: String,
    pub frequency: u32,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            history: patient.history,
            frequency: patient.frequency,
        }
    }
}

impl From<FfiPatient> for Patient {
    fn from(patient: FfiPatient) -> Self {
        Patient {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            history: patient.history,
            frequency: patient.frequency,
        }
    }
}

/// FFI-safe token.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToken {
    pub id: u64,
    pub patient_id: Option<u32>,
    pub doctor_id: Option<u32>,
    pub slot_id: Option<u32>,
    pub emergency: bool,
}

impl From<Token> for FfiToken {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            patient_id: token.patient_id,
            doctor_id: token.doctor_id,
            slot_id: token.slot_id,
            emergency: token.is_emergency(),
        }
    }
}

/// FFI-safe slot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSlot {
    pub slot_id: u32,
    pub start: String,
    pub end: String,
    pub token_id: Option<u64>,
}

impl From<Slot> for FfiSlot {
    fn from(slot: Slot) -> Self {
        Self {
            slot_id: slot.id,
            token_id: slot.token_id(),
            start: slot.start,
            end: slot.end,
        }
    }
}

/// FFI-safe serve result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServed {
    pub token: FfiToken,
    /// "triage", "queue" or "slot"
    pub origin: String,
    /// Triage severity, for emergency serves
    pub severity: Option<i32>,
}

impl From<Served> for FfiServed {
    fn from(served: Served) -> Self {
        let (origin, severity) = match served.origin {
            ServeOrigin::Triage { severity } => ("triage", Some(severity)),
            ServeOrigin::RoutineQueue { .. } => ("queue", None),
            ServeOrigin::Slot { .. } => ("slot", None),
        };
        Self {
            token: served.token.into(),
            origin: origin.to_string(),
            severity,
        }
    }
}

/// FFI-safe served/pending summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummary {
    pub served: u64,
    pub pending: u64,
    pub triage_waiting: u64,
    pub undo_depth: u64,
}
