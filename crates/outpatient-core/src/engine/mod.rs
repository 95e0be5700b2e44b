//! Scheduling engine.
//!
//! The engine is the only component callers talk to. Every mutating operation
//! validates first, then applies exactly one structural change and pushes the
//! matching [`UndoRecord`] through [`SchedulingEngine::commit`]. Nothing is
//! mutated on a failure path.

mod booking;
mod config;
mod serving;
mod undo;

pub use config::*;
pub use serving::*;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Doctor, DoctorId, Patient, PatientId, SlotId, TokenId};
use crate::registry::PatientRegistry;
use crate::schedule::TriageQueue;
use crate::undo::{ActionKind, UndoLog, UndoRecord};

/// Engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Doctor not found: {0}")]
    DoctorNotFound(DoctorId),

    #[error("Patient not found: {0}")]
    PatientNotFound(PatientId),

    #[error("Slot {slot_id} not found for doctor {doctor_id}")]
    SlotNotFound { doctor_id: DoctorId, slot_id: SlotId },

    #[error("Doctor already exists: {0}")]
    DoctorExists(DoctorId),

    #[error("Slot {slot_id} already exists for doctor {doctor_id}")]
    SlotExists { doctor_id: DoctorId, slot_id: SlotId },

    #[error("Slot {slot_id} of doctor {doctor_id} is missing or already taken")]
    SlotUnavailable { doctor_id: DoctorId, slot_id: SlotId },

    #[error("Routine queue of doctor {doctor_id} is full (capacity {capacity})")]
    QueueFull { doctor_id: DoctorId, capacity: usize },

    #[error("Nothing to serve for doctor {0}")]
    NothingToServe(DoctorId),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Undo conflict: {0}")]
    UndoConflict(String),
}

/// Coarse failure category shared by all engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Unavailable,
    UndoConflict,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::DoctorNotFound(_)
            | EngineError::PatientNotFound(_)
            | EngineError::SlotNotFound { .. } => ErrorKind::NotFound,
            EngineError::DoctorExists(_) | EngineError::SlotExists { .. } => {
                ErrorKind::AlreadyExists
            }
            EngineError::SlotUnavailable { .. }
            | EngineError::QueueFull { .. }
            | EngineError::NothingToServe(_)
            | EngineError::NothingToUndo => ErrorKind::Unavailable,
            EngineError::UndoConflict(_) => ErrorKind::UndoConflict,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Owns every doctor, patient, triage entry and undo record.
///
/// Single-threaded by construction: all operations take `&mut self`. Callers
/// that need shared access wrap the whole engine in one lock.
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    config: EngineConfig,
    doctors: BTreeMap<DoctorId, Doctor>,
    patients: PatientRegistry,
    triage: TriageQueue,
    undo: UndoLog,
    next_token_id: TokenId,
    served_count: u64,
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingEngine {
    /// Create an empty engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            doctors: BTreeMap::new(),
            patients: PatientRegistry::new(),
            triage: TriageQueue::new(),
            undo: UndoLog::new(),
            next_token_id: 1,
            served_count: 0,
        }
    }

    /// Create an engine from configuration, loading the demo data if asked to.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        let seed = config.seed_sample_data;
        let mut engine = Self {
            config,
            ..Self::new()
        };
        if seed {
            engine.seed_sample_data()?;
        }
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    /// Register a doctor. Not undoable.
    pub fn add_doctor(
        &mut self,
        id: DoctorId,
        name: &str,
        specialization: &str,
        queue_capacity: usize,
    ) -> EngineResult<&Doctor> {
        if self.doctors.contains_key(&id) {
            return Err(EngineError::DoctorExists(id));
        }
        info!(doctor_id = id, queue_capacity, "doctor added");
        Ok(self
            .doctors
            .entry(id)
            .or_insert_with(|| Doctor::new(id, name, specialization, queue_capacity)))
    }

    pub fn doctor(&self, id: DoctorId) -> EngineResult<&Doctor> {
        self.doctors.get(&id).ok_or(EngineError::DoctorNotFound(id))
    }

    /// Doctors ordered by id.
    pub fn doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.values()
    }

    fn doctor_mut(&mut self, id: DoctorId) -> EngineResult<&mut Doctor> {
        self.doctors
            .get_mut(&id)
            .ok_or(EngineError::DoctorNotFound(id))
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn patient(&self, id: PatientId) -> EngineResult<&Patient> {
        self.patients.get(id).ok_or(EngineError::PatientNotFound(id))
    }

    pub fn patients(&self) -> &PatientRegistry {
        &self.patients
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Unserved work: queued routine tokens, taken slots and triage entries.
    ///
    /// Derived from the live structures on every call, so it cannot drift.
    pub fn pending_count(&self) -> usize {
        let per_doctor: usize = self.doctors.values().map(Doctor::pending_count).sum();
        per_doctor + self.triage.len()
    }

    pub fn served_count(&self) -> u64 {
        self.served_count
    }

    pub fn triage(&self) -> &TriageQueue {
        &self.triage
    }

    pub fn triage_len(&self) -> usize {
        self.triage.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Kinds of the logged actions, most recent first.
    pub fn undo_history(&self) -> Vec<ActionKind> {
        self.undo.kinds()
    }

    /// Id the next issued token will get.
    pub fn next_token_id(&self) -> TokenId {
        self.next_token_id
    }

    fn issue_token_id(&mut self) -> TokenId {
        let id = self.next_token_id;
        self.next_token_id += 1;
        id
    }

    /// Apply the side effects shared by every logged mutation, then log it.
    fn commit(&mut self, record: UndoRecord) {
        if let Some(patient_id) = record.visiting_patient() {
            self.patients.increment_frequency(patient_id);
        }
        if matches!(record, UndoRecord::Serve { .. }) {
            self.served_count += 1;
        }
        let kind = record.kind();
        self.undo.push(record);
        debug!(
            action = %kind,
            pending = self.pending_count(),
            served = self.served_count,
            "action committed"
        );
    }

    /// Reverse what [`commit`](Self::commit) did for a record that has just been undone.
    fn release(&mut self, record: &UndoRecord) {
        if let Some(patient_id) = record.visiting_patient() {
            self.patients.decrement_frequency(patient_id);
        }
        if matches!(record, UndoRecord::Serve { .. }) {
            self.served_count = self.served_count.saturating_sub(1);
        }
    }

    // =========================================================================
    // Demo data
    // =========================================================================

    /// Load two doctors, three slots and three patients.
    ///
    /// The undo log is cleared afterwards so the demo data is the baseline.
    pub fn seed_sample_data(&mut self) -> EngineResult<()> {
        self.add_doctor(1, "Dr_Ahuja", "General", 5)?;
        self.add_doctor(2, "Dr_Mehta", "Cardio", 5)?;
        self.add_slot(1, 101, "09:00", "09:15")?;
        self.add_slot(1, 102, "09:15", "09:30")?;
        self.add_slot(2, 201, "10:00", "10:15")?;
        self.register_patient(Patient::new(1, "Ananya", 22, "No_history"));
        self.register_patient(Patient::new(2, "Lakshita", 19, "Allergy_pollen"));
        self.register_patient(Patient::new(3, "Saieena", 21, "Asthma"));
        self.undo.clear();
        info!(doctors = self.doctors.len(), patients = self.patients.len(), "sample data loaded");
        Ok(())
    }
}
