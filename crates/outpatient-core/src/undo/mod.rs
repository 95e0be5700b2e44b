//! Undo log: a last-in-first-out record of reversible actions.
//!
//! Each [`UndoRecord`] variant carries exactly what its inversion needs.
//! The engine owns the inversion logic; this module only stores records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{DoctorId, Patient, PatientId, Severity, Slot, SlotId, Token};

/// Where a served token came from, so undo can put it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServeOrigin {
    /// Extracted from the triage queue
    Triage { severity: Severity },
    /// Dequeued from a doctor's routine queue
    RoutineQueue { doctor_id: DoctorId },
    /// Released from a booked slot
    Slot { doctor_id: DoctorId, slot_id: SlotId },
}

/// One reversible action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UndoRecord {
    /// Routine booking, slot-based when `slot_id` is set
    Book {
        token: Token,
        doctor_id: DoctorId,
        slot_id: Option<SlotId>,
    },
    /// Slot cancellation; `slot` still holds its booking if it had one
    Cancel {
        doctor_id: DoctorId,
        position: usize,
        slot: Slot,
    },
    /// A token was served
    Serve { token: Token, origin: ServeOrigin },
    /// Patient insert or overwrite; `previous` is `None` for a first registration
    RegisterPatient {
        patient_id: PatientId,
        previous: Option<Patient>,
    },
    /// Emergency admission
    TriageInsert { token: Token, severity: Severity },
}

/// Action kind, for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionKind {
    Book,
    Cancel,
    Serve,
    RegisterPatient,
    TriageInsert,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Book => "book",
            ActionKind::Cancel => "cancel",
            ActionKind::Serve => "serve",
            ActionKind::RegisterPatient => "register patient",
            ActionKind::TriageInsert => "triage insert",
        };
        f.write_str(label)
    }
}

impl UndoRecord {
    pub fn kind(&self) -> ActionKind {
        match self {
            UndoRecord::Book { .. } => ActionKind::Book,
            UndoRecord::Cancel { .. } => ActionKind::Cancel,
            UndoRecord::Serve { .. } => ActionKind::Serve,
            UndoRecord::RegisterPatient { .. } => ActionKind::RegisterPatient,
            UndoRecord::TriageInsert { .. } => ActionKind::TriageInsert,
        }
    }

    /// Patient whose visit frequency this action counts towards.
    pub fn visiting_patient(&self) -> Option<PatientId> {
        match self {
            UndoRecord::Book { token, .. }
            | UndoRecord::Serve { token, .. }
            | UndoRecord::TriageInsert { token, .. } => token.patient_id,
            UndoRecord::Cancel { .. } | UndoRecord::RegisterPatient { .. } => None,
        }
    }
}

/// Unbounded stack of [`UndoRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    /// Remove the most recent record.
    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop()
    }

    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.last()
    }

    /// Kinds of all records, most recent first.
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.records.iter().rev().map(UndoRecord::kind).collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
