//! Tokens: one patient's claim on a slot, a queue position or a triage place.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DoctorId, PatientId, SlotId, TokenId};

/// Kind of work a token represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Routine visit, either slot-booked or queued
    Routine,
    /// Emergency admission through triage
    Emergency,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Routine => f.write_str("ROUTINE"),
            TokenKind::Emergency => f.write_str("EMERGENCY"),
        }
    }
}

/// A token, copied by value between containers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Globally unique, monotonically assigned id
    pub id: TokenId,
    /// Owning patient (unset for synthetic tokens)
    pub patient_id: Option<PatientId>,
    /// Target doctor (unset for emergency tokens)
    pub doctor_id: Option<DoctorId>,
    /// Booked slot, if slot-based
    pub slot_id: Option<SlotId>,
    /// Routine or emergency
    pub kind: TokenKind,
}

impl Token {
    /// Routine token for a doctor, optionally tied to a slot.
    pub fn routine(
        id: TokenId,
        patient_id: PatientId,
        doctor_id: DoctorId,
        slot_id: Option<SlotId>,
    ) -> Self {
        Self {
            id,
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            slot_id,
            kind: TokenKind::Routine,
        }
    }

    /// Doctor-agnostic emergency token.
    pub fn emergency(id: TokenId, patient_id: PatientId) -> Self {
        Self {
            id,
            patient_id: Some(patient_id),
            doctor_id: None,
            slot_id: None,
            kind: TokenKind::Emergency,
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.kind == TokenKind::Emergency
    }
}
