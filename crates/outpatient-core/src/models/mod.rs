//! Domain models for the outpatient scheduler.

mod doctor;
mod patient;
mod slot;
mod token;

pub use doctor::*;
pub use patient::*;
pub use slot::*;
pub use token::*;

/// Caller-assigned patient identifier.
pub type PatientId = u32;

/// Caller-assigned doctor identifier.
pub type DoctorId = u32;

/// Caller-assigned slot identifier, unique within one doctor.
pub type SlotId = u32;

/// Engine-assigned token identifier. Never reused.
pub type TokenId = u64;

/// Triage urgency. Lower is more urgent.
pub type Severity = i32;
