//! Undo: pop the most recent record and apply its inverse.

use tracing::{info, warn};

use super::{EngineError, EngineResult, SchedulingEngine};
use crate::models::{Doctor, DoctorId};
use crate::undo::{ServeOrigin, UndoRecord};

impl SchedulingEngine {
    /// Revert the most recent logged action and return its record.
    ///
    /// The record is consumed even when the inverse cannot be applied; in that
    /// case state is left untouched and [`EngineError::UndoConflict`] is returned.
    pub fn undo_last(&mut self) -> EngineResult<UndoRecord> {
        let record = self.undo.pop().ok_or(EngineError::NothingToUndo)?;

        match self.revert(&record) {
            Ok(()) => {
                self.release(&record);
                info!(
                    action = %record.kind(),
                    pending = self.pending_count(),
                    served = self.served_count,
                    "action undone"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(action = %record.kind(), error = %err, "undo discarded");
                Err(err)
            }
        }
    }

    fn revert(&mut self, record: &UndoRecord) -> EngineResult<()> {
        match record {
            UndoRecord::Book {
                token,
                doctor_id,
                slot_id: Some(slot_id),
            } => {
                let doctor = self.doctor_for_undo(*doctor_id)?;
                let slot = doctor
                    .slots
                    .find_mut(*slot_id)
                    .filter(|slot| slot.token_id() == Some(token.id))
                    .ok_or_else(|| {
                        conflict(format!(
                            "slot {} of doctor {} no longer holds token {}",
                            slot_id, doctor_id, token.id
                        ))
                    })?;
                slot.booking = None;
            }
            UndoRecord::Book {
                token,
                doctor_id,
                slot_id: None,
            } => {
                let doctor = self.doctor_for_undo(*doctor_id)?;
                doctor.queue.remove(token.id).ok_or_else(|| {
                    conflict(format!(
                        "token {} is no longer queued for doctor {}",
                        token.id, doctor_id
                    ))
                })?;
            }
            UndoRecord::Cancel {
                doctor_id,
                position,
                slot,
            } => {
                let doctor = self.doctor_for_undo(*doctor_id)?;
                doctor.slots.insert_at(*position, slot.clone()).map_err(|_| {
                    conflict(format!(
                        "slot {} was re-added to doctor {}",
                        slot.id, doctor_id
                    ))
                })?;
            }
            UndoRecord::Serve { token, origin } => match origin {
                ServeOrigin::Triage { severity } => {
                    self.triage.insert(token.clone(), *severity);
                }
                ServeOrigin::RoutineQueue { doctor_id } => {
                    let doctor = self.doctor_for_undo(*doctor_id)?;
                    doctor.queue.enqueue(token.clone()).map_err(|_| {
                        conflict(format!("routine queue of doctor {} is full", doctor_id))
                    })?;
                }
                ServeOrigin::Slot { doctor_id, slot_id } => {
                    let doctor = self.doctor_for_undo(*doctor_id)?;
                    let slot = doctor
                        .slots
                        .find_mut(*slot_id)
                        .filter(|slot| !slot.is_taken())
                        .ok_or_else(|| {
                            conflict(format!(
                                "slot {} of doctor {} is gone or taken",
                                slot_id, doctor_id
                            ))
                        })?;
                    slot.booking = Some(token.clone());
                }
            },
            UndoRecord::RegisterPatient {
                patient_id,
                previous,
            } => match previous {
                Some(patient) => {
                    self.patients.upsert(patient.clone());
                }
                None => {
                    self.patients.remove(*patient_id);
                }
            },
            UndoRecord::TriageInsert { token, .. } => {
                self.triage.remove_by_id(token.id).ok_or_else(|| {
                    conflict(format!("token {} is no longer in triage", token.id))
                })?;
            }
        }
        Ok(())
    }

    fn doctor_for_undo(&mut self, doctor_id: DoctorId) -> EngineResult<&mut Doctor> {
        self.doctors
            .get_mut(&doctor_id)
            .ok_or_else(|| conflict(format!("doctor {} no longer exists", doctor_id)))
    }
}

fn conflict(detail: String) -> EngineError {
    EngineError::UndoConflict(detail)
}
