//! Slot management, patient registration, routine booking and triage admission.

use tracing::debug;

use super::{EngineError, EngineResult, SchedulingEngine};
use crate::models::{DoctorId, Patient, PatientId, Severity, Slot, SlotId, Token, TokenId};
use crate::undo::UndoRecord;

impl SchedulingEngine {
    /// Append a free slot to a doctor's schedule. Not undoable.
    pub fn add_slot(
        &mut self,
        doctor_id: DoctorId,
        slot_id: SlotId,
        start: &str,
        end: &str,
    ) -> EngineResult<()> {
        let doctor = self.doctor_mut(doctor_id)?;
        doctor
            .slots
            .add(slot_id, start, end)
            .map_err(|_| EngineError::SlotExists { doctor_id, slot_id })?;
        debug!(doctor_id, slot_id, start, end, "slot added");
        Ok(())
    }

    /// Remove a slot from a doctor's schedule, taken or not.
    ///
    /// A booking held by the slot is released with it. The whole cancellation,
    /// booking included, is undoable. Returns the removed slot.
    pub fn cancel_slot(&mut self, doctor_id: DoctorId, slot_id: SlotId) -> EngineResult<Slot> {
        let doctor = self.doctor_mut(doctor_id)?;
        let (position, slot) = doctor
            .slots
            .remove(slot_id)
            .map_err(|_| EngineError::SlotNotFound { doctor_id, slot_id })?;

        if let Some(token_id) = slot.token_id() {
            debug!(doctor_id, slot_id, token_id, "booking released by slot cancellation");
        }
        self.commit(UndoRecord::Cancel {
            doctor_id,
            position,
            slot: slot.clone(),
        });
        Ok(slot)
    }

    /// Insert or overwrite a patient record. Returns true if a record was replaced.
    pub fn register_patient(&mut self, patient: Patient) -> bool {
        let patient_id = patient.id;
        let previous = self.patients.upsert(patient);
        let existed = previous.is_some();
        self.commit(UndoRecord::RegisterPatient {
            patient_id,
            previous,
        });
        existed
    }

    /// Book a routine visit, into a specific slot or onto the doctor's queue.
    pub fn book_routine(
        &mut self,
        patient_id: PatientId,
        doctor_id: DoctorId,
        slot_id: Option<SlotId>,
    ) -> EngineResult<TokenId> {
        if !self.patients.contains(patient_id) {
            return Err(EngineError::PatientNotFound(patient_id));
        }
        let token = Token::routine(self.next_token_id, patient_id, doctor_id, slot_id);
        let doctor = self.doctor_mut(doctor_id)?;

        match slot_id {
            Some(slot_id) => {
                let slot = doctor
                    .slots
                    .find_mut(slot_id)
                    .filter(|slot| !slot.is_taken())
                    .ok_or(EngineError::SlotUnavailable { doctor_id, slot_id })?;
                slot.booking = Some(token.clone());
            }
            None => {
                let capacity = doctor.queue.capacity();
                doctor
                    .queue
                    .enqueue(token.clone())
                    .map_err(|_| EngineError::QueueFull { doctor_id, capacity })?;
            }
        }

        let token_id = self.issue_token_id();
        debug!(patient_id, doctor_id, ?slot_id, token_id, "routine visit booked");
        self.commit(UndoRecord::Book {
            token,
            doctor_id,
            slot_id,
        });
        Ok(token_id)
    }

    /// Admit a patient to emergency triage. The token is not tied to any doctor.
    pub fn triage_insert(&mut self, patient_id: PatientId, severity: Severity) -> EngineResult<TokenId> {
        if !self.patients.contains(patient_id) {
            return Err(EngineError::PatientNotFound(patient_id));
        }
        let token_id = self.issue_token_id();
        let token = Token::emergency(token_id, patient_id);
        self.triage.insert(token.clone(), severity);

        debug!(patient_id, severity, token_id, "emergency admitted to triage");
        self.commit(UndoRecord::TriageInsert { token, severity });
        Ok(token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ErrorKind;

    fn engine() -> SchedulingEngine {
        let mut engine = SchedulingEngine::new();
        engine.add_doctor(1, "Dr_Ahuja", "General", 2).unwrap();
        engine.add_slot(1, 101, "09:00", "09:15").unwrap();
        engine.add_slot(1, 102, "09:15", "09:30").unwrap();
        engine.register_patient(Patient::new(1, "Ananya", 22, "No_history"));
        engine
    }

    #[test]
    fn test_add_slot_unknown_doctor() {
        let mut engine = engine();
        let err = engine.add_slot(9, 1, "a", "b").unwrap_err();
        assert_eq!(err, EngineError::DoctorNotFound(9));
    }

    #[test]
    fn test_add_slot_duplicate() {
        let mut engine = engine();
        let err = engine.add_slot(1, 101, "11:00", "11:15").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(engine.doctor(1).unwrap().slots.len(), 2);
    }

    #[test]
    fn test_book_slot() {
        let mut engine = engine();
        let token_id = engine.book_routine(1, 1, Some(102)).unwrap();

        let slot = engine.doctor(1).unwrap().slots.find(102).unwrap().clone();
        assert_eq!(slot.token_id(), Some(token_id));
        assert_eq!(engine.pending_count(), 1);
        assert_eq!(engine.patient(1).unwrap().frequency, 1);
    }

    #[test]
    fn test_book_taken_slot() {
        let mut engine = engine();
        engine.book_routine(1, 1, Some(101)).unwrap();
        let err = engine.book_routine(1, 1, Some(101)).unwrap_err();
        assert_eq!(err, EngineError::SlotUnavailable { doctor_id: 1, slot_id: 101 });
        assert_eq!(engine.pending_count(), 1);
        assert_eq!(engine.patient(1).unwrap().frequency, 1);
    }

    #[test]
    fn test_book_missing_slot() {
        let mut engine = engine();
        let err = engine.book_routine(1, 1, Some(999)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_failed_booking_does_not_consume_token_id() {
        let mut engine = engine();
        let next = engine.next_token_id();
        assert!(engine.book_routine(1, 1, Some(999)).is_err());
        assert!(engine.book_routine(7, 1, None).is_err());
        assert_eq!(engine.next_token_id(), next);
    }

    #[test]
    fn test_book_queue_until_full() {
        let mut engine = engine();
        let first = engine.book_routine(1, 1, None).unwrap();
        let second = engine.book_routine(1, 1, None).unwrap();
        assert!(second > first);

        let undo_depth = engine.undo_depth();
        let err = engine.book_routine(1, 1, None).unwrap_err();
        assert_eq!(err, EngineError::QueueFull { doctor_id: 1, capacity: 2 });
        assert_eq!(engine.pending_count(), 2);
        assert_eq!(engine.undo_depth(), undo_depth);
        assert_eq!(engine.patient(1).unwrap().frequency, 2);
    }

    #[test]
    fn test_book_unknown_ids() {
        let mut engine = engine();
        assert_eq!(
            engine.book_routine(5, 1, None).unwrap_err(),
            EngineError::PatientNotFound(5)
        );
        assert_eq!(
            engine.book_routine(1, 5, None).unwrap_err(),
            EngineError::DoctorNotFound(5)
        );
    }

    #[test]
    fn test_cancel_taken_slot_releases_booking() {
        let mut engine = engine();
        let token_id = engine.book_routine(1, 1, Some(101)).unwrap();

        let slot = engine.cancel_slot(1, 101).unwrap();
        assert_eq!(slot.token_id(), Some(token_id));
        assert!(engine.doctor(1).unwrap().slots.find(101).is_none());
        assert_eq!(engine.pending_count(), 0);
    }

    #[test]
    fn test_cancel_unknown_slot() {
        let mut engine = engine();
        let err = engine.cancel_slot(1, 555).unwrap_err();
        assert_eq!(err, EngineError::SlotNotFound { doctor_id: 1, slot_id: 555 });
        let depth = engine.undo_depth();
        assert!(engine.cancel_slot(3, 101).is_err());
        assert_eq!(engine.undo_depth(), depth);
    }

    #[test]
    fn test_register_overwrites() {
        let mut engine = engine();
        let replaced = engine.register_patient(Patient::new(1, "Ananya", 23, "Asthma"));
        assert!(replaced);
        assert_eq!(engine.patient(1).unwrap().age, 23);
        assert!(!engine.register_patient(Patient::new(2, "Lakshita", 19, "")));
    }

    #[test]
    fn test_triage_insert() {
        let mut engine = engine();
        let token_id = engine.triage_insert(1, 3).unwrap();
        assert_eq!(engine.triage_len(), 1);
        assert_eq!(engine.triage().peek().unwrap().token.id, token_id);
        assert_eq!(engine.pending_count(), 1);
        assert_eq!(engine.patient(1).unwrap().frequency, 1);

        assert_eq!(
            engine.triage_insert(42, 1).unwrap_err(),
            EngineError::PatientNotFound(42)
        );
    }
}
