//! Per-doctor reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ReportBuilder;
use crate::engine::EngineResult;
use crate::models::{DoctorId, Slot, SlotId, TokenId};

/// One slot as shown in reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotView {
    pub slot_id: SlotId,
    pub start: String,
    pub end: String,
    pub taken: bool,
    pub token_id: Option<TokenId>,
}

impl From<&Slot> for SlotView {
    fn from(slot: &Slot) -> Self {
        Self {
            slot_id: slot.id,
            start: slot.start.clone(),
            end: slot.end.clone(),
            taken: slot.is_taken(),
            token_id: slot.token_id(),
        }
    }
}

/// Workload summary for one doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorReport {
    pub doctor_id: DoctorId,
    pub name: String,
    pub specialization: String,
    /// Tokens waiting in the routine queue
    pub queue_length: usize,
    pub queue_capacity: usize,
    /// Slots currently holding a booking
    pub taken_slots: usize,
    /// First free slot in schedule order
    pub next_free_slot: Option<SlotView>,
}

impl DoctorReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Doctor: {} (id {}), Spec: {}",
            self.name, self.doctor_id, self.specialization
        )?;
        writeln!(
            f,
            "Pending routine queue: {}/{}",
            self.queue_length, self.queue_capacity
        )?;
        writeln!(f, "Booked slots: {}", self.taken_slots)?;
        match &self.next_free_slot {
            Some(slot) => write!(
                f,
                "Next free slot: {} [{}-{}]",
                slot.slot_id, slot.start, slot.end
            ),
            None => write!(f, "No free slots"),
        }
    }
}

/// Every slot of one doctor, in schedule order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotListing {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub slots: Vec<SlotView>,
}

impl SlotListing {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SlotListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slots for Dr. {} (id {}):", self.doctor_name, self.doctor_id)?;
        for slot in &self.slots {
            write!(
                f,
                "\n  SlotId: {} [{}-{}] ({})",
                slot.slot_id,
                slot.start,
                slot.end,
                if slot.taken { "TAKEN" } else { "FREE" }
            )?;
        }
        Ok(())
    }
}

impl<'a> ReportBuilder<'a> {
    /// Queue and slot summary for one doctor.
    pub fn doctor_report(&self, doctor_id: DoctorId) -> EngineResult<DoctorReport> {
        let doctor = self.engine.doctor(doctor_id)?;
        Ok(DoctorReport {
            doctor_id,
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            queue_length: doctor.queue.len(),
            queue_capacity: doctor.queue.capacity(),
            taken_slots: doctor.slots.taken_count(),
            next_free_slot: doctor.slots.next_free().map(SlotView::from),
        })
    }

    /// All slots of one doctor.
    pub fn slot_listing(&self, doctor_id: DoctorId) -> EngineResult<SlotListing> {
        let doctor = self.engine.doctor(doctor_id)?;
        Ok(SlotListing {
            doctor_id,
            doctor_name: doctor.name.clone(),
            slots: doctor.slots.iter().map(SlotView::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, SchedulingEngine};
    use crate::models::Patient;

    fn engine() -> SchedulingEngine {
        let mut engine = SchedulingEngine::new();
        engine.add_doctor(1, "Dr_Ahuja", "General", 5).unwrap();
        engine.add_slot(1, 101, "09:00", "09:15").unwrap();
        engine.add_slot(1, 102, "09:15", "09:30").unwrap();
        engine.register_patient(Patient::new(1, "Ananya", 22, ""));
        engine
    }

    #[test]
    fn test_doctor_report() {
        let mut engine = engine();
        engine.book_routine(1, 1, Some(101)).unwrap();
        engine.book_routine(1, 1, None).unwrap();

        let report = ReportBuilder::new(&engine).doctor_report(1).unwrap();
        assert_eq!(report.queue_length, 1);
        assert_eq!(report.taken_slots, 1);
        assert_eq!(report.next_free_slot.as_ref().unwrap().slot_id, 102);

        let text = report.to_string();
        assert!(text.starts_with("Doctor: Dr_Ahuja (id 1), Spec: General"));
        assert!(text.ends_with("Next free slot: 102 [09:15-09:30]"));
    }

    #[test]
    fn test_doctor_report_no_free_slots() {
        let mut engine = engine();
        engine.book_routine(1, 1, Some(101)).unwrap();
        engine.book_routine(1, 1, Some(102)).unwrap();

        let report = ReportBuilder::new(&engine).doctor_report(1).unwrap();
        assert!(report.next_free_slot.is_none());
        assert!(report.to_string().ends_with("No free slots"));
    }

    #[test]
    fn test_doctor_report_unknown() {
        let engine = engine();
        let err = ReportBuilder::new(&engine).doctor_report(3).unwrap_err();
        assert_eq!(err, EngineError::DoctorNotFound(3));
    }

    #[test]
    fn test_slot_listing_text() {
        let mut engine = engine();
        engine.book_routine(1, 1, Some(102)).unwrap();

        let listing = ReportBuilder::new(&engine).slot_listing(1).unwrap();
        assert_eq!(
            listing.to_string(),
            "Slots for Dr. Dr_Ahuja (id 1):\n  SlotId: 101 [09:00-09:15] (FREE)\n  SlotId: 102 [09:15-09:30] (TAKEN)"
        );
    }

    #[test]
    fn test_slot_listing_json() {
        let engine = engine();
        let json = ReportBuilder::new(&engine).slot_listing(1).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["slots"][0]["slot_id"], 101);
        assert_eq!(value["slots"][1]["taken"], false);
    }
}
