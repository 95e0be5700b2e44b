//! Serving: emergency first, then the doctor's routine queue, then booked slots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EngineError, EngineResult, SchedulingEngine};
use crate::models::{DoctorId, Token};
use crate::undo::{ServeOrigin, UndoRecord};

/// A served token and the structure it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Served {
    pub token: Token,
    pub origin: ServeOrigin,
}

impl SchedulingEngine {
    /// Serve the next unit of work on behalf of `doctor_id`.
    ///
    /// Strict priority:
    /// 1. the most urgent triage entry, whichever doctor asked
    /// 2. the front of the doctor's routine queue
    /// 3. the doctor's first taken slot, in schedule order
    ///
    /// The emergency path does not require `doctor_id` to exist.
    pub fn serve_next(&mut self, doctor_id: DoctorId) -> EngineResult<Served> {
        if let Ok(entry) = self.triage.extract_min() {
            let origin = ServeOrigin::Triage {
                severity: entry.severity,
            };
            return Ok(self.finish_serve(entry.token, origin));
        }

        let doctor = self.doctor_mut(doctor_id)?;
        let (token, origin) = if let Ok(token) = doctor.queue.dequeue() {
            (token, ServeOrigin::RoutineQueue { doctor_id })
        } else if let Some((slot_id, token)) = doctor.slots.first_taken_mut().and_then(|slot| {
            let slot_id = slot.id;
            slot.booking.take().map(|token| (slot_id, token))
        }) {
            (token, ServeOrigin::Slot { doctor_id, slot_id })
        } else {
            return Err(EngineError::NothingToServe(doctor_id));
        };

        Ok(self.finish_serve(token, origin))
    }

    fn finish_serve(&mut self, token: Token, origin: ServeOrigin) -> Served {
        debug!(token_id = token.id, kind = %token.kind, ?origin, "token served");
        self.commit(UndoRecord::Serve {
            token: token.clone(),
            origin: origin.clone(),
        });
        Served { token, origin }
    }
}
