//! Executes parsed commands against the engine and prints the outcome.

use std::io::{self, BufRead, Write};

use outpatient_core::models::Patient;
use outpatient_core::{ReportBuilder, SchedulingEngine, ServeOrigin};
use tracing::debug;

use crate::command::{self, Command, ParseError, ReportRequest, TokenStream};

/// Maximum rows printed by a patient search.
const SEARCH_LIMIT: usize = 10;

/// Interactive session state.
pub struct Session {
    engine: SchedulingEngine,
    /// Print reports as JSON instead of text
    json: bool,
}

impl Session {
    pub fn new(engine: SchedulingEngine, json: bool) -> Self {
        Self { engine, json }
    }

    pub fn engine(&self) -> &SchedulingEngine {
        &self.engine
    }

    /// Menu loop. Returns on option 0 or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        let mut tokens = TokenStream::new(input);
        loop {
            write!(out, "{}", command::MENU)?;
            out.flush()?;

            let option = match command::parse_option(&mut tokens) {
                Ok(Some(option)) => option,
                Ok(None) => break,
                Err(ParseError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    writeln!(out, "Invalid option: {}", e)?;
                    continue;
                }
            };

            if let Some(prompt) = command::prompt_for(option) {
                write!(out, "{}", prompt)?;
                out.flush()?;
            }

            match command::parse_arguments(option, &mut tokens) {
                Ok(Command::Exit) => {
                    writeln!(out, "Exiting...")?;
                    break;
                }
                Ok(cmd) => self.execute(cmd, out)?,
                Err(ParseError::EndOfInput) => break,
                Err(ParseError::Io(e)) => return Err(e.into()),
                Err(e) => writeln!(out, "Invalid input: {}", e)?,
            }
        }
        Ok(())
    }

    /// Run one command. Engine failures are printed, I/O failures returned.
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        debug!(?cmd, "executing");
        match cmd {
            Command::RegisterPatient { id, name, age, history } => {
                let patient = Patient::new(id, name, age, history);
                let display = patient.display_name();
                let replaced = self.engine.register_patient(patient);
                let verb = if replaced { "Updated" } else { "Registered" };
                writeln!(out, "{} patient {} (id {})", verb, display, id)
            }
            Command::Book { patient_id, doctor_id, slot_id } => {
                match self.engine.book_routine(patient_id, doctor_id, slot_id) {
                    Ok(token_id) => writeln!(out, "Booked tokenId: {}", token_id),
                    Err(e) => writeln!(out, "Booking failed: {}", e),
                }
            }
            Command::Triage { patient_id, severity } => {
                match self.engine.triage_insert(patient_id, severity) {
                    Ok(token_id) => writeln!(out, "Triage inserted (tokenId {})", token_id),
                    Err(e) => writeln!(out, "Triage failed: {}", e),
                }
            }
            Command::Serve { doctor_id } => match self.engine.serve_next(doctor_id) {
                Ok(served) => {
                    let token = &served.token;
                    write!(out, "Served tokenId {} type {}", token.id, token.kind)?;
                    if let Some(patient_id) = token.patient_id {
                        write!(out, " patientId {}", patient_id)?;
                    }
                    match served.origin {
                        ServeOrigin::Triage { severity } => {
                            writeln!(out, " from triage (severity {})", severity)
                        }
                        ServeOrigin::RoutineQueue { .. } => writeln!(out, " from routine queue"),
                        ServeOrigin::Slot { slot_id, .. } => writeln!(out, " from slot {}", slot_id),
                    }
                }
                Err(e) => writeln!(out, "Nothing to serve: {}", e),
            },
            Command::Undo => match self.engine.undo_last() {
                Ok(record) => writeln!(out, "Undo successful ({})", record.kind()),
                Err(e) => writeln!(out, "Undo failed: {}", e),
            },
            Command::Report(request) => self.report(request, out),
            Command::ListSlots { doctor_id } => {
                match ReportBuilder::new(&self.engine).slot_listing(doctor_id) {
                    Ok(listing) if self.json => self.write_json(listing.to_json(), out),
                    Ok(listing) => writeln!(out, "{}", listing),
                    Err(e) => writeln!(out, "{}", e),
                }
            }
            Command::AddDoctor { id, name, specialization, capacity } => {
                let capacity = capacity.unwrap_or(self.engine.config().default_queue_capacity);
                match self.engine.add_doctor(id, &name, &specialization, capacity) {
                    Ok(_) => writeln!(out, "Doctor added (queue capacity {})", capacity),
                    Err(e) => writeln!(out, "Failed to add doctor: {}", e),
                }
            }
            Command::AddSlot { doctor_id, slot_id, start, end } => {
                match self.engine.add_slot(doctor_id, slot_id, &start, &end) {
                    Ok(_) => writeln!(out, "Slot added"),
                    Err(e) => writeln!(out, "Failed to add slot: {}", e),
                }
            }
            Command::CancelSlot { doctor_id, slot_id } => {
                match self.engine.cancel_slot(doctor_id, slot_id) {
                    Ok(slot) => match slot.token_id() {
                        Some(token_id) => {
                            writeln!(out, "Slot {} cancelled (dropped tokenId {})", slot.id, token_id)
                        }
                        None => writeln!(out, "Slot {} cancelled", slot.id),
                    },
                    Err(e) => writeln!(out, "Cancel failed: {}", e),
                }
            }
            Command::SearchPatients { query } => {
                let matches = self.engine.patients().search(&query, SEARCH_LIMIT);
                if matches.is_empty() {
                    return writeln!(out, "No patients match '{}'", query);
                }
                for hit in matches {
                    writeln!(
                        out,
                        "  PatientId {} {} age {} (score {:.2})",
                        hit.patient.id,
                        hit.patient.display_name(),
                        hit.patient.age,
                        hit.score
                    )?;
                }
                Ok(())
            }
            Command::Exit => Ok(()),
        }
    }

    fn report<W: Write>(&self, request: ReportRequest, out: &mut W) -> io::Result<()> {
        let reports = ReportBuilder::new(&self.engine);
        match request {
            ReportRequest::Doctor(doctor_id) => match reports.doctor_report(doctor_id) {
                Ok(report) if self.json => self.write_json(report.to_json(), out),
                Ok(report) => writeln!(out, "{}", report),
                Err(e) => writeln!(out, "{}", e),
            },
            ReportRequest::Summary => {
                let summary = reports.summary();
                if self.json {
                    self.write_json(summary.to_json(), out)
                } else {
                    writeln!(out, "{}", summary)
                }
            }
            ReportRequest::TopFrequent(k) => {
                let top = reports.top_frequent(k);
                if self.json {
                    self.write_json(top.to_json(), out)
                } else {
                    writeln!(out, "{}", top)
                }
            }
        }
    }

    fn write_json<W: Write>(
        &self,
        json: Result<String, serde_json::Error>,
        out: &mut W,
    ) -> io::Result<()> {
        match json {
            Ok(json) => writeln!(out, "{}", json),
            Err(e) => writeln!(out, "Failed to export report: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpatient_core::EngineConfig;
    use std::io::Cursor;

    fn seeded() -> Session {
        let engine = SchedulingEngine::from_config(EngineConfig::default()).unwrap();
        Session::new(engine, false)
    }

    fn run(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_book_serve_undo_session() {
        let mut session = seeded();
        let output = run(&mut session, "2 1 1 101\n4 1\n5\n0\n");

        assert!(output.contains("Booked tokenId: 1"));
        assert!(output.contains("Served tokenId 1 type ROUTINE patientId 1 from slot 101"));
        assert!(output.contains("Undo successful (serve)"));
        assert!(output.contains("Exiting..."));
        assert_eq!(session.engine().served_count(), 0);
        assert_eq!(session.engine().pending_count(), 1);
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let mut session = seeded();
        let output = run(&mut session, "3 2 5\n");
        assert!(output.contains("Triage inserted (tokenId 1)"));
        assert_eq!(session.engine().triage_len(), 1);
    }

    #[test]
    fn test_invalid_input_keeps_running() {
        let mut session = seeded();
        let output = run(&mut session, "4 abc\n99\n6 2\n0\n");
        assert!(output.contains("Invalid input: expected doctor id, got 'abc'"));
        assert!(output.contains("Invalid input: unknown menu option: 99"));
        assert!(output.contains("Served: 0 | Pending: 0 (triage: 0)"));
    }

    #[test]
    fn test_engine_errors_are_printed() {
        let mut session = seeded();
        let output = run(&mut session, "2 99 1 -1\n4 7\n5\n0\n");
        assert!(output.contains("Booking failed:"));
        assert!(output.contains("Nothing to serve:"));
        assert!(output.contains("Undo failed:"));
    }

    #[test]
    fn test_add_doctor_with_default_capacity() {
        let mut session = seeded();
        let output = run(&mut session, "8 3 Dr_Rao Neuro -1\n0\n");
        assert!(output.contains("Doctor added (queue capacity 10)"));
        assert_eq!(session.engine().doctor(3).unwrap().queue.capacity(), 10);
    }

    #[test]
    fn test_register_and_search() {
        let mut session = seeded();
        let output = run(&mut session, "1 4 Mary_Ann 35 None\n11 mary\n0\n");
        assert!(output.contains("Registered patient Mary Ann (id 4)"));
        assert!(output.contains("PatientId 4 Mary Ann age 35"));
    }

    #[test]
    fn test_cancel_and_list_slots() {
        let mut session = seeded();
        let output = run(&mut session, "2 1 1 101\n10 1 101\n7 1\n0\n");
        assert!(output.contains("Slot 101 cancelled (dropped tokenId 1)"));
        assert!(!output.contains("SlotId: 101"));
        assert!(output.contains("SlotId: 102"));
    }

    #[test]
    fn test_json_reports() {
        let engine = SchedulingEngine::from_config(EngineConfig::default()).unwrap();
        let mut session = Session::new(engine, true);
        let output = run(&mut session, "6 2\n0\n");
        assert!(output.contains("\"served\": 0"));
    }
}
