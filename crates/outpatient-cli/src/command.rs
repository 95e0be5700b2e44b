//! Menu command parsing.
//!
//! Input is a stream of whitespace-delimited tokens, read line by line so the
//! menu stays interactive. Names and history use `_` in place of spaces.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::str::FromStr;

use outpatient_core::models::{DoctorId, PatientId, Severity, SlotId};
use thiserror::Error;

/// Parse errors.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unknown menu option: {0}")]
    UnknownOption(String),

    #[error("expected {expected}, got '{got}'")]
    InvalidArgument { expected: &'static str, got: String },

    #[error("unexpected end of input")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Report sub-menu choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    Doctor(DoctorId),
    Summary,
    TopFrequent(usize),
}

/// One parsed menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RegisterPatient {
        id: PatientId,
        name: String,
        age: u32,
        history: String,
    },
    Book {
        patient_id: PatientId,
        doctor_id: DoctorId,
        slot_id: Option<SlotId>,
    },
    Triage {
        patient_id: PatientId,
        severity: Severity,
    },
    Serve {
        doctor_id: DoctorId,
    },
    Undo,
    Report(ReportRequest),
    ListSlots {
        doctor_id: DoctorId,
    },
    AddDoctor {
        id: DoctorId,
        name: String,
        specialization: String,
        capacity: Option<usize>,
    },
    AddSlot {
        doctor_id: DoctorId,
        slot_id: SlotId,
        start: String,
        end: String,
    },
    CancelSlot {
        doctor_id: DoctorId,
        slot_id: SlotId,
    },
    SearchPatients {
        query: String,
    },
    Exit,
}

pub const MENU: &str = "\n=== Hospital Appointment & Triage System ===
1. Register/Update Patient
2. Book Slot / Enqueue Routine
3. Emergency In (Triage)
4. Serve Next (doctor)
5. Undo Last Action
6. Reports
7. List Doctor Slots
8. Add Doctor
9. Add Slot to Doctor
10. Cancel Slot
11. Search Patients
0. Exit
Choose option: ";

/// Argument prompt shown after a menu option is chosen.
pub fn prompt_for(option: u32) -> Option<&'static str> {
    let prompt = match option {
        1 => "Enter patientId name age history (use _ for spaces): ",
        2 => "Enter patientId doctorId (slotId or -1): ",
        3 => "Enter patientId severityScore (lower -> more urgent): ",
        4 => "Enter doctorId to serve next: ",
        6 => "Reports: 1 <doctorId> per doctor | 2 served vs pending | 3 <k> top-K frequent: ",
        7 => "Enter doctorId: ",
        8 => "Enter doctorId name specialization queueCapacity (-1 for default): ",
        9 => "Enter doctorId slotId startTime endTime: ",
        10 => "Enter doctorId slotId: ",
        11 => "Enter name to search: ",
        _ => return None,
    };
    Some(prompt)
}

/// Whitespace token reader over a line-oriented source.
pub struct TokenStream<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next token, reading more lines as needed. `None` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    fn word(&mut self) -> ParseResult<String> {
        self.next_token()?.ok_or(ParseError::EndOfInput)
    }

    fn value<T: FromStr>(&mut self, expected: &'static str) -> ParseResult<T> {
        let token = self.word()?;
        token
            .parse()
            .map_err(|_| ParseError::InvalidArgument { expected, got: token })
    }

    /// An id where any negative number means "none".
    fn optional_id<T: FromStr>(&mut self, expected: &'static str) -> ParseResult<Option<T>> {
        let token = self.word()?;
        if token.starts_with('-') && token[1..].chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        token
            .parse()
            .map(Some)
            .map_err(|_| ParseError::InvalidArgument { expected, got: token })
    }
}

/// Read one complete command: the option number, then its arguments.
pub fn parse_command<R: BufRead>(tokens: &mut TokenStream<R>) -> ParseResult<Command> {
    let option = parse_option(tokens)?.ok_or(ParseError::EndOfInput)?;
    parse_arguments(option, tokens)
}

/// Read the menu option number. `None` at end of input.
pub fn parse_option<R: BufRead>(tokens: &mut TokenStream<R>) -> ParseResult<Option<u32>> {
    match tokens.next_token()? {
        None => Ok(None),
        Some(token) => token
            .parse()
            .map(Some)
            .map_err(|_| ParseError::UnknownOption(token)),
    }
}

/// Read the arguments for a menu option.
pub fn parse_arguments<R: BufRead>(
    option: u32,
    tokens: &mut TokenStream<R>,
) -> ParseResult<Command> {
    let command = match option {
        0 => Command::Exit,
        1 => Command::RegisterPatient {
            id: tokens.value("patient id")?,
            name: tokens.word()?,
            age: tokens.value("age")?,
            history: tokens.word()?,
        },
        2 => Command::Book {
            patient_id: tokens.value("patient id")?,
            doctor_id: tokens.value("doctor id")?,
            slot_id: tokens.optional_id("slot id or -1")?,
        },
        3 => Command::Triage {
            patient_id: tokens.value("patient id")?,
            severity: tokens.value("severity")?,
        },
        4 => Command::Serve {
            doctor_id: tokens.value("doctor id")?,
        },
        5 => Command::Undo,
        6 => {
            let request = match tokens.value::<u32>("report number")? {
                1 => ReportRequest::Doctor(tokens.value("doctor id")?),
                2 => ReportRequest::Summary,
                3 => ReportRequest::TopFrequent(tokens.value("k")?),
                other => {
                    return Err(ParseError::InvalidArgument {
                        expected: "report number 1-3",
                        got: other.to_string(),
                    })
                }
            };
            Command::Report(request)
        }
        7 => Command::ListSlots {
            doctor_id: tokens.value("doctor id")?,
        },
        8 => Command::AddDoctor {
            id: tokens.value("doctor id")?,
            name: tokens.word()?,
            specialization: tokens.word()?,
            capacity: tokens.optional_id("queue capacity or -1")?,
        },
        9 => Command::AddSlot {
            doctor_id: tokens.value("doctor id")?,
            slot_id: tokens.value("slot id")?,
            start: tokens.word()?,
            end: tokens.word()?,
        },
        10 => Command::CancelSlot {
            doctor_id: tokens.value("doctor id")?,
            slot_id: tokens.value("slot id")?,
        },
        11 => Command::SearchPatients {
            query: tokens.word()?,
        },
        other => return Err(ParseError::UnknownOption(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(input: &str) -> TokenStream<Cursor<&str>> {
        TokenStream::new(Cursor::new(input))
    }

    fn parse(input: &str) -> ParseResult<Command> {
        parse_command(&mut stream(input))
    }

    #[test]
    fn test_register() {
        assert_eq!(
            parse("1 4 Mary_Ann 35 Asthma").unwrap(),
            Command::RegisterPatient {
                id: 4,
                name: "Mary_Ann".into(),
                age: 35,
                history: "Asthma".into(),
            }
        );
    }

    #[test]
    fn test_book_with_and_without_slot() {
        assert_eq!(
            parse("2 1 1 101").unwrap(),
            Command::Book { patient_id: 1, doctor_id: 1, slot_id: Some(101) }
        );
        assert_eq!(
            parse("2 1 1 -1").unwrap(),
            Command::Book { patient_id: 1, doctor_id: 1, slot_id: None }
        );
    }

    #[test]
    fn test_tokens_span_lines() {
        assert_eq!(
            parse("3\n2\n   -4\n").unwrap(),
            Command::Triage { patient_id: 2, severity: -4 }
        );
    }

    #[test]
    fn test_reports() {
        assert_eq!(parse("6 1 2").unwrap(), Command::Report(ReportRequest::Doctor(2)));
        assert_eq!(parse("6 2").unwrap(), Command::Report(ReportRequest::Summary));
        assert_eq!(parse("6 3 5").unwrap(), Command::Report(ReportRequest::TopFrequent(5)));
        assert!(matches!(parse("6 9"), Err(ParseError::InvalidArgument { .. })));
    }

    #[test]
    fn test_add_doctor_default_capacity() {
        assert_eq!(
            parse("8 3 Dr_Rao Neuro -1").unwrap(),
            Command::AddDoctor {
                id: 3,
                name: "Dr_Rao".into(),
                specialization: "Neuro".into(),
                capacity: None,
            }
        );
    }

    #[test]
    fn test_invalid_argument() {
        match parse("4 abc") {
            Err(ParseError::InvalidArgument { expected, got }) => {
                assert_eq!(expected, "doctor id");
                assert_eq!(got, "abc");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_option() {
        assert!(matches!(parse("42"), Err(ParseError::UnknownOption(_))));
        assert!(matches!(parse("menu"), Err(ParseError::UnknownOption(_))));
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(parse("9 1 101 09:00"), Err(ParseError::EndOfInput)));
    }

    #[test]
    fn test_consecutive_commands() {
        let mut tokens = stream("5 4 2\n0");
        assert_eq!(parse_command(&mut tokens).unwrap(), Command::Undo);
        assert_eq!(parse_command(&mut tokens).unwrap(), Command::Serve { doctor_id: 2 });
        assert_eq!(parse_command(&mut tokens).unwrap(), Command::Exit);
        assert!(matches!(parse_command(&mut tokens), Err(ParseError::EndOfInput)));
    }

    #[test]
    fn test_end_of_input_before_option() {
        let mut tokens = stream("   \n");
        assert!(parse_option(&mut tokens).unwrap().is_none());
    }

    #[test]
    fn test_every_argument_option_has_prompt() {
        for option in [1, 2, 3, 4, 6, 7, 8, 9, 10, 11] {
            assert!(prompt_for(option).is_some(), "option {}", option);
        }
        assert!(prompt_for(5).is_none());
    }
}
