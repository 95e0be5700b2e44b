//! Engine-wide summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ReportBuilder;
use crate::models::PatientId;

/// Served versus pending work across the whole engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSummary {
    pub served: u64,
    pub pending: usize,
    /// Portion of `pending` waiting in triage
    pub triage_waiting: usize,
    pub undo_depth: usize,
}

impl ServiceSummary {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ServiceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Served: {} | Pending: {} (triage: {})",
            self.served, self.pending, self.triage_waiting
        )
    }
}

/// One row of the frequency ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequentPatient {
    pub patient_id: PatientId,
    pub name: String,
    pub frequency: u32,
}

/// Top-K patients by visit frequency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequentPatients {
    pub k: usize,
    pub patients: Vec<FrequentPatient>,
}

impl FrequentPatients {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("patient_id,name,frequency\n");
        for row in &self.patients {
            csv.push_str(&format!(
                "{},{},{}\n",
                row.patient_id,
                escape_csv(&row.name),
                row.frequency
            ));
        }
        csv
    }
}

impl fmt::Display for FrequentPatients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Top {} frequent patients:", self.k)?;
        for row in &self.patients {
            write!(
                f,
                "\n  PatientId {} freq {} name: {}",
                row.patient_id, row.frequency, row.name
            )?;
        }
        Ok(())
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

impl<'a> ReportBuilder<'a> {
    /// Served and pending totals.
    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            served: self.engine.served_count(),
            pending: self.engine.pending_count(),
            triage_waiting: self.engine.triage_len(),
            undo_depth: self.engine.undo_depth(),
        }
    }

    /// The `k` most frequent patients.
    pub fn top_frequent(&self, k: usize) -> FrequentPatients {
        let patients = self
            .engine
            .patients()
            .top_frequent(k)
            .into_iter()
            .map(|p| FrequentPatient {
                patient_id: p.id,
                name: p.display_name(),
                frequency: p.frequency,
            })
            .collect();
        FrequentPatients { k, patients }
    }
}
