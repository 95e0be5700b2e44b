//! Patient name lookup.
//!
//! A prefix match on the lowercased name scores 1.0; anything else is scored
//! with a blend of Jaro-Winkler and normalized Levenshtein similarity.

use strsim::{jaro_winkler, normalized_levenshtein};

use super::PatientRegistry;
use crate::models::Patient;

/// Minimum similarity for a fuzzy (non-prefix) match.
const MIN_SIMILARITY: f64 = 0.75;

/// A registry hit with its similarity score.
#[derive(Debug, Clone)]
pub struct PatientMatch<'a> {
    pub patient: &'a Patient,
    pub score: f64,
}

impl PatientRegistry {
    /// Find patients whose name resembles `query`, best first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<PatientMatch<'_>> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<PatientMatch<'_>> = self
            .iter()
            .map(|patient| PatientMatch {
                patient,
                score: name_score(&query, &normalize(&patient.name)),
            })
            .filter(|m| m.score >= MIN_SIMILARITY)
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.patient.id.cmp(&b.patient.id))
        });
        matches.truncate(limit);
        matches
    }
}

fn normalize(name: &str) -> String {
    name.replace('_', " ").trim().to_lowercase()
}

fn name_score(query: &str, name: &str) -> f64 {
    if name.starts_with(query) {
        return 1.0;
    }
    jaro_winkler(query, name) * 0.6 + normalized_levenshtein(query, name) * 0.4
}
