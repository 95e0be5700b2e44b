//! Patient registry.

mod search;

pub use search::*;

use std::collections::HashMap;

use crate::models::{Patient, PatientId};

/// Patients keyed by caller-assigned id. Records are never deleted by
/// ordinary operations; re-registering overwrites.
#[derive(Debug, Clone, Default)]
pub struct PatientRegistry {
    patients: HashMap<PatientId, Patient>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully overwrite a record, returning the value it replaced.
    pub fn upsert(&mut self, patient: Patient) -> Option<Patient> {
        self.patients.insert(patient.id, patient)
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.patients.contains_key(&id)
    }

    /// Drop a record. Only used when undoing a first registration.
    pub fn remove(&mut self, id: PatientId) -> Option<Patient> {
        self.patients.remove(&id)
    }

    /// Bump the visit counter. Returns false if the patient is unknown.
    pub fn increment_frequency(&mut self, id: PatientId) -> bool {
        match self.patients.get_mut(&id) {
            Some(patient) => {
                patient.frequency = patient.frequency.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Reverse one [`increment_frequency`](Self::increment_frequency). Saturates at zero.
    pub fn decrement_frequency(&mut self, id: PatientId) -> bool {
        match self.patients.get_mut(&id) {
            Some(patient) => {
                patient.frequency = patient.frequency.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// The `k` most frequent patients, highest first; ties go to the larger id.
    pub fn top_frequent(&self, k: usize) -> Vec<&Patient> {
        let mut ranked: Vec<&Patient> = self.patients.values().collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(b.id.cmp(&a.id)));
        ranked.truncate(k);
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_returns_previous() {
        let mut registry = PatientRegistry::new();
        assert!(registry.upsert(Patient::new(1, "Ananya", 22, "No_history")).is_none());

        let previous = registry
            .upsert(Patient::new(1, "Ananya", 23, "Asthma"))
            .unwrap();
        assert_eq!(previous.age, 22);
        assert_eq!(registry.get(1).unwrap().history, "Asthma");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_frequency_counters() {
        let mut registry = PatientRegistry::new();
        registry.upsert(Patient::new(1, "Ananya", 22, ""));

        assert!(registry.increment_frequency(1));
        assert!(registry.increment_frequency(1));
        assert!(registry.decrement_frequency(1));
        assert_eq!(registry.get(1).unwrap().frequency, 1);

        assert!(!registry.increment_frequency(99));
    }

    #[test]
    fn test_decrement_saturates() {
        let mut registry = PatientRegistry::new();
        registry.upsert(Patient::new(1, "Ananya", 22, ""));
        registry.decrement_frequency(1);
        assert_eq!(registry.get(1).unwrap().frequency, 0);
    }

    #[test]
    fn test_top_frequent_ordering() {
        let mut registry = PatientRegistry::new();
        for id in 1..=4 {
            registry.upsert(Patient::new(id, format!("P{}", id), 30, ""));
        }
        for _ in 0..3 {
            registry.increment_frequency(2);
        }
        registry.increment_frequency(1);
        registry.increment_frequency(3);

        let top: Vec<_> = registry.top_frequent(3).iter().map(|p| p.id).collect();
        assert_eq!(top, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_frequent_k_larger_than_registry() {
        let mut registry = PatientRegistry::new();
        registry.upsert(Patient::new(1, "A", 1, ""));
        assert_eq!(registry.top_frequent(10).len(), 1);
        assert!(registry.top_frequent(0).is_empty());
    }
}
