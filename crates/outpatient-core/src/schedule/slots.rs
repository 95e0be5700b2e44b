//! Ordered slot registry for one doctor.

use serde::{Deserialize, Serialize};

use super::{ScheduleError, ScheduleResult};
use crate::models::{Slot, SlotId};

/// Slots kept in insertion order. Removal is by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a free slot. Slot ids are unique within a registry.
    pub fn add(&mut self, id: SlotId, start: &str, end: &str) -> ScheduleResult<&Slot> {
        if self.position(id).is_some() {
            return Err(ScheduleError::DuplicateSlot(id));
        }
        self.slots.push(Slot::new(id, start, end));
        Ok(&self.slots[self.slots.len() - 1])
    }

    /// Physically remove a slot, returning its former position and contents.
    pub fn remove(&mut self, id: SlotId) -> ScheduleResult<(usize, Slot)> {
        let position = self.position(id).ok_or(ScheduleError::SlotNotFound(id))?;
        Ok((position, self.slots.remove(position)))
    }

    /// Put a previously removed slot back. Positions past the end append.
    pub fn insert_at(&mut self, position: usize, slot: Slot) -> ScheduleResult<()> {
        if self.position(slot.id).is_some() {
            return Err(ScheduleError::DuplicateSlot(slot.id));
        }
        let position = position.min(self.slots.len());
        self.slots.insert(position, slot);
        Ok(())
    }

    pub fn find(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// First free slot in insertion order.
    pub fn next_free(&self) -> Option<&Slot> {
        self.slots.iter().find(|s| !s.is_taken())
    }

    /// First taken slot in insertion order.
    pub fn first_taken_mut(&mut self) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.is_taken())
    }

    pub fn taken_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_taken()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Token;

    fn registry() -> SlotRegistry {
        let mut slots = SlotRegistry::new();
        slots.add(101, "09:00", "09:15").unwrap();
        slots.add(102, "09:15", "09:30").unwrap();
        slots.add(103, "09:30", "09:45").unwrap();
        slots
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let slots = registry();
        let ids: Vec<_> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![101, 102, 103]);
        assert!(slots.iter().all(|s| !s.is_taken()));
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let mut slots = registry();
        let err = slots.add(102, "10:00", "10:15").unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateSlot(102));
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_next_free_skips_taken() {
        let mut slots = registry();
        slots.find_mut(101).unwrap().booking = Some(Token::routine(1, 1, 1, Some(101)));
        assert_eq!(slots.next_free().unwrap().id, 102);
        assert_eq!(slots.taken_count(), 1);
    }

    #[test]
    fn test_next_free_none_when_all_taken() {
        let mut slots = registry();
        for (i, id) in [101, 102, 103].into_iter().enumerate() {
            slots.find_mut(id).unwrap().booking = Some(Token::routine(i as u64 + 1, 1, 1, Some(id)));
        }
        assert!(slots.next_free().is_none());
    }

    #[test]
    fn test_remove_and_reinsert_restores_order() {
        let mut slots = registry();
        let (position, slot) = slots.remove(102).unwrap();
        assert_eq!(position, 1);
        assert!(slots.find(102).is_none());

        slots.insert_at(position, slot).unwrap();
        let ids: Vec<_> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![101, 102, 103]);
    }

    #[test]
    fn test_remove_unknown_slot() {
        let mut slots = registry();
        assert_eq!(slots.remove(999).unwrap_err(), ScheduleError::SlotNotFound(999));
    }

    #[test]
    fn test_insert_at_past_end_appends() {
        let mut slots = SlotRegistry::new();
        slots.insert_at(5, Slot::new(1, "a", "b")).unwrap();
        assert_eq!(slots.position(1), Some(0));
    }
}
