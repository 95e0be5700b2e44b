//! Doctor time slots.

use serde::{Deserialize, Serialize};

use super::{SlotId, Token, TokenId};

/// A schedulable time window. Start and end are opaque labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub start: String,
    pub end: String,
    /// Occupying token; `None` while the slot is free
    pub booking: Option<Token>,
}

impl Slot {
    /// Create a free slot.
    pub fn new(id: SlotId, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id,
            start: start.into(),
            end: end.into(),
            booking: None,
        }
    }

    pub fn is_taken(&self) -> bool {
        self.booking.is_some()
    }

    /// Id of the occupying token, if taken.
    pub fn token_id(&self) -> Option<TokenId> {
        self.booking.as_ref().map(|t| t.id)
    }
}
