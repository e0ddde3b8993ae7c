use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Choice;

/// Stable identifier of an effect preset.
pub type EffectId = String;

/// Snapshot of every effect's aggregate, keyed by effect id.
pub type Ratings = BTreeMap<EffectId, Aggregate>;

/// A single user's most recent choice per effect.
pub type UserVotes = BTreeMap<EffectId, Choice>;

/// Represents the aggregated like/dislike counts for one effect.
///
/// Both counters are unsigned, so the aggregate can never go negative.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Aggregate {
    pub likes: u64,
    pub dislikes: u64,
}

impl Aggregate {
    pub fn new(likes: u64, dislikes: u64) -> Self {
        Self { likes, dislikes }
    }

    /// Returns the counter that tracks `choice`.
    pub fn count(&self, choice: Choice) -> u64 {
        match choice {
            Choice::Good => self.likes,
            Choice::Bad => self.dislikes,
        }
    }

    pub fn total(&self) -> u64 {
        self.likes + self.dislikes
    }

    /// Applies one vote, retracting the voter's previous choice first.
    ///
    /// The retraction is floored at zero so a duplicated retraction upstream
    /// cannot drive a counter negative. Callers that need isolation must hold
    /// whatever lock guards this aggregate across the whole call.
    pub fn reconcile(&mut self, new_choice: Choice, previous_choice: Option<Choice>) {
        if let Some(previous) = previous_choice {
            let counter = self.counter_mut(previous);
            *counter = counter.saturating_sub(1);
        }

        let counter = self.counter_mut(new_choice);
        *counter = counter.saturating_add(1);
    }

    fn counter_mut(&mut self, choice: Choice) -> &mut u64 {
        match choice {
            Choice::Good => &mut self.likes,
            Choice::Bad => &mut self.dislikes,
        }
    }
}
