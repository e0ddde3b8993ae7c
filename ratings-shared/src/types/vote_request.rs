use serde::{Deserialize, Serialize};

use crate::types::{Choice, EffectId};

/// Body of a vote submission sent to the ratings ledger.
///
/// `previous_choice` carries the voter's last recorded choice so the ledger
/// can retract it before applying `new_choice`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub effect_id: EffectId,
    pub new_choice: Choice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_choice: Option<Choice>,
}

impl VoteRequest {
    pub fn new(
        effect_id: impl Into<EffectId>,
        new_choice: Choice,
        previous_choice: Option<Choice>,
    ) -> Self {
        Self {
            effect_id: effect_id.into(),
            new_choice,
            previous_choice,
        }
    }
}
