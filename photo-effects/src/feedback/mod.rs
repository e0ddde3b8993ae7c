//! The vote flow: read the local user's previous choice, send the delta to
//! the ratings ledger, remember the new choice, and refresh aggregates.
//!
//! The ledger is the authority on aggregates. The local vote record is only
//! written after the ledger accepted the change, so a failed submission
//! leaves the user free to try the same vote again.
use std::sync::Arc;

use ratings_ledger::RatingLedger;
use ratings_shared::types::{Aggregate, Choice, EffectId, Ratings, UserVotes};
use ratings_store::VoteStore;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::errors::FeedbackError;

/// Result of a vote submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub effect_id: EffectId,
    pub choice: Choice,
    /// Aggregate for `effect_id` after the vote.
    pub aggregate: Aggregate,
    /// Fresh snapshot of every aggregate.
    pub ratings: Ratings,
    /// False when the user repeated their previous choice and nothing was sent.
    pub changed: bool,
}

pub struct FeedbackService {
    ledger: Arc<dyn RatingLedger>,
    votes: VoteStore,
    // Held for the whole submission; a second caller is turned away.
    voting: Mutex<()>,
}

impl FeedbackService {
    pub fn new(ledger: Arc<dyn RatingLedger>, votes: VoteStore) -> Self {
        Self {
            ledger,
            votes,
            voting: Mutex::new(()),
        }
    }

    /// Current aggregates from the ledger.
    pub async fn ratings(&self) -> Result<Ratings, FeedbackError> {
        Ok(self.ledger.fetch_all().await?)
    }

    /// Every vote the local user has cast.
    pub async fn user_votes(&self) -> UserVotes {
        self.votes.votes().await
    }

    pub async fn user_vote(&self, effect_id: &str) -> Option<Choice> {
        self.votes.get_vote(effect_id).await
    }

    /// Cast or change the local user's vote on `effect_id`.
    ///
    /// Only one submission runs at a time; a concurrent call fails with
    /// [`FeedbackError::VoteInProgress`] without touching the ledger.
    /// Repeating the previous choice sends nothing and just reports the
    /// current aggregate.
    pub async fn submit_vote(
        &self,
        effect_id: &str,
        choice: Choice,
    ) -> Result<VoteOutcome, FeedbackError> {
        let _voting = self
            .voting
            .try_lock()
            .map_err(|_| FeedbackError::VoteInProgress)?;

        let previous = self.votes.get_vote(effect_id).await;

        if previous == Some(choice) {
            info!(effect_id, %choice, "Vote unchanged, nothing to submit");
            let ratings = self.ledger.fetch_all().await?;
            return Ok(VoteOutcome {
                effect_id: effect_id.to_string(),
                choice,
                aggregate: ratings.get(effect_id).copied().unwrap_or_default(),
                ratings,
                changed: false,
            });
        }

        let aggregate = self
            .ledger
            .submit_vote(effect_id, choice, previous)
            .await
            .map_err(|e| {
                error!(effect_id, %choice, error = %e, "Failed to submit vote");
                e
            })?;

        // The ledger already counted the vote; losing the local record only
        // means the next change is sent without a previous choice.
        if let Err(e) = self.votes.record_vote(effect_id, choice).await {
            warn!(effect_id, %choice, error = %e, "Failed to record vote locally");
        }

        let ratings = self.ledger.fetch_all().await?;

        info!(
            effect_id,
            %choice,
            likes = aggregate.likes,
            dislikes = aggregate.dislikes,
            "Vote submitted"
        );

        Ok(VoteOutcome {
            effect_id: effect_id.to_string(),
            choice,
            aggregate,
            ratings,
            changed: true,
        })
    }
}
