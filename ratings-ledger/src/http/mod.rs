//! HTTP client for a remote ratings ledger service.
//!
//! Routes:
//! - `GET {base}/ratings` → every aggregate as a JSON object
//! - `POST {base}/votes` with a [`VoteRequest`] body → the effect's aggregate
use async_trait::async_trait;
use ratings_shared::types::{Aggregate, Choice, Ratings, VoteRequest};
use reqwest::{Client as ReqwestClient, Response};
use tracing::debug;

use crate::{ensure_effect_id, LedgerError, RatingLedger};

/// Ratings ledger backed by a remote service.
///
/// # Example
///
/// ```ignore
/// use ratings_ledger::{HttpRatingLedger, RatingLedger};
///
/// let ledger = HttpRatingLedger::new("http://localhost:8787");
/// let ratings = ledger.fetch_all().await?;
/// ```
pub struct HttpRatingLedger {
    base_url: String,
    client: ReqwestClient,
}

impl HttpRatingLedger {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, ReqwestClient::new())
    }

    pub fn with_client(base_url: &str, client: ReqwestClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn ensure_success(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LedgerError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RatingLedger for HttpRatingLedger {
    async fn fetch_all(&self) -> Result<Ratings, LedgerError> {
        let url = format!("{}/ratings", self.base_url);
        let response = self.client.get(&url).send().await?;
        let ratings: Ratings = ensure_success(response).await?.json().await?;

        debug!(url = %url, effects = ratings.len(), "Fetched remote ratings");
        Ok(ratings)
    }

    async fn submit_vote(
        &self,
        effect_id: &str,
        new_choice: Choice,
        previous_choice: Option<Choice>,
    ) -> Result<Aggregate, LedgerError> {
        ensure_effect_id(effect_id)?;

        let url = format!("{}/votes", self.base_url);
        let request = VoteRequest::new(effect_id, new_choice, previous_choice);
        let response = self.client.post(&url).json(&request).send().await?;
        let aggregate: Aggregate = ensure_success(response).await?.json().await?;

        debug!(url = %url, effect_id, %new_choice, "Submitted remote vote");
        Ok(aggregate)
    }
}
