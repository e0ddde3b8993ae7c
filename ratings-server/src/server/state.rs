// Shared application state
use std::sync::Arc;

use ratings_ledger::RatingLedger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn RatingLedger>,
}
