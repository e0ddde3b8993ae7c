//! The built-in effect catalog.
use std::collections::HashSet;

use clap::ValueEnum;
use ratings_shared::types::{Aggregate, Choice, Effect, Ratings, UserVotes};

use crate::errors::CatalogError;

const BUILTIN_EFFECTS: &str = include_str!("effects.json");

/// Ordering of the effect list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOption {
    /// Most likes first.
    Popular,
    /// By title, case-insensitive.
    Alphabetical,
    /// Catalog order, newest additions first.
    #[default]
    Newest,
}

/// An effect together with its current aggregate and the local user's vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedEffect<'a> {
    pub effect: &'a Effect,
    pub aggregate: Aggregate,
    pub user_vote: Option<Choice>,
}

#[derive(Debug, Clone)]
pub struct EffectCatalog {
    effects: Vec<Effect>,
}

impl EffectCatalog {
    /// The effects shipped with the app.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_EFFECTS)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Self::from_effects(serde_json::from_str(raw)?)
    }

    pub fn from_effects(effects: Vec<Effect>) -> Result<Self, CatalogError> {
        if effects.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for effect in &effects {
            if !seen.insert(effect.id.as_str()) {
                return Err(CatalogError::DuplicateId(effect.id.clone()));
            }
        }

        Ok(Self { effects })
    }

    pub fn get(&self, effect_id: &str) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.id == effect_id)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Merge aggregates and votes into the catalog and sort it.
    ///
    /// Effects missing from `ratings` count as `0/0`. Sorting is stable, so
    /// ties keep catalog order.
    pub fn rated(
        &self,
        ratings: &Ratings,
        votes: &UserVotes,
        sort: SortOption,
    ) -> Vec<RatedEffect<'_>> {
        let mut rated: Vec<RatedEffect<'_>> = self
            .effects
            .iter()
            .map(|effect| RatedEffect {
                effect,
                aggregate: ratings.get(&effect.id).copied().unwrap_or_default(),
                user_vote: votes.get(&effect.id).copied(),
            })
            .collect();

        match sort {
            SortOption::Popular => rated.sort_by(|a, b| b.aggregate.likes.cmp(&a.aggregate.likes)),
            SortOption::Alphabetical => rated.sort_by(|a, b| {
                a.effect
                    .title
                    .to_lowercase()
                    .cmp(&b.effect.title.to_lowercase())
            }),
            SortOption::Newest => {}
        }

        rated
    }
}
