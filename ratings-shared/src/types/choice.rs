use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SharedError;

/// Represents the verdict a user gives an effect.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    /// The user liked the generated result.
    Good,
    /// The user disliked the generated result.
    Bad,
}

impl Choice {
    /// Returns the lowercase tag used on the wire and in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Good => "good",
            Choice::Bad => "bad",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" | "like" | "up" => Ok(Choice::Good),
            "bad" | "dislike" | "down" => Ok(Choice::Bad),
            other => Err(SharedError::InvalidChoice(other.to_string())),
        }
    }
}
