use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::MovieId;

/// Identity supplied by the fronting identity proxy
pub type UserId = i64;

/// Where a movie sits in a user's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    WatchLater,
    Watched,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::WatchLater => "watch_later",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WatchStatus::WatchLater => "Watch Later",
            WatchStatus::Watched => "Watched",
        }
    }
}

impl Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watch_later" => Ok(WatchStatus::WatchLater),
            "watched" => Ok(WatchStatus::Watched),
            other => Err(format!("unknown watch status '{}'", other)),
        }
    }
}

/// A movie saved to a user's list. Unique per (user, movie).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchListEntry {
    pub id: i64,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub status: WatchStatus,
    pub added_on: DateTime<Utc>,
}
