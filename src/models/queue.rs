use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::MovieId;

/// Movie ids still to be recommended in the current browsing session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieQueue {
    pending: VecDeque<MovieId>,
}

/// Outcome of stepping the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The movie now being recommended
    Showing(MovieId),
    /// Nothing left; the user has to search again
    Exhausted,
}

impl MovieQueue {
    /// Builds a queue from fresh search results, returning the first id to show.
    ///
    /// Returns `None` for an empty result list.
    pub fn start(ids: impl IntoIterator<Item = MovieId>) -> Option<(MovieId, MovieQueue)> {
        let mut pending: VecDeque<MovieId> = ids.into_iter().collect();
        let first = pending.pop_front()?;
        Some((first, MovieQueue { pending }))
    }

    /// Removes and returns the next id
    pub fn advance(&mut self) -> Advance {
        match self.pending.pop_front() {
            Some(id) => Advance::Showing(id),
            None => Advance::Exhausted,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.pending.iter().copied()
    }
}
