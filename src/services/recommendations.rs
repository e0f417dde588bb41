use crate::{
    models::{Advance, FilterCriteria, MovieId, MovieQueue, SessionData},
    services::{discovery::discover_and_prefetch, providers::MovieProvider},
};

/// Runs a new search and replaces the session's queue with its results.
///
/// Returns the first movie to show. When nothing is found the session is left
/// as it was and `None` is returned, so the caller can show the form again.
pub async fn start_search(
    provider: &dyn MovieProvider,
    session: &mut SessionData,
    criteria: &FilterCriteria,
) -> Option<MovieId> {
    let results = discover_and_prefetch(provider, criteria).await;
    let (first, queue) = MovieQueue::start(results.into_iter().map(|movie| movie.id))?;

    tracing::info!(now_showing = first, queued = queue.len(), "Started recommendation queue");

    session.now_showing = Some(first);
    session.queue = queue;
    Some(first)
}

/// Moves the session on to its next queued movie
pub fn advance(session: &mut SessionData) -> Advance {
    let step = session.queue.advance();
    session.now_showing = match step {
        Advance::Showing(id) => Some(id),
        Advance::Exhausted => None,
    };
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiscoverPage, MovieSummary};
    use crate::services::providers::MockMovieProvider;
    use serde_json::Map;

    fn provider_returning(ids: Vec<i64>) -> MockMovieProvider {
        let mut provider = MockMovieProvider::new();
        provider.expect_discover().returning(move |_, page| {
            Ok(DiscoverPage {
                page,
                total_pages: 1,
                results: ids
                    .iter()
                    .map(|&id| MovieSummary {
                        id,
                        extra: Map::new(),
                    })
                    .collect(),
            })
        });
        provider
    }

    #[tokio::test]
    async fn test_search_then_advance_to_exhaustion() {
        let provider = provider_returning(vec![1, 2, 3]);
        let mut session = SessionData::default();

        let first = start_search(&provider, &mut session, &FilterCriteria::default())
            .await
            .unwrap();
        assert_eq!(session.now_showing, Some(first));
        assert_eq!(session.queue.len(), 2);

        let mut shown = vec![first];
        while let Advance::Showing(id) = advance(&mut session) {
            assert_eq!(session.now_showing, Some(id));
            shown.push(id);
        }
        shown.sort();
        assert_eq!(shown, vec![1, 2, 3]);

        assert_eq!(session.now_showing, None);
        assert_eq!(advance(&mut session), Advance::Exhausted);
    }

    #[tokio::test]
    async fn test_empty_search_leaves_session_untouched() {
        let provider = provider_returning(vec![]);
        let (_, queue) = MovieQueue::start([40, 41]).unwrap();
        let mut session = SessionData {
            now_showing: Some(39),
            queue,
            messages: Vec::new(),
        };
        let before = session.clone();

        let result = start_search(&provider, &mut session, &FilterCriteria::default()).await;
        assert!(result.is_none());
        assert_eq!(session, before);
    }

    #[tokio::test]
    async fn test_new_search_replaces_queue() {
        let provider = provider_returning(vec![7]);
        let (_, queue) = MovieQueue::start([1, 2, 3]).unwrap();
        let mut session = SessionData {
            now_showing: Some(1),
            queue,
            messages: Vec::new(),
        };

        let first = start_search(&provider, &mut session, &FilterCriteria::default()).await;
        assert_eq!(first, Some(7));
        assert!(session.queue.is_empty());
    }

    #[test]
    fn test_advance_on_fresh_session() {
        let mut session = SessionData::default();
        assert_eq!(advance(&mut session), Advance::Exhausted);
        assert_eq!(session.now_showing, None);
    }
}
