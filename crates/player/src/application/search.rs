//! Debounced user search.
//!
//! Every call takes a ticket. After the debounce delay, and again after the
//! request returns, the call checks that its ticket is still the latest; a
//! superseded call resolves to `Ok(None)` and never surfaces results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rally_domain::UserSummary;

use crate::application::ServiceError;
use crate::ports::outbound::SocialApi;
use crate::state::lookup;
use crate::state::{SliceStore, SocialSlice};

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Clone)]
pub struct UserSearch {
    api: Arc<dyn SocialApi>,
    store: SliceStore,
    debounce: Duration,
    latest: Arc<AtomicU64>,
}

impl UserSearch {
    pub fn new(api: Arc<dyn SocialApi>, store: SliceStore, debounce: Duration) -> Self {
        Self {
            api,
            store,
            debounce,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Search users by name. Blocked users and the local user are filtered
    /// out of the results.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<UserSummary>>, ServiceError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(ticket) {
            return Ok(None);
        }

        let query = query.trim();
        if query.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let result = self.api.search_users(query.to_string()).await;
        if !self.is_latest(ticket) {
            tracing::debug!(ticket, "Discarding superseded search results");
            return Ok(None);
        }
        let users = result?;

        let me = lookup::local_user_id(&self.store);
        let social = self.store.get::<SocialSlice>();
        Ok(Some(
            users
                .into_iter()
                .filter(|u| Some(u.id) != me)
                .filter(|u| !social.as_ref().is_some_and(|s| s.is_blocked(u.id)))
                .collect(),
        ))
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
