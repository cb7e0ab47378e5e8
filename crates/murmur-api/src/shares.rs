use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use murmur_db::Database;
use murmur_types::models::ShareFact;

use crate::cache::ShareCache;
use crate::error::ShareError;

/// Upper bound on `list_sharers` results. Callers wanting the full list of a
/// widely shared status have to page through the store themselves.
pub const MAX_SHARERS: u32 = 100;

/// Storage seam for share facts: one partition per status id.
pub trait ShareStore: Send + Sync {
    fn insert_share(&self, fact: &ShareFact) -> anyhow::Result<()>;

    /// Sharers of `status_id` in store order, at most `limit` of them.
    fn select_sharers(&self, status_id: Uuid, limit: u32) -> anyhow::Result<Vec<String>>;
}

impl ShareStore for Database {
    fn insert_share(&self, fact: &ShareFact) -> anyhow::Result<()> {
        Database::insert_share(self, fact)
    }

    fn select_sharers(&self, status_id: Uuid, limit: u32) -> anyhow::Result<Vec<String>> {
        self.get_sharers(&status_id, limit)
    }
}

/// Records and queries who reshared which status.
#[derive(Clone)]
pub struct ShareRecordService {
    store: Arc<dyn ShareStore>,
    cache: Arc<dyn ShareCache>,
}

impl ShareRecordService {
    pub fn new(store: Arc<dyn ShareStore>, cache: Arc<dyn ShareCache>) -> Self {
        Self { store, cache }
    }

    /// Append a share fact and drop the cached sharer list for that status.
    pub fn record_share(&self, status_id: &str, sharer_username: &str) -> Result<(), ShareError> {
        let status_id = parse_status_id(status_id)?;
        if sharer_username.trim().is_empty() {
            return Err(ShareError::EmptyUsername);
        }

        self.store
            .insert_share(&ShareFact::new(status_id, sharer_username))?;
        self.cache.evict(&status_id);

        debug!("{} shared status {}", sharer_username, status_id);
        Ok(())
    }

    /// Up to [`MAX_SHARERS`] usernames, served from cache when present.
    pub fn list_sharers(&self, status_id: &str) -> Result<Vec<String>, ShareError> {
        let status_id = parse_status_id(status_id)?;

        if let Some(usernames) = self.cache.get(&status_id) {
            debug!("Sharers of {} served from cache", status_id);
            return Ok(usernames);
        }

        let usernames = self.store.select_sharers(status_id, MAX_SHARERS)?;
        self.cache.put(status_id, usernames.clone());
        Ok(usernames)
    }

    /// Probes the store for a single row. Never cached.
    pub fn has_been_shared(&self, status_id: &str) -> Result<bool, ShareError> {
        let status_id = parse_status_id(status_id)?;
        let probe = self.store.select_sharers(status_id, 1)?;
        Ok(!probe.is_empty())
    }
}

fn parse_status_id(status_id: &str) -> Result<Uuid, ShareError> {
    Uuid::parse_str(status_id).map_err(|_| ShareError::InvalidIdentifier(status_id.to_string()))
}
