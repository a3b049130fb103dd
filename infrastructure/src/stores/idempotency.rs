//! Check-and-set idempotency store.

use async_trait::async_trait;
use conductor_application::ports::stores::{IdempotencyClaim, IdempotencyStore, StoreError};
use conductor_domain::tool::ToolResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

enum EntryState {
    InFlight,
    Completed(ToolResult),
}

struct Entry {
    state: EntryState,
    expires_at: Instant,
}

/// Idempotency keys held in memory.
///
/// Claims expire after their TTL as well, so a caller that never completes
/// or releases cannot block the key forever.
#[derive(Default)]
pub struct InMemoryIdempotencyStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn claim(&self, key: &str, ttl: Duration) -> Result<IdempotencyClaim, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);

        if let Some(entry) = entries.get(key) {
            return Ok(match &entry.state {
                EntryState::InFlight => IdempotencyClaim::InFlight,
                EntryState::Completed(result) => IdempotencyClaim::Completed(result.clone()),
            });
        }

        entries.insert(
            key.to_string(),
            Entry {
                state: EntryState::InFlight,
                expires_at: now + ttl,
            },
        );
        debug!(key = %key, "Idempotency key claimed");
        Ok(IdempotencyClaim::Claimed)
    }

    async fn complete(&self, key: &str, result: &ToolResult, ttl: Duration) -> Result<(), StoreError> {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                state: EntryState::Completed(result.clone()),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn release(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if matches!(entries.get(key), Some(Entry { state: EntryState::InFlight, .. })) {
            entries.remove(key);
        }
        Ok(())
    }
}
