//! # Event Log Adapter
//!
//! Append-only in-memory event log with a live broadcast feed.
//!
//! Stored records are never removed. Subscribers receive every record
//! appended after they subscribed; a lagging subscriber loses the oldest
//! records of its buffer, the log itself keeps them.

use crate::domain::value_objects::TokenId;
use crate::events::{EventRecord, RegistryEvent};
use crate::ports::outbound::EventSink;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Default buffer size of the live feed.
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct LogInner {
    records: Vec<EventRecord>,
    /// Next log index per `(chain_id, block_number)`.
    next_index: HashMap<(u64, u64), u64>,
}

/// In-memory event log.
pub struct InMemoryEventLog {
    inner: RwLock<LogInner>,
    sender: broadcast::Sender<EventRecord>,
    events_published: AtomicU64,
}

impl InMemoryEventLog {
    /// Create a log with the default feed capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Create a log whose live feed buffers `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: RwLock::new(LogInner::default()),
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Receive every record appended from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        debug!("New event log subscription");
        self.sender.subscribe()
    }

    /// All stored records, in append order.
    pub async fn records(&self) -> Vec<EventRecord> {
        self.inner.read().await.records.clone()
    }

    /// Records concerning one token, in append order.
    pub async fn records_for_token(&self, token_id: TokenId) -> Vec<EventRecord> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .filter(|record| record.event.token_id() == Some(token_id))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }

    /// Total records appended.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for InMemoryEventLog {
    async fn emit(
        &self,
        chain_id: u64,
        block_number: u64,
        events: Vec<RegistryEvent>,
    ) -> Vec<EventRecord> {
        let mut inner = self.inner.write().await;
        let mut next = inner
            .next_index
            .get(&(chain_id, block_number))
            .copied()
            .unwrap_or(0);

        let mut appended = Vec::with_capacity(events.len());
        for event in events {
            appended.push(EventRecord::new(chain_id, block_number, next, event));
            next += 1;
        }
        inner.next_index.insert((chain_id, block_number), next);
        inner.records.extend(appended.iter().cloned());
        drop(inner);

        self.events_published
            .fetch_add(appended.len() as u64, Ordering::Relaxed);
        for record in &appended {
            // Without live subscribers the send fails; the record stays in the log.
            if let Ok(receivers) = self.sender.send(record.clone()) {
                debug!(
                    id = %record.id(),
                    event = record.event.name(),
                    receivers,
                    "Event published"
                );
            }
        }
        appended
    }
}

// =============================================================================
// TESTS
// =============================================================================
