// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The board: message store and response cache behind one lock.
//!
//! Every operation takes the same exclusive lock, so a submit together with
//! its cache invalidation and rebuild is atomic with respect to any read,
//! and concurrent submits never interleave their insert and trim. Nothing
//! awaits while the lock is held.

use crate::cache::{CacheEntry, CacheLookup, FreshnessToken, ResponseCache};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::sanitizer::Sanitizer;
use crate::store::{MessageStore, Poast};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of an accepted poast.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The stored poast, with its server timestamp
    pub poast: Poast,
    /// Freshly built response for the updated board
    pub entry: CacheEntry,
    /// Number of poasts held after the insert
    pub stored: usize,
}

struct BoardState {
    store: MessageStore,
    cache: ResponseCache,
}

/// Shared message board.
pub struct Board {
    state: Mutex<BoardState>,
    sanitizer: Sanitizer,
}

impl Board {
    /// Create an empty board with the given limits.
    pub fn new(config: &BoardConfig) -> Self {
        let store = MessageStore::new(config.capacity);
        debug!(capacity = store.capacity(), "Board created");
        Self {
            state: Mutex::new(BoardState {
                store,
                cache: ResponseCache::new(),
            }),
            sanitizer: Sanitizer::new(config),
        }
    }

    /// Read the serialized board, short-circuiting on a current token.
    pub async fn fetch(&self, presented: &[FreshnessToken]) -> Result<CacheLookup> {
        let mut state = self.state.lock().await;
        let BoardState { store, cache } = &mut *state;
        cache.lookup(presented, || store.poasts())
    }

    /// Sanitize and store a poast, then rebuild the response.
    ///
    /// If the rebuild fails the poast stays stored and the cache stays
    /// empty, so the next read retries.
    pub async fn submit(&self, raw_username: &str, raw_poast: &str) -> Result<Submission> {
        let (username, body) = self.sanitizer.sanitize(raw_username, raw_poast);

        let mut state = self.state.lock().await;
        let BoardState { store, cache } = &mut *state;
        let poast = store.submit(username, body);
        cache.invalidate();
        debug!(stored = store.len(), "Poast stored");

        let entry = cache.get_or_build(|| store.poasts())?;
        Ok(Submission {
            poast,
            entry,
            stored: store.len(),
        })
    }

    /// Point-in-time copy of the stored poasts, newest first.
    pub async fn snapshot(&self) -> Vec<Poast> {
        self.state.lock().await.store.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.store.is_empty()
    }
}
