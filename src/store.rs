// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded, newest-first message store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single accepted poast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Poast {
    pub username: String,
    /// Server-assigned submission time (RFC 3339 on the wire)
    pub poasted: DateTime<Utc>,
    pub poast: String,
}

/// Incoming poast payload, before sanitization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PoastRequest {
    pub username: String,
    pub poast: String,
}

/// Ordered poast collection, newest first, never longer than its capacity.
#[derive(Debug)]
pub struct MessageStore {
    poasts: VecDeque<Poast>,
    capacity: usize,
}

impl MessageStore {
    /// Create an empty store holding at most `capacity` poasts.
    pub fn new(capacity: usize) -> Self {
        Self {
            poasts: VecDeque::new(),
            capacity,
        }
    }

    /// Stamp a poast with the current time, place it at the front and drop
    /// whatever falls beyond capacity.
    pub fn submit(&mut self, username: String, poast: String) -> Poast {
        let poast = Poast {
            username,
            poasted: Utc::now(),
            poast,
        };
        self.poasts.push_front(poast.clone());
        self.poasts.truncate(self.capacity);
        poast
    }

    /// Borrow the current contents, newest first.
    pub fn poasts(&self) -> &VecDeque<Poast> {
        &self.poasts
    }

    /// Copy of the current contents, newest first.
    pub fn snapshot(&self) -> Vec<Poast> {
        self.poasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.poasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poasts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
