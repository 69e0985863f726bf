// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Poast Board
//!
//! A small message board backend. Clients post short messages ("poasts")
//! with a username and the service keeps the most recent ones in memory,
//! serving them as JSON:
//!
//! - Allow-list HTML sanitization with length limits
//! - Bounded newest-first store (100 poasts default)
//! - Serialized response cache, invalidated on every mutation
//! - Conditional GET via `ETag` / `If-None-Match`
//! - Store and cache guarded by one lock so updates are linearizable

pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod sanitizer;
pub mod store;

pub use board::{Board, Submission};
pub use cache::{CacheEntry, CacheLookup, FreshnessToken, ResponseCache};
pub use config::Config;
pub use error::BoardError;
pub use handlers::{router, AppState};
pub use sanitizer::Sanitizer;
pub use store::{MessageStore, Poast, PoastRequest};
