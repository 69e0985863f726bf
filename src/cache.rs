// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialized response cache.
//!
//! Holds the JSON body for the current store contents together with a
//! freshness token. The entry is built lazily on read and cleared on every
//! store mutation; each build mints a new, strictly larger token so clients
//! can revalidate with `If-None-Match`.

use crate::error::BoardError;
use axum::body::Bytes;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Opaque version identifier for one build of the cached body.
///
/// Derived from the build time in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreshnessToken(u64);

impl FreshnessToken {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Parse a single entity tag as sent by a client.
    ///
    /// Accepts `"123"`, `W/"123"` and the bare `123` form.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let value = value.strip_prefix("W/").unwrap_or(value);
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        value.parse().ok().map(Self)
    }

    /// Parse a comma-separated `If-None-Match` list, skipping unparsable items.
    pub fn parse_list(value: &str) -> Vec<Self> {
        value.split(',').filter_map(Self::parse).collect()
    }
}

impl fmt::Display for FreshnessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// A built cache entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized JSON body
    pub body: Bytes,
    /// Token identifying this build
    pub token: FreshnessToken,
}

/// Outcome of a conditional cache read.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// A presented token matches the current entry
    NotModified(FreshnessToken),
    /// The existing entry was returned as-is
    Hit(CacheEntry),
    /// The entry was (re)built for this read
    Built(CacheEntry),
}

impl CacheLookup {
    pub fn token(&self) -> FreshnessToken {
        match self {
            Self::NotModified(token) => *token,
            Self::Hit(entry) | Self::Built(entry) => entry.token,
        }
    }
}

/// Memoized serialized representation of the message store.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entry: Option<CacheEntry>,
    last_token: Option<FreshnessToken>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a built entry is currently held.
    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    /// Drop the current entry.
    pub fn invalidate(&mut self) {
        if let Some(entry) = self.entry.take() {
            debug!(token = entry.token.as_u64(), "Response cache invalidated");
        }
    }

    /// Return the current entry, building it from `snapshot` when empty.
    ///
    /// `snapshot` is only called on a miss. A serialization failure leaves
    /// the cache empty so the next call retries.
    pub fn get_or_build<T, F>(&mut self, snapshot: F) -> Result<CacheEntry, BoardError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        match &self.entry {
            Some(entry) => {
                debug!(token = entry.token.as_u64(), "Response cache hit");
                Ok(entry.clone())
            }
            None => self.build(snapshot),
        }
    }

    /// Conditional read: short-circuits when any presented token matches the
    /// current entry, otherwise returns the entry, building it if needed.
    pub fn lookup<T, F>(
        &mut self,
        presented: &[FreshnessToken],
        snapshot: F,
    ) -> Result<CacheLookup, BoardError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        match &self.entry {
            Some(entry) if presented.contains(&entry.token) => {
                debug!(token = entry.token.as_u64(), "Presented token is current");
                Ok(CacheLookup::NotModified(entry.token))
            }
            Some(entry) => {
                debug!(token = entry.token.as_u64(), "Response cache hit");
                Ok(CacheLookup::Hit(entry.clone()))
            }
            None => self.build(snapshot).map(CacheLookup::Built),
        }
    }

    fn build<T, F>(&mut self, snapshot: F) -> Result<CacheEntry, BoardError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        debug!("Response cache is empty, rebuilding");
        let body = serde_json::to_vec(&snapshot())?;
        let entry = CacheEntry {
            body: Bytes::from(body),
            token: self.next_token(),
        };
        debug!(token = entry.token.as_u64(), bytes = entry.body.len(), "Response cache rebuilt");
        self.entry = Some(entry.clone());
        Ok(entry)
    }

    /// Mint a token from the current time, strictly above any issued before.
    fn next_token(&mut self) -> FreshnessToken {
        let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        let token = match self.last_token {
            Some(FreshnessToken(previous)) if previous >= now => FreshnessToken(previous + 1),
            _ => FreshnessToken(now),
        };
        self.last_token = Some(token);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use std::cell::Cell;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_builds_once_until_invalidated() {
        let mut cache = ResponseCache::new();
        let calls = Cell::new(0);
        let snapshot = || {
            calls.set(calls.get() + 1);
            vec!["a", "b"]
        };

        let first = cache.get_or_build(snapshot).unwrap();
        let second = cache.get_or_build(snapshot).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(first.body, second.body);
        assert_eq!(first.token, second.token);
        assert_eq!(&first.body[..], br#"["a","b"]"#);

        cache.invalidate();
        assert!(!cache.is_valid());
        let third = cache.get_or_build(snapshot).unwrap();
        assert_eq!(calls.get(), 2);
        assert!(third.token > first.token);
    }

    #[test]
    fn test_tokens_strictly_increase() {
        let mut cache = ResponseCache::new();
        let mut previous = cache.get_or_build(Vec::<u8>::new).unwrap().token;
        for _ in 0..1000 {
            cache.invalidate();
            let token = cache.get_or_build(Vec::<u8>::new).unwrap().token;
            assert!(token > previous);
            previous = token;
        }
    }

    #[test]
    fn test_lookup_not_modified() {
        let mut cache = ResponseCache::new();
        let built = match cache.lookup(&[], || 1).unwrap() {
            CacheLookup::Built(entry) => entry,
            other => panic!("expected a build, got {other:?}"),
        };

        let lookup = cache.lookup(&[built.token], || 1).unwrap();
        assert!(matches!(lookup, CacheLookup::NotModified(token) if token == built.token));

        let stale = FreshnessToken(built.token.as_u64() - 1);
        assert!(matches!(cache.lookup(&[stale], || 1).unwrap(), CacheLookup::Hit(_)));
    }

    #[test]
    fn test_lookup_after_invalidate_rebuilds_even_with_old_token() {
        let mut cache = ResponseCache::new();
        let old = cache.get_or_build(|| 1).unwrap();
        cache.invalidate();

        match cache.lookup(&[old.token], || 2).unwrap() {
            CacheLookup::Built(entry) => {
                assert_ne!(entry.token, old.token);
                assert_eq!(&entry.body[..], b"2");
            }
            other => panic!("expected a rebuild, got {other:?}"),
        }
    }

    #[test]
    fn test_serialization_failure_does_not_poison() {
        let mut cache = ResponseCache::new();
        let err = cache.get_or_build(|| Unserializable).unwrap_err();
        assert!(matches!(err, BoardError::Serialization(_)));
        assert!(!cache.is_valid());

        let entry = cache.get_or_build(|| "recovered").unwrap();
        assert_eq!(&entry.body[..], br#""recovered""#);
    }

    #[test]
    fn test_token_parsing() {
        assert_eq!(FreshnessToken::parse("\"42\""), Some(FreshnessToken(42)));
        assert_eq!(FreshnessToken::parse("W/\"42\""), Some(FreshnessToken(42)));
        assert_eq!(FreshnessToken::parse(" 42 "), Some(FreshnessToken(42)));
        assert_eq!(FreshnessToken::parse("*"), None);
        assert_eq!(FreshnessToken::parse("\"abc\""), None);
        assert_eq!(
            FreshnessToken::parse_list("\"1\", W/\"2\", junk"),
            vec![FreshnessToken(1), FreshnessToken(2)]
        );
        assert_eq!(FreshnessToken(7).to_string(), "\"7\"");
    }
}
