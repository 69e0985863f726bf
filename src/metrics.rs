// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the poast board.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

/// Board metrics, registered on a private registry.
pub struct BoardMetrics {
    registry: Registry,
    /// Poasts accepted into the store
    pub poasts_submitted: IntCounter,
    /// POST bodies that failed to parse
    pub poasts_rejected: IntCounter,
    /// Serialized response rebuilds
    pub cache_rebuilds: IntCounter,
    /// Conditional GETs answered with 304
    pub not_modified: IntCounter,
    /// Poasts currently held
    pub poasts_stored: IntGauge,
}

impl BoardMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let poasts_submitted =
            IntCounter::new("poasts_submitted_total", "Poasts accepted into the store")?;
        let poasts_rejected =
            IntCounter::new("poasts_rejected_total", "Poast payloads rejected as malformed")?;
        let cache_rebuilds =
            IntCounter::new("poast_cache_rebuilds_total", "Serialized response cache rebuilds")?;
        let not_modified =
            IntCounter::new("poast_not_modified_total", "Conditional reads answered with 304")?;
        let poasts_stored = IntGauge::new("poasts_stored", "Poasts currently held in memory")?;

        registry.register(Box::new(poasts_submitted.clone()))?;
        registry.register(Box::new(poasts_rejected.clone()))?;
        registry.register(Box::new(cache_rebuilds.clone()))?;
        registry.register(Box::new(not_modified.clone()))?;
        registry.register(Box::new(poasts_stored.clone()))?;

        Ok(Self {
            registry,
            poasts_submitted,
            poasts_rejected,
            cache_rebuilds,
            not_modified,
            poasts_stored,
        })
    }

    /// Encode all metrics in the Prometheus text format.
    ///
    /// Returns the content type alongside the encoded body.
    pub fn encode(&self) -> prometheus::Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((encoder.format_type().to_string(), buffer))
    }
}
