// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route cache revalidation.
//!
//! Profile updates may invalidate the cached rendering of a UI route. Which
//! routes are eligible comes from configuration; matching is an exact string
//! comparison, so `/profile/edit/` or `/Profile/Edit` never match the default
//! `/profile/edit` entry. Each revalidation bumps a per-route epoch counter
//! shared across requests, which makes invalidations observable.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Tracks revalidation eligibility and per-route revalidation epochs.
#[derive(Clone)]
pub struct Revalidator {
    /// Routes eligible for revalidation (exact match).
    routes: Arc<HashSet<String>>,
    /// Monotonic revalidation counter per route (shared across clones).
    epochs: Arc<DashMap<String, u64>>,
}

impl Revalidator {
    pub fn new<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            routes: Arc::new(routes.into_iter().collect()),
            epochs: Arc::new(DashMap::new()),
        }
    }

    /// Revalidate the route's cached rendering if the policy covers it.
    ///
    /// Returns whether a revalidation fired.
    pub fn revalidate_if_eligible(&self, path: &str) -> bool {
        if !self.routes.contains(path) {
            tracing::debug!(path, "Path not covered by revalidation policy");
            return false;
        }

        let epoch = {
            let mut entry = self.epochs.entry(path.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        tracing::info!(path, epoch, "Route cache revalidated");
        true
    }

    /// Current revalidation epoch for a route (0 if never revalidated).
    pub fn epoch(&self, path: &str) -> u64 {
        self.epochs.get(path).map(|e| *e).unwrap_or(0)
    }
}
