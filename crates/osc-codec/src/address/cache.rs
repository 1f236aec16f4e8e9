//! Shared cache of compiled address matchers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use regex_lite::Regex;
use tracing::{debug, trace};

use crate::{Error, Result};

/// Compiled matchers keyed by their regular expression text
///
/// Safe to share between threads. Two threads compiling the same
/// expression at once may both compile it; only one entry is kept.
#[derive(Debug)]
pub struct MatcherCache {
    entries: DashMap<String, Arc<Regex>>,
    enabled: AtomicBool,
}

impl Default for MatcherCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherCache {
    /// An empty, enabled cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// The process-wide cache used by [`OscAddress::new`](crate::OscAddress::new)
    pub fn global() -> &'static MatcherCache {
        static GLOBAL: OnceLock<MatcherCache> = OnceLock::new();
        GLOBAL.get_or_init(MatcherCache::new)
    }

    /// Get the matcher for `pattern`, compiling it on first use. When the
    /// cache is disabled every call compiles a fresh matcher.
    pub fn acquire(&self, pattern: &str) -> Result<Arc<Regex>> {
        if !self.is_enabled() {
            return compile(pattern).map(Arc::new);
        }

        if let Some(entry) = self.entries.get(pattern) {
            return Ok(Arc::clone(entry.value()));
        }

        trace!(pattern, "matcher cache miss");
        let regex = Arc::new(compile(pattern)?);

        Ok(Arc::clone(
            self.entries
                .entry(pattern.to_string())
                .or_insert(regex)
                .value(),
        ))
    }

    pub fn clear(&self) {
        debug!(entries = self.entries.len(), "clearing matcher cache");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turning caching off keeps existing entries but stops using them
    pub fn set_enabled(&self, enabled: bool) {
        debug!(enabled, "matcher cache toggled");
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidAddress(format!("{}: {}", pattern, e)))
}
