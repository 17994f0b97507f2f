//! Process-wide lookup-or-compile caches shared by rules.
//!
//! Readers proceed concurrently; a single writer populates on miss.
//! Clearing a cache forces re-compilation on next use.

use ahash::RandomState;
use chrono_tz::Tz;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static REGEX_CACHE: Lazy<DashMap<String, Arc<Regex>, RandomState>> =
    Lazy::new(|| DashMap::with_hasher(RandomState::new()));

static TIMEZONE_CACHE: Lazy<DashMap<String, Tz, RandomState>> =
    Lazy::new(|| DashMap::with_hasher(RandomState::new()));

/// Fetch a compiled regex, compiling and caching on first use.
pub fn regex(pattern: &str) -> Result<Arc<Regex>, regex::Error> {
    if let Some(compiled) = REGEX_CACHE.get(pattern) {
        return Ok(Arc::clone(&compiled));
    }
    let compiled = Arc::new(Regex::new(pattern)?);
    REGEX_CACHE.insert(pattern.to_string(), Arc::clone(&compiled));
    Ok(compiled)
}

/// Dispose all compiled regexes.
pub fn clear_regex_cache() {
    REGEX_CACHE.clear();
}

/// Resolve a timezone name, caching the parsed zone.
pub fn timezone(name: &str) -> Option<Tz> {
    if let Some(tz) = TIMEZONE_CACHE.get(name) {
        return Some(*tz);
    }
    let tz: Tz = name.parse().ok()?;
    TIMEZONE_CACHE.insert(name.to_string(), tz);
    Some(tz)
}

/// Dispose all resolved timezones.
pub fn clear_timezone_cache() {
    TIMEZONE_CACHE.clear();
}
