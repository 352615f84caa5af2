use crate::core::{QueryError, Result};
use lazy_static::lazy_static;
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref REGEX_LRU_CACHE: Arc<Mutex<LruCache<String, Arc<Regex>>>> =
        Arc::new(Mutex::new(LruCache::new(NonZeroUsize::new(200).unwrap())));
}

/// Compile a user-supplied pattern, reusing a cached compilation when the
/// same pattern was seen recently. The regex engine is linear-time in the
/// haystack, so adversarial patterns cost compile-time rejection at worst.
pub fn get_or_compile(pattern: &str) -> Result<Arc<Regex>> {
    {
        let mut cache = REGEX_LRU_CACHE.lock().unwrap();
        if let Some(regex) = cache.get(pattern) {
            return Ok(Arc::clone(regex));
        }
    }

    let compiled = Regex::new(pattern).map_err(|e| QueryError::InvalidRegex(e.to_string()))?;
    let compiled = Arc::new(compiled);

    {
        let mut cache = REGEX_LRU_CACHE.lock().unwrap();
        cache.put(pattern.to_string(), Arc::clone(&compiled));
    }

    Ok(compiled)
}

/// Case-insensitive substring containment.
///
/// Plain lowercase-and-contains: `str::contains` runs the two-way search
/// algorithm, so matching stays linear on adversarial text.
#[inline]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
