//! Conversion cache.
//!
//! Memoizes document conversions keyed by a fingerprint of everything that affects the output:
//! the decoded document, the personalization and the configuration. Entries are evicted least
//! recently used first once the total weight exceeds the budget, and stop being served after
//! their time-to-live. Each entry keeps the serialized inputs it was computed from, and a hit
//! only counts when they match exactly, so a fingerprint collision is a miss. A miss always
//! recomputes, so the cache never changes results.

use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{CacheConfig, ConversionConfig};
use crate::converters::document::{convert_document, DocumentConversion};
use crate::errors::Result;
use crate::models::document::{IdmlDocument, Personalization};

/// Serializes everything that affects a conversion into one canonical byte string. Condition
/// labels and values are sorted first since the personalization stores them unordered.
fn canonical_inputs(
    document: &IdmlDocument,
    personalization: &Personalization,
    config: &ConversionConfig,
) -> Result<Vec<u8>> {
    let mut conditions: Vec<&String> = personalization.active_conditions.iter().collect();
    conditions.sort();
    let mut values: Vec<(&String, &String)> = personalization.values.iter().collect();
    values.sort();

    Ok(serde_json::to_vec(&(document, conditions, values, config))?)
}

/// Content fingerprint of a conversion's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprints the canonical serialization of the inputs.
    pub fn of(
        document: &IdmlDocument,
        personalization: &Personalization,
        config: &ConversionConfig,
    ) -> Result<Self> {
        let inputs = canonical_inputs(document, personalization, config)?;
        Ok(Self::of_inputs(&inputs))
    }

    fn of_inputs(inputs: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        inputs.hash(&mut hasher);
        Fingerprint(hasher.finish())
    }
}

/// Entry in the conversion cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Canonical inputs the conversion was computed from.
    inputs: Vec<u8>,
    conversion: Arc<DocumentConversion>,
    weight: usize,
    inserted_at: Instant,
}

/// Conversion cache with LRU eviction by weight and a time-to-live.
pub struct ConversionCache {
    entries: HashMap<Fingerprint, CacheEntry>,
    /// Total weight of cached entries.
    total_weight: usize,
    max_weight: usize,
    ttl: Duration,
    /// Access order for LRU (most recent last).
    access_order: Vec<Fingerprint>,
}

impl ConversionCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            total_weight: 0,
            max_weight: config.max_weight,
            ttl: Duration::from_secs(config.ttl_seconds),
            access_order: Vec::new(),
        }
    }

    /// Returns the cached conversion for these inputs, converting and caching on a miss.
    pub fn get_or_convert(
        &mut self,
        document: &IdmlDocument,
        personalization: &Personalization,
        config: &ConversionConfig,
    ) -> Result<Arc<DocumentConversion>> {
        let inputs = canonical_inputs(document, personalization, config)?;
        let key = Fingerprint::of_inputs(&inputs);
        let now = Instant::now();

        if let Some(conversion) = self.get_at(&key, &inputs, now) {
            debug!("[ConversionCache] Hit for {:?}", key);
            return Ok(conversion);
        }

        debug!("[ConversionCache] Miss for {:?}", key);
        let conversion = Arc::new(convert_document(document, personalization, config));
        self.insert_at(key, inputs, Arc::clone(&conversion), now);
        Ok(conversion)
    }

    /// Looks up an entry computed from exactly `inputs`, dropping it if it expired by `now`.
    fn get_at(
        &mut self,
        key: &Fingerprint,
        inputs: &[u8],
        now: Instant,
    ) -> Option<Arc<DocumentConversion>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inputs != inputs => {
                debug!("[ConversionCache] Fingerprint collision on {:?}", key);
                return None;
            }
            Some(entry) => now.duration_since(entry.inserted_at) >= self.ttl,
            None => return None,
        };
        if expired {
            debug!("[ConversionCache] Expired {:?}", key);
            self.remove(key);
            return None;
        }
        self.touch(*key);
        self.entries.get(key).map(|entry| Arc::clone(&entry.conversion))
    }

    /// Inserts an entry, evicting least recently used entries until it fits.
    /// Entries heavier than the whole budget are not cached.
    fn insert_at(
        &mut self,
        key: Fingerprint,
        inputs: Vec<u8>,
        conversion: Arc<DocumentConversion>,
        now: Instant,
    ) {
        let weight = conversion.weight() + inputs.len();
        if weight > self.max_weight {
            debug!(
                "[ConversionCache] Not caching {:?}: weight {} exceeds budget {}",
                key, weight, self.max_weight
            );
            return;
        }

        self.remove(&key);
        while self.total_weight + weight > self.max_weight && !self.entries.is_empty() {
            self.evict_lru();
        }

        self.access_order.push(key);
        self.total_weight += weight;
        self.entries.insert(
            key,
            CacheEntry {
                inputs,
                conversion,
                weight,
                inserted_at: now,
            },
        );
    }

    /// Removes an entry.
    pub fn remove(&mut self, key: &Fingerprint) -> bool {
        if let Some(entry) = self.entries.remove(key) {
            self.total_weight -= entry.weight;
            self.access_order.retain(|id| id != key);
            true
        } else {
            false
        }
    }

    /// Evict the least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.first().copied() {
            debug!("[ConversionCache] Evicting {:?}", key);
            self.remove(&key);
        }
    }

    /// Mark an entry as recently accessed.
    fn touch(&mut self, key: Fingerprint) {
        self.access_order.retain(|id| *id != key);
        self.access_order.push(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total weight of cached entries.
    pub fn total_weight(&self) -> usize {
        self.total_weight
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
        self.total_weight = 0;
    }
}
