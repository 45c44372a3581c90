use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};

/// Sum tolerance for the "green" band, as a fraction of the scale.
/// Percent-form vectors are green in [95, 105].
const GREEN_TOLERANCE: f64 = 0.05;

/// Whether a vector's total is within the acceptable band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightBand {
    Green,
    Red,
}

/// A weighting over a finite set of keys with per-key lock bits.
///
/// The same structure serves percent-form vectors (attribute and member
/// weights, scale 100) and fraction-form vectors (field weights, scale 1).
/// Locking a key exempts it from every redistribution; it never renormalizes
/// by itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    entries: BTreeMap<String, f64>,
    locked: BTreeSet<String>,
    scale: f64,
}

impl WeightVector {
    /// Percent-form vector: weights in [0, 100], nominal sum 100.
    pub fn percent() -> Self {
        Self::with_scale(100.0)
    }

    /// Fraction-form vector: weights in [0, 1], nominal sum 1.
    pub fn fraction() -> Self {
        Self::with_scale(1.0)
    }

    fn with_scale(scale: f64) -> Self {
        Self {
            entries: BTreeMap::new(),
            locked: BTreeSet::new(),
            scale,
        }
    }

    /// Percent-form vector over the given keys, equally split.
    pub fn percent_equal<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vector = Self::percent();
        for key in keys {
            vector.entries.insert(key.into(), 0.0);
        }
        vector.set_equal();
        vector
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.locked.contains(key)
    }

    /// Add a key at weight zero. Existing weights are untouched; call
    /// `set_equal` or `update` afterwards if the caller wants a rebalance.
    pub fn insert_key(&mut self, key: impl Into<String>) {
        self.entries.entry(key.into()).or_insert(0.0);
    }

    /// Remove a key and its lock bit. Returns the weight it held.
    pub fn remove_key(&mut self, key: &str) -> Option<f64> {
        self.locked.remove(key);
        self.entries.remove(key)
    }

    /// Force a specific weight without redistribution. Used when restoring
    /// persisted vectors; interactive edits go through `update`.
    pub fn set_raw(&mut self, key: impl Into<String>, weight: f64) {
        self.entries.insert(key.into(), weight);
    }

    pub fn lock(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Err(ModelError::UnknownKey(key.to_string()));
        }
        self.locked.insert(key.to_string());
        Ok(())
    }

    pub fn unlock(&mut self, key: &str) {
        self.locked.remove(key);
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Band check against the nominal sum: within ±5% of scale is green.
    pub fn band(&self) -> WeightBand {
        if (self.total() - self.scale).abs() <= self.scale * GREEN_TOLERANCE {
            WeightBand::Green
        } else {
            WeightBand::Red
        }
    }

    /// Equal split of the unlocked budget. Locked weights are preserved;
    /// when they already exceed the scale the unlocked share clamps to zero
    /// and the caller surfaces the over-constraint through `band`.
    /// The last unlocked key absorbs rounding drift so the total lands on
    /// the scale exactly when representable.
    pub fn set_equal(&mut self) {
        let locked_sum: f64 = self
            .entries
            .iter()
            .filter(|(key, _)| self.locked.contains(*key))
            .map(|(_, weight)| *weight)
            .sum();
        let remaining = (self.scale - locked_sum).max(0.0);
        let unlocked: Vec<String> = self
            .entries
            .keys()
            .filter(|key| !self.locked.contains(*key))
            .cloned()
            .collect();
        if unlocked.is_empty() {
            return;
        }
        let share = remaining / unlocked.len() as f64;
        let mut assigned = 0.0;
        let last = unlocked.len() - 1;
        for (index, key) in unlocked.iter().enumerate() {
            let weight = if index == last {
                remaining - assigned
            } else {
                assigned += share;
                share
            };
            self.entries.insert(key.clone(), weight);
        }
    }

    /// Set `key` to `value` (clamped to [0, scale]) and redistribute the
    /// difference uniformly across the other unlocked keys. Keys that clamp
    /// at a bound drop out and the residue propagates to the rest, so the
    /// total is preserved whenever at least one other unlocked key exists.
    pub fn update(&mut self, key: &str, value: f64) -> Result<()> {
        if self.locked.contains(key) {
            return Err(ModelError::LockedKey(key.to_string()));
        }
        let old = self
            .entries
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::UnknownKey(key.to_string()))?;
        let value = value.clamp(0.0, self.scale);
        let delta = value - old;
        self.entries.insert(key.to_string(), value);

        let mut open: Vec<String> = self
            .entries
            .keys()
            .filter(|other| other.as_str() != key && !self.locked.contains(*other))
            .cloned()
            .collect();
        let mut pending = -delta;
        let epsilon = self.scale * 1e-12;
        while pending.abs() > epsilon && !open.is_empty() {
            let share = pending / open.len() as f64;
            let mut still_open = Vec::with_capacity(open.len());
            for other in open {
                let current = self.entries[&other];
                let next = (current + share).clamp(0.0, self.scale);
                pending -= next - current;
                if next > 0.0 && next < self.scale {
                    still_open.push(other.clone());
                }
                self.entries.insert(other, next);
            }
            open = still_open;
        }
        debug!(key, value, delta, "weight updated with redistribution");
        Ok(())
    }
}
