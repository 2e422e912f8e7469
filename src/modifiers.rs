//! Named-bucket additive modifier stacking.
//!
//! Buffs, debuffs, and procs install numeric contributions into one of
//! five channels under their own source key. A channel's value is the sum
//! of its sources; a source is removed by key rather than by decrementing,
//! which makes double-removal harmless.

use crate::constants::MIN_AUTO_SPEED_MULTIPLIER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five stacking channels.
///
/// `CritChance` sums to a flat percentage bonus; the other four sum to a
/// fraction that becomes a `1 + sum` multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierChannel {
    AutoSpeed,
    EnergyRegen,
    Damage,
    CritChance,
    CooldownRate,
}

/// Additive modifier store keyed by channel and source.
#[derive(Debug, Clone, Default)]
pub struct ModifierRegistry {
    channels: HashMap<ModifierChannel, HashMap<String, f64>>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or overwrite) a source's contribution to a channel.
    pub fn set(&mut self, channel: ModifierChannel, source: &str, value: f64) {
        self.channels
            .entry(channel)
            .or_default()
            .insert(source.to_string(), value);
    }

    /// Remove a source's contribution by key. Removing a source that is
    /// not present is a no-op.
    pub fn remove(&mut self, channel: ModifierChannel, source: &str) {
        if let Some(sources) = self.channels.get_mut(&channel) {
            sources.remove(source);
            if sources.is_empty() {
                self.channels.remove(&channel);
            }
        }
    }

    /// Sum of all source contributions to a channel.
    pub fn sum(&self, channel: ModifierChannel) -> f64 {
        self.channels
            .get(&channel)
            .map(|sources| sources.values().sum())
            .unwrap_or(0.0)
    }

    /// `1 + sum`, floored at zero. Used for the Damage, EnergyRegen, and
    /// CooldownRate channels.
    pub fn multiplier(&self, channel: ModifierChannel) -> f64 {
        (1.0 + self.sum(channel)).max(0.0)
    }

    /// Auto-attack speed multiplier. Floored above zero so the attack
    /// interval can never divide by zero or go negative.
    pub fn auto_speed_multiplier(&self) -> f64 {
        (1.0 + self.sum(ModifierChannel::AutoSpeed)).max(MIN_AUTO_SPEED_MULTIPLIER)
    }

    /// Flat crit chance bonus in percentage points.
    pub fn crit_chance_bonus(&self) -> f64 {
        self.sum(ModifierChannel::CritChance)
    }

    /// Number of sources currently installed in a channel.
    pub fn source_count(&self, channel: ModifierChannel) -> usize {
        self.channels.get(&channel).map_or(0, HashMap::len)
    }

    /// True when no channel holds any source.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drop every source in every channel outright. Backstop against
    /// modifier leakage across combat sessions.
    pub fn clear_all(&mut self) {
        self.channels.clear();
    }
}
