//! Cumulative combat statistics and session records.

use crate::abilities::AbilityId;
use crate::constants::{DPS_SAMPLE_CAP, DPS_SAMPLE_INTERVAL_SECONDS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Usage tally for one damage source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AbilityUsage {
    pub count: u64,
    pub damage: u64,
}

/// One entry of the bounded DPS time series. `dps` is windowed: damage
/// dealt since the previous sample divided by the elapsed window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DpsSample {
    pub combat_time: f64,
    pub dps: f64,
}

/// Cumulative statistics for the current combat session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatStatistics {
    pub total_damage: u64,
    pub hit_count: u64,
    pub crit_count: u64,
    pub miss_count: u64,
    pub combat_time: f64,
    pub ability_usage: HashMap<AbilityId, AbilityUsage>,
    pub auto_attack: AbilityUsage,
    pub dps_samples: VecDeque<DpsSample>,
    last_sample_time: f64,
    last_sample_damage: u64,
}

impl CombatStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a landed hit. White damage tallies under `auto_attack`,
    /// ability damage under its ability, periodic damage under neither
    /// (it still counts toward the totals).
    pub fn record_hit(&mut self, ability: Option<AbilityId>, white: bool, amount: u64, crit: bool) {
        self.total_damage += amount;
        self.hit_count += 1;
        if crit {
            self.crit_count += 1;
        }
        if white {
            self.auto_attack.count += 1;
            self.auto_attack.damage += amount;
        } else if let Some(id) = ability {
            let usage = self.ability_usage.entry(id).or_default();
            usage.count += 1;
            usage.damage += amount;
        }
    }

    pub fn record_miss(&mut self) {
        self.miss_count += 1;
    }

    /// Cumulative damage per second over the whole session.
    pub fn dps(&self) -> f64 {
        if self.combat_time > 0.0 {
            self.total_damage as f64 / self.combat_time
        } else {
            0.0
        }
    }

    /// The most recent windowed DPS sample, if any.
    pub fn current_dps(&self) -> f64 {
        self.dps_samples.back().map_or(0.0, |sample| sample.dps)
    }

    /// Append a windowed DPS sample once per sample interval. The series
    /// is capped; the oldest sample is evicted past the window.
    pub fn maybe_sample(&mut self) {
        let elapsed = self.combat_time - self.last_sample_time;
        if elapsed < DPS_SAMPLE_INTERVAL_SECONDS {
            return;
        }
        let windowed = (self.total_damage - self.last_sample_damage) as f64 / elapsed;
        self.dps_samples.push_back(DpsSample {
            combat_time: self.combat_time,
            dps: windowed,
        });
        while self.dps_samples.len() > DPS_SAMPLE_CAP {
            self.dps_samples.pop_front();
        }
        self.last_sample_time = self.combat_time;
        self.last_sample_damage = self.total_damage;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot of one finished combat session, captured at the stop
/// boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionRecord {
    pub total_damage: u64,
    pub duration: f64,
    pub dps: f64,
    /// Unix timestamp of the combat stop.
    pub ended_at: i64,
}

/// Prior/current session comparison surfaced through the snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionComparison {
    pub previous: Option<SessionRecord>,
    pub current: Option<SessionRecord>,
    /// Current DPS minus previous DPS, when both exist.
    pub dps_delta: Option<f64>,
}

impl SessionComparison {
    pub fn new(previous: Option<SessionRecord>, current: Option<SessionRecord>) -> Self {
        let dps_delta = match (&previous, &current) {
            (Some(prev), Some(cur)) => Some(cur.dps - prev.dps),
            _ => None,
        };
        Self {
            previous,
            current,
            dps_delta,
        }
    }
}
