//! Engine configuration surface.
//!
//! Hosts hand the engine an [`EngineConfig`] (or JSON deserializing into
//! one) and push [`EngineConfigUpdate`]s at runtime. Updates are partial:
//! every field is optional and merged over the current value
//! field-by-field, never replacing unspecified nested fields. Out-of-range
//! input is never rejected — it is clamped at this boundary.

use crate::constants::{
    DEFAULT_ATTACK_POWER, DEFAULT_CRIT_CHANCE_PERCENT, DEFAULT_ENERGY_PER_TICK,
    DEFAULT_ENERGY_TICK_INTERVAL_SECONDS, DEFAULT_GLOBAL_COOLDOWN_SECONDS,
    DEFAULT_HIT_CHANCE_PERCENT, DEFAULT_MAX_ENERGY, DEFAULT_WEAPON_MAX, DEFAULT_WEAPON_MIN,
    MAX_ENERGY_LOWER_BOUND, MAX_ENERGY_UPPER_BOUND, MIN_ENERGY_TICK_INTERVAL_SECONDS,
};
use crate::procs::ProcConfigUpdate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Combat stat block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub attack_power: f64,
    pub weapon_min: f64,
    pub weapon_max: f64,
    /// Base crit chance in percent.
    pub crit_chance: f64,
    /// Base hit chance in percent.
    pub hit_chance: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            attack_power: DEFAULT_ATTACK_POWER,
            weapon_min: DEFAULT_WEAPON_MIN,
            weapon_max: DEFAULT_WEAPON_MAX,
            crit_chance: DEFAULT_CRIT_CHANCE_PERCENT,
            hit_chance: DEFAULT_HIT_CHANCE_PERCENT,
        }
    }
}

/// Energy regeneration block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    /// Seconds between regen ticks. Floored at a minimum to avoid
    /// division issues.
    pub tick_interval: f64,
    pub energy_per_tick: f64,
    /// Fractional bonus multiplying energy per tick (`1 + vigor_bonus`).
    pub vigor_bonus: f64,
    pub max_energy: f64,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_ENERGY_TICK_INTERVAL_SECONDS,
            energy_per_tick: DEFAULT_ENERGY_PER_TICK,
            vigor_bonus: 0.0,
            max_energy: DEFAULT_MAX_ENERGY,
        }
    }
}

/// Three independent talent toggles with fixed effects.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Talents {
    /// +hit chance on all attack rolls; finishers deal a flat bonus.
    pub precision: bool,
    /// White-damage hits may grant a bonus combo point.
    pub shadow_techniques: bool,
    /// Finishers gain bonus crit chance.
    pub lethality: bool,
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stats: StatsConfig,
    pub regen: RegenConfig,
    pub global_cooldown: f64,
    pub talents: Talents,
    /// Per-proc-id tuning applied on top of the declared defaults.
    pub procs: HashMap<String, ProcConfigUpdate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stats: StatsConfig::default(),
            regen: RegenConfig::default(),
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN_SECONDS,
            talents: Talents::default(),
            procs: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Merge a partial update over the current configuration, then clamp
    /// everything back into range.
    pub fn merge(&mut self, update: &EngineConfigUpdate) {
        if let Some(value) = update.stats.attack_power {
            self.stats.attack_power = value;
        }
        if let Some(value) = update.stats.weapon_min {
            self.stats.weapon_min = value;
        }
        if let Some(value) = update.stats.weapon_max {
            self.stats.weapon_max = value;
        }
        if let Some(value) = update.stats.crit_chance {
            self.stats.crit_chance = value;
        }
        if let Some(value) = update.stats.hit_chance {
            self.stats.hit_chance = value;
        }

        if let Some(value) = update.regen.tick_interval {
            self.regen.tick_interval = value;
        }
        if let Some(value) = update.regen.energy_per_tick {
            self.regen.energy_per_tick = value;
        }
        if let Some(value) = update.regen.vigor_bonus {
            self.regen.vigor_bonus = value;
        }
        if let Some(value) = update.regen.max_energy {
            self.regen.max_energy = value;
        }

        if let Some(value) = update.global_cooldown {
            self.global_cooldown = value;
        }

        if let Some(value) = update.talents.precision {
            self.talents.precision = value;
        }
        if let Some(value) = update.talents.shadow_techniques {
            self.talents.shadow_techniques = value;
        }
        if let Some(value) = update.talents.lethality {
            self.talents.lethality = value;
        }

        for (id, proc_update) in &update.procs {
            let entry = self.procs.entry(id.clone()).or_default();
            if proc_update.enabled.is_some() {
                entry.enabled = proc_update.enabled;
            }
            entry
                .values
                .extend(proc_update.values.iter().map(|(k, v)| (k.clone(), *v)));
        }

        self.sanitize();
    }

    /// Clamp every field into its valid range. Invalid input is silently
    /// coerced, never rejected.
    pub fn sanitize(&mut self) {
        self.stats.attack_power = self.stats.attack_power.max(0.0);
        self.stats.weapon_min = self.stats.weapon_min.max(0.0);
        self.stats.weapon_max = self.stats.weapon_max.max(self.stats.weapon_min);
        self.stats.crit_chance = self.stats.crit_chance.clamp(0.0, 100.0);
        self.stats.hit_chance = self.stats.hit_chance.clamp(0.0, 100.0);

        self.regen.tick_interval = self
            .regen
            .tick_interval
            .max(MIN_ENERGY_TICK_INTERVAL_SECONDS);
        self.regen.energy_per_tick = self.regen.energy_per_tick.max(0.0);
        self.regen.vigor_bonus = self.regen.vigor_bonus.max(0.0);
        self.regen.max_energy = self
            .regen
            .max_energy
            .clamp(MAX_ENERGY_LOWER_BOUND, MAX_ENERGY_UPPER_BOUND);

        self.global_cooldown = self.global_cooldown.max(0.0);
    }
}

/// Partial update for [`StatsConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfigUpdate {
    pub attack_power: Option<f64>,
    pub weapon_min: Option<f64>,
    pub weapon_max: Option<f64>,
    pub crit_chance: Option<f64>,
    pub hit_chance: Option<f64>,
}

/// Partial update for [`RegenConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfigUpdate {
    pub tick_interval: Option<f64>,
    pub energy_per_tick: Option<f64>,
    pub vigor_bonus: Option<f64>,
    pub max_energy: Option<f64>,
}

/// Partial update for [`Talents`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TalentsUpdate {
    pub precision: Option<bool>,
    pub shadow_techniques: Option<bool>,
    pub lethality: Option<bool>,
}

/// Partial update for the whole configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfigUpdate {
    pub stats: StatsConfigUpdate,
    pub regen: RegenConfigUpdate,
    pub global_cooldown: Option<f64>,
    pub talents: TalentsUpdate,
    pub procs: HashMap<String, ProcConfigUpdate>,
}
