//! Chance-based secondary effects ("procs").
//!
//! Proc definitions form a static table: each names its gating condition
//! over the triggering damage event, how its chance is computed, and what
//! it does when it fires. Mutable tuning lives in one [`ProcConfig`] per
//! definition, defaulted from the declared fields and clamped to their
//! [min, max] bounds on every write — clamp-on-write is the only input
//! sanitization for proc tuning.

use crate::abilities::AbilityId;
use crate::effects::{EffectId, EffectSpec};
use crate::modifiers::ModifierChannel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Effect ids installed by proc fires
pub const BATTLE_TRANCE_EFFECT: EffectId = "battle_trance";
pub const FLOW_OF_BATTLE_EFFECT: EffectId = "flow_of_battle";

/// Context of the damage event being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct ProcContext {
    pub ability: Option<AbilityId>,
    /// Auto-attack (white) damage rather than ability (yellow) damage.
    pub white: bool,
    /// Damage-over-time tick.
    pub periodic: bool,
    pub crit: bool,
    /// Combo points consumed by the triggering cast; > 0 marks a finisher.
    pub combo_points_spent: u32,
    /// Final applied damage after rounding.
    pub amount: u64,
}

/// A numeric tuning field with its default and clamping bounds.
#[derive(Debug, Clone, Copy)]
pub struct ProcField {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

/// What a proc does when it fires. Applied by the engine.
#[derive(Debug, Clone)]
pub struct ProcFire {
    pub proc: &'static str,
    pub energy: f64,
    pub combo_points: u32,
    pub buff: Option<EffectSpec>,
    pub message: String,
    /// Short transient text for on-screen feedback.
    pub flash: String,
}

/// Immutable proc definition.
pub struct ProcDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub enabled_by_default: bool,
    /// Gate over the triggering context.
    pub condition: fn(&ProcContext) -> bool,
    /// Chance in percent, computed from config and context.
    pub chance: fn(&ProcConfig, &ProcContext) -> f64,
    pub fire: fn(&ProcConfig) -> ProcFire,
    pub fields: &'static [ProcField],
}

/// Mutable per-definition tuning: enabled flag plus the declared numeric
/// fields.
#[derive(Debug, Clone)]
pub struct ProcConfig {
    pub enabled: bool,
    values: HashMap<String, f64>,
}

impl ProcConfig {
    fn from_definition(def: &ProcDefinition) -> Self {
        let values = def
            .fields
            .iter()
            .map(|field| (field.name.to_string(), field.default))
            .collect();
        Self {
            enabled: def.enabled_by_default,
            values,
        }
    }

    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }
}

/// Partial tuning update. Unspecified fields keep their current values;
/// undeclared fields are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcConfigUpdate {
    pub enabled: Option<bool>,
    pub values: HashMap<String, f64>,
}

fn is_finisher(ctx: &ProcContext) -> bool {
    !ctx.white && !ctx.periodic && ctx.combo_points_spent > 0
}

fn is_white_hit(ctx: &ProcContext) -> bool {
    ctx.white && !ctx.periodic
}

fn is_yellow_crit(ctx: &ProcContext) -> bool {
    !ctx.white && !ctx.periodic && ctx.crit
}

fn is_white_crit(ctx: &ProcContext) -> bool {
    ctx.white && !ctx.periodic && ctx.crit
}

fn flat_chance(config: &ProcConfig, _ctx: &ProcContext) -> f64 {
    config.value("chance")
}

fn per_combo_point_chance(config: &ProcConfig, ctx: &ProcContext) -> f64 {
    config.value("chance_per_combo_point") * ctx.combo_points_spent as f64
}

fn fire_relentless_strikes(config: &ProcConfig) -> ProcFire {
    let energy = config.value("energy_restored");
    ProcFire {
        proc: "relentless_strikes",
        energy,
        combo_points: 0,
        buff: None,
        message: format!("Relentless Strikes restores {:.0} energy", energy),
        flash: "Relentless Strikes!".to_string(),
    }
}

fn fire_ruthlessness(config: &ProcConfig) -> ProcFire {
    let points = config.value("combo_points_granted").max(0.0) as u32;
    ProcFire {
        proc: "ruthlessness",
        energy: 0.0,
        combo_points: points,
        buff: None,
        message: format!("Ruthlessness grants {} combo point", points),
        flash: "Ruthlessness!".to_string(),
    }
}

fn fire_combat_potency(config: &ProcConfig) -> ProcFire {
    let energy = config.value("energy_restored");
    ProcFire {
        proc: "combat_potency",
        energy,
        combo_points: 0,
        buff: None,
        message: format!("Combat Potency restores {:.0} energy", energy),
        flash: "Combat Potency!".to_string(),
    }
}

fn fire_battle_trance(config: &ProcConfig) -> ProcFire {
    let buff = EffectSpec {
        modifiers: vec![
            (ModifierChannel::Damage, config.value("damage_bonus")),
            (ModifierChannel::CritChance, config.value("crit_bonus")),
        ],
        ..EffectSpec::new(
            BATTLE_TRANCE_EFFECT,
            "Battle Trance",
            config.value("duration"),
        )
    };
    ProcFire {
        proc: "battle_trance",
        energy: 0.0,
        combo_points: 0,
        buff: Some(buff),
        message: "Battle Trance sharpens the assault".to_string(),
        flash: "Battle Trance!".to_string(),
    }
}

fn fire_flow_of_battle(config: &ProcConfig) -> ProcFire {
    let buff = EffectSpec {
        modifiers: vec![(
            ModifierChannel::CooldownRate,
            config.value("cooldown_rate_bonus"),
        )],
        ..EffectSpec::new(
            FLOW_OF_BATTLE_EFFECT,
            "Flow of Battle",
            config.value("duration"),
        )
    };
    ProcFire {
        proc: "flow_of_battle",
        energy: 0.0,
        combo_points: 0,
        buff: Some(buff),
        message: "Flow of Battle hastens cooldown recovery".to_string(),
        flash: "Flow of Battle!".to_string(),
    }
}

static PROC_TABLE: [ProcDefinition; 5] = [
    ProcDefinition {
        id: "relentless_strikes",
        name: "Relentless Strikes",
        enabled_by_default: true,
        condition: is_finisher,
        chance: per_combo_point_chance,
        fire: fire_relentless_strikes,
        fields: &[
            ProcField {
                name: "chance_per_combo_point",
                default: 20.0,
                min: 0.0,
                max: 100.0,
            },
            ProcField {
                name: "energy_restored",
                default: 25.0,
                min: 0.0,
                max: 100.0,
            },
        ],
    },
    ProcDefinition {
        id: "ruthlessness",
        name: "Ruthlessness",
        enabled_by_default: true,
        condition: is_finisher,
        chance: flat_chance,
        fire: fire_ruthlessness,
        fields: &[
            ProcField {
                name: "chance",
                default: 20.0,
                min: 0.0,
                max: 100.0,
            },
            ProcField {
                name: "combo_points_granted",
                default: 1.0,
                min: 0.0,
                max: 5.0,
            },
        ],
    },
    ProcDefinition {
        id: "combat_potency",
        name: "Combat Potency",
        enabled_by_default: true,
        condition: is_white_hit,
        chance: flat_chance,
        fire: fire_combat_potency,
        fields: &[
            ProcField {
                name: "chance",
                default: 20.0,
                min: 0.0,
                max: 100.0,
            },
            ProcField {
                name: "energy_restored",
                default: 15.0,
                min: 0.0,
                max: 100.0,
            },
        ],
    },
    ProcDefinition {
        id: "battle_trance",
        name: "Battle Trance",
        enabled_by_default: true,
        condition: is_yellow_crit,
        chance: flat_chance,
        fire: fire_battle_trance,
        fields: &[
            ProcField {
                name: "chance",
                default: 15.0,
                min: 0.0,
                max: 100.0,
            },
            ProcField {
                name: "damage_bonus",
                default: 0.10,
                min: 0.0,
                max: 1.0,
            },
            ProcField {
                name: "crit_bonus",
                default: 10.0,
                min: 0.0,
                max: 30.0,
            },
            ProcField {
                name: "duration",
                default: 10.0,
                min: 1.0,
                max: 60.0,
            },
        ],
    },
    ProcDefinition {
        id: "flow_of_battle",
        name: "Flow of Battle",
        enabled_by_default: true,
        condition: is_white_crit,
        chance: flat_chance,
        fire: fire_flow_of_battle,
        fields: &[
            ProcField {
                name: "chance",
                default: 20.0,
                min: 0.0,
                max: 100.0,
            },
            ProcField {
                name: "cooldown_rate_bonus",
                default: 0.5,
                min: 0.0,
                max: 2.0,
            },
            ProcField {
                name: "duration",
                default: 6.0,
                min: 1.0,
                max: 30.0,
            },
        ],
    },
];

/// The static proc definition table.
pub fn definitions() -> &'static [ProcDefinition] {
    &PROC_TABLE
}

/// Evaluates the proc table against damage events and holds per-proc
/// tuning.
#[derive(Debug, Clone)]
pub struct ProcEngine {
    configs: HashMap<&'static str, ProcConfig>,
}

impl Default for ProcEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcEngine {
    pub fn new() -> Self {
        let configs = PROC_TABLE
            .iter()
            .map(|def| (def.id, ProcConfig::from_definition(def)))
            .collect();
        Self { configs }
    }

    /// Merge a partial tuning update over the current config for `id`.
    /// Numeric fields are clamped to their declared bounds; fields the
    /// definition does not declare are dropped. Returns false for an
    /// unknown proc id.
    pub fn update_config(&mut self, id: &str, update: &ProcConfigUpdate) -> bool {
        let Some(def) = PROC_TABLE.iter().find(|def| def.id == id) else {
            return false;
        };
        let config = self
            .configs
            .get_mut(def.id)
            .expect("every definition has a config");

        if let Some(enabled) = update.enabled {
            config.enabled = enabled;
        }
        for (name, value) in &update.values {
            if let Some(field) = def.fields.iter().find(|field| field.name == name) {
                config
                    .values
                    .insert(field.name.to_string(), value.clamp(field.min, field.max));
            }
        }
        true
    }

    pub fn config(&self, id: &str) -> Option<&ProcConfig> {
        self.configs.get(id)
    }

    /// Evaluate every enabled definition against one damage event. Each
    /// definition rolls independently, so several procs may fire from a
    /// single event.
    pub fn handle_damage(&self, ctx: &ProcContext, rng: &mut impl Rng) -> Vec<ProcFire> {
        let mut fires = Vec::new();
        for def in &PROC_TABLE {
            let config = &self.configs[def.id];
            if !config.enabled {
                continue;
            }
            if !(def.condition)(ctx) {
                continue;
            }
            let chance = (def.chance)(config, ctx).clamp(0.0, 100.0);
            if rng.gen::<f64>() * 100.0 < chance {
                fires.push((def.fire)(config));
            }
        }
        fires
    }
}
