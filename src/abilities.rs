//! Static ability catalog.
//!
//! Abilities are defined once at startup as immutable data: cost,
//! combo-point economics, cooldown, and whether they occupy the shared
//! global cooldown. The unique combat logic of each ability lives in the
//! engine's handler dispatch; this module owns the numbers and the
//! effect specs the handlers install.

use crate::effects::{EffectId, EffectSpec, TickAction};
use crate::modifiers::ModifierChannel;
use serde::{Deserialize, Serialize};

// Ability tuning
const SINISTER_STRIKE_FLAT_BONUS: f64 = 68.0;
const SINISTER_STRIKE_AP_COEFF: f64 = 0.10;
const EVISCERATE_BASE_PER_COMBO_POINT: f64 = 160.0;
const EVISCERATE_AP_COEFF_PER_COMBO_POINT: f64 = 0.07;
const EVISCERATE_CRIT_BONUS_PERCENT: f64 = 5.0;
const SLICE_AND_DICE_HASTE: f64 = 0.30;
const SLICE_AND_DICE_BASE_SECONDS: f64 = 6.0;
const SLICE_AND_DICE_SECONDS_PER_COMBO_POINT: f64 = 3.0;
const RUPTURE_BASE_SECONDS: f64 = 6.0;
const RUPTURE_SECONDS_PER_COMBO_POINT: f64 = 2.0;
const RUPTURE_TICK_INTERVAL_SECONDS: f64 = 2.0;
const RUPTURE_TICK_BASE: f64 = 40.0;
const RUPTURE_TICK_PER_COMBO_POINT: f64 = 12.0;
const RUPTURE_TICK_AP_COEFF_PER_COMBO_POINT: f64 = 0.01;
const EXPOSE_ARMOR_REDUCTION_PER_COMBO_POINT: f64 = 0.04;
const EXPOSE_ARMOR_SECONDS: f64 = 30.0;
const ADRENALINE_RUSH_REGEN_BONUS: f64 = 1.0;
const ADRENALINE_RUSH_SECONDS: f64 = 15.0;
const ADRENALINE_RUSH_COOLDOWN_SECONDS: f64 = 120.0;

// Effect ids installed by ability handlers
pub const SLICE_AND_DICE_EFFECT: EffectId = "slice_and_dice";
pub const RUPTURE_EFFECT: EffectId = "rupture";
pub const EXPOSE_ARMOR_EFFECT: EffectId = "expose_armor";
pub const ADRENALINE_RUSH_EFFECT: EffectId = "adrenaline_rush";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    SinisterStrike,
    Eviscerate,
    SliceAndDice,
    Rupture,
    ExposeArmor,
    AdrenalineRush,
}

impl AbilityId {
    pub const ALL: [AbilityId; 6] = [
        AbilityId::SinisterStrike,
        AbilityId::Eviscerate,
        AbilityId::SliceAndDice,
        AbilityId::Rupture,
        AbilityId::ExposeArmor,
        AbilityId::AdrenalineRush,
    ];

    pub fn name(self) -> &'static str {
        ability(self).name
    }
}

/// Immutable ability definition.
#[derive(Debug, Clone, Copy)]
pub struct Ability {
    pub id: AbilityId,
    pub name: &'static str,
    pub energy_cost: f64,
    /// Combo points granted on a successful hit. 0 for finishers.
    pub combo_points_generated: u32,
    /// Own cooldown in seconds. 0 = none.
    pub cooldown: f64,
    /// Whether using this ability triggers (and is blocked by) the shared
    /// global cooldown.
    pub on_global_cooldown: bool,
    /// Flat crit chance bonus for this ability's own attack rolls.
    pub crit_bonus_percent: f64,
    /// Finishers consume all combo points and fail outright at zero.
    pub finisher: bool,
}

pub const ABILITIES: [Ability; 6] = [
    Ability {
        id: AbilityId::SinisterStrike,
        name: "Sinister Strike",
        energy_cost: 40.0,
        combo_points_generated: 1,
        cooldown: 0.0,
        on_global_cooldown: true,
        crit_bonus_percent: 0.0,
        finisher: false,
    },
    Ability {
        id: AbilityId::Eviscerate,
        name: "Eviscerate",
        energy_cost: 35.0,
        combo_points_generated: 0,
        cooldown: 0.0,
        on_global_cooldown: true,
        crit_bonus_percent: EVISCERATE_CRIT_BONUS_PERCENT,
        finisher: true,
    },
    Ability {
        id: AbilityId::SliceAndDice,
        name: "Slice and Dice",
        energy_cost: 25.0,
        combo_points_generated: 0,
        cooldown: 0.0,
        on_global_cooldown: true,
        crit_bonus_percent: 0.0,
        finisher: true,
    },
    Ability {
        id: AbilityId::Rupture,
        name: "Rupture",
        energy_cost: 25.0,
        combo_points_generated: 0,
        cooldown: 0.0,
        on_global_cooldown: true,
        crit_bonus_percent: 0.0,
        finisher: true,
    },
    Ability {
        id: AbilityId::ExposeArmor,
        name: "Expose Armor",
        energy_cost: 25.0,
        combo_points_generated: 0,
        cooldown: 0.0,
        on_global_cooldown: true,
        crit_bonus_percent: 0.0,
        finisher: true,
    },
    Ability {
        id: AbilityId::AdrenalineRush,
        name: "Adrenaline Rush",
        energy_cost: 0.0,
        combo_points_generated: 0,
        cooldown: ADRENALINE_RUSH_COOLDOWN_SECONDS,
        on_global_cooldown: false,
        crit_bonus_percent: 0.0,
        finisher: false,
    },
];

/// Look up the static definition for an ability.
pub fn ability(id: AbilityId) -> &'static Ability {
    match id {
        AbilityId::SinisterStrike => &ABILITIES[0],
        AbilityId::Eviscerate => &ABILITIES[1],
        AbilityId::SliceAndDice => &ABILITIES[2],
        AbilityId::Rupture => &ABILITIES[3],
        AbilityId::ExposeArmor => &ABILITIES[4],
        AbilityId::AdrenalineRush => &ABILITIES[5],
    }
}

/// Sinister Strike: weapon damage plus a flat bonus and attack power
/// scaling.
pub fn sinister_strike_damage(attack_power: f64, weapon_roll: f64) -> f64 {
    weapon_roll + SINISTER_STRIKE_FLAT_BONUS + attack_power * SINISTER_STRIKE_AP_COEFF
}

/// Eviscerate: flat damage per combo point spent, scaled by attack power.
pub fn eviscerate_damage(attack_power: f64, combo_points: u32) -> f64 {
    let points = combo_points as f64;
    points * (EVISCERATE_BASE_PER_COMBO_POINT + attack_power * EVISCERATE_AP_COEFF_PER_COMBO_POINT)
}

/// Slice and Dice: attack speed buff lasting longer per combo point.
pub fn slice_and_dice_buff(combo_points: u32) -> EffectSpec {
    let duration =
        SLICE_AND_DICE_BASE_SECONDS + SLICE_AND_DICE_SECONDS_PER_COMBO_POINT * combo_points as f64;
    EffectSpec {
        modifiers: vec![(ModifierChannel::AutoSpeed, SLICE_AND_DICE_HASTE)],
        ..EffectSpec::new(SLICE_AND_DICE_EFFECT, "Slice and Dice", duration)
    }
}

/// Rupture: bleed ticking every two seconds, duration and tick size
/// scaling with combo points.
pub fn rupture_debuff(attack_power: f64, combo_points: u32) -> EffectSpec {
    let points = combo_points as f64;
    let duration = RUPTURE_BASE_SECONDS + RUPTURE_SECONDS_PER_COMBO_POINT * points;
    let tick_amount = RUPTURE_TICK_BASE
        + RUPTURE_TICK_PER_COMBO_POINT * points
        + attack_power * RUPTURE_TICK_AP_COEFF_PER_COMBO_POINT * points;
    EffectSpec {
        tick: Some((
            RUPTURE_TICK_INTERVAL_SECONDS,
            TickAction::Damage {
                amount: tick_amount,
            },
        )),
        ..EffectSpec::new(RUPTURE_EFFECT, "Rupture", duration)
    }
}

/// Expose Armor: armor reduction read by the damage formula, scaling per
/// combo point.
pub fn expose_armor_debuff(combo_points: u32) -> EffectSpec {
    EffectSpec {
        armor_reduction: EXPOSE_ARMOR_REDUCTION_PER_COMBO_POINT * combo_points as f64,
        ..EffectSpec::new(EXPOSE_ARMOR_EFFECT, "Expose Armor", EXPOSE_ARMOR_SECONDS)
    }
}

/// Adrenaline Rush: doubled energy regeneration for a fixed window.
pub fn adrenaline_rush_buff() -> EffectSpec {
    EffectSpec {
        modifiers: vec![(ModifierChannel::EnergyRegen, ADRENALINE_RUSH_REGEN_BONUS)],
        ..EffectSpec::new(
            ADRENALINE_RUSH_EFFECT,
            "Adrenaline Rush",
            ADRENALINE_RUSH_SECONDS,
        )
    }
}
