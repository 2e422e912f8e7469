//! Pure combat math shared by the engine and the simulator.
//!
//! These functions calculate roll outcomes and damage without side
//! effects. All randomness comes in through `&mut impl Rng` so tests and
//! the simulator can pass a seeded generator.

use crate::constants::CRIT_DAMAGE_MULTIPLIER;
use rand::Rng;

/// Roll an attack hit check.
///
/// The chance is clamped to [0, 100] before the draw, so a configured
/// 100% hit chance can never miss and negative chances never hit.
pub fn roll_hit(chance_percent: f64, rng: &mut impl Rng) -> bool {
    let chance = chance_percent.clamp(0.0, 100.0);
    rng.gen::<f64>() * 100.0 < chance
}

/// Roll a critical strike check. Same clamping discipline as [`roll_hit`].
pub fn roll_crit(chance_percent: f64, rng: &mut impl Rng) -> bool {
    let chance = chance_percent.clamp(0.0, 100.0);
    rng.gen::<f64>() * 100.0 < chance
}

/// Roll a weapon damage value uniformly between the configured bounds.
pub fn weapon_damage(weapon_min: f64, weapon_max: f64, rng: &mut impl Rng) -> f64 {
    if weapon_max <= weapon_min {
        weapon_min
    } else {
        rng.gen_range(weapon_min..=weapon_max)
    }
}

/// Compose the damage modifier pipeline.
///
/// The order is fixed and load-bearing for numeric parity: armor
/// reduction first, then crit doubling, then the global damage
/// multiplier.
pub fn apply_damage_modifiers(
    base_damage: f64,
    is_crit: bool,
    armor_reduction: f64,
    damage_multiplier: f64,
) -> f64 {
    let mut damage = base_damage * (1.0 + armor_reduction);
    if is_crit {
        damage *= CRIT_DAMAGE_MULTIPLIER;
    }
    damage * damage_multiplier
}
