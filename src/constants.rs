// Engine timing constants
pub const MAX_SUB_STEP_SECONDS: f64 = 0.5;
pub const DEFAULT_GLOBAL_COOLDOWN_SECONDS: f64 = 1.0;

// Energy economy
pub const DEFAULT_ENERGY_TICK_INTERVAL_SECONDS: f64 = 2.0;
pub const DEFAULT_ENERGY_PER_TICK: f64 = 20.0;
pub const DEFAULT_MAX_ENERGY: f64 = 100.0;
pub const MIN_ENERGY_TICK_INTERVAL_SECONDS: f64 = 0.1;
pub const MAX_ENERGY_LOWER_BOUND: f64 = 10.0;
pub const MAX_ENERGY_UPPER_BOUND: f64 = 1000.0;

// Combo points
pub const MAX_COMBO_POINTS: u32 = 5;

// Auto attack
pub const BASE_AUTO_ATTACK_INTERVAL_SECONDS: f64 = 2.0;
pub const MIN_AUTO_SPEED_MULTIPLIER: f64 = 0.1;

// Damage
pub const CRIT_DAMAGE_MULTIPLIER: f64 = 2.0;

// Default stat block
pub const DEFAULT_ATTACK_POWER: f64 = 200.0;
pub const DEFAULT_WEAPON_MIN: f64 = 60.0;
pub const DEFAULT_WEAPON_MAX: f64 = 90.0;
pub const DEFAULT_CRIT_CHANCE_PERCENT: f64 = 20.0;
pub const DEFAULT_HIT_CHANCE_PERCENT: f64 = 95.0;

// Talent effects
pub const PRECISION_HIT_BONUS_PERCENT: f64 = 6.0;
pub const PRECISION_FINISHER_FLAT_BONUS: f64 = 25.0;
pub const LETHALITY_FINISHER_CRIT_BONUS_PERCENT: f64 = 10.0;
pub const SHADOW_TECHNIQUES_COMBO_CHANCE_PERCENT: f64 = 30.0;

// Internal training dummy (auto-resets on defeat)
pub const DUMMY_MAX_HEALTH: f64 = 50_000_000.0;

// Statistics
pub const DPS_SAMPLE_INTERVAL_SECONDS: f64 = 1.0;
pub const DPS_SAMPLE_CAP: usize = 120;
