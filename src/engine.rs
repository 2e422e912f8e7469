//! The rotation engine: single owner of combatant state.
//!
//! One [`RotationEngine`] value holds the entire mutable aggregate:
//! resources, cooldowns, modifiers, active effects, statistics, and the
//! target binding. Hosts drive it through a handful of synchronous entry
//! points — `advance` once per frame plus discrete calls for
//! cast/start/stop/reset/config — and read state back through the pull
//! snapshot. There is no global state; independent engines coexist
//! freely.

use crate::abilities::{self, Ability, AbilityId};
use crate::combat_math::{apply_damage_modifiers, roll_crit, roll_hit, weapon_damage};
use crate::config::{EngineConfig, EngineConfigUpdate};
use crate::constants::{
    BASE_AUTO_ATTACK_INTERVAL_SECONDS, LETHALITY_FINISHER_CRIT_BONUS_PERCENT, MAX_COMBO_POINTS,
    MAX_SUB_STEP_SECONDS, PRECISION_FINISHER_FLAT_BONUS, PRECISION_HIT_BONUS_PERCENT,
    SHADOW_TECHNIQUES_COMBO_CHANCE_PERCENT,
};
use crate::effects::{EffectId, EffectManager, EffectSlot, EffectSpec, TickAction};
use crate::events::CombatEvent;
use crate::modifiers::{ModifierChannel, ModifierRegistry};
use crate::procs::{ProcConfigUpdate, ProcContext, ProcEngine, ProcFire};
use crate::stats::{
    AbilityUsage, CombatStatistics, DpsSample, SessionComparison, SessionRecord,
};
use crate::target::{TargetAdapter, TrainingDummy};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of a cast attempt: a boolean plus the events explaining it.
#[derive(Debug)]
pub struct CastOutcome {
    /// True when the cast committed (energy stayed spent, cooldowns were
    /// armed). False for validation rejections and handler rollbacks.
    pub used: bool,
    pub events: Vec<CombatEvent>,
}

/// Parameters of one ability attack roll.
struct YellowStrike {
    ability: AbilityId,
    base_damage: f64,
    combo_points_generated: u32,
    combo_points_spent: u32,
    crit_bonus_percent: f64,
}

/// Read-only view of an active effect.
#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub id: String,
    pub name: String,
    pub remaining: f64,
}

/// Read-only view of an armed cooldown.
#[derive(Debug, Clone, Serialize)]
pub struct CooldownView {
    pub ability: AbilityId,
    pub remaining: f64,
}

/// Read-only per-ability usage entry.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityUsageView {
    pub ability: AbilityId,
    pub count: u64,
    pub damage: u64,
}

/// Pull-based presentation snapshot, produced on demand.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub in_combat: bool,
    pub energy: f64,
    pub max_energy: f64,
    pub combo_points: u32,
    pub max_combo_points: u32,
    pub global_cooldown: f64,
    pub cooldowns: Vec<CooldownView>,
    pub buffs: Vec<EffectView>,
    pub debuffs: Vec<EffectView>,
    pub total_damage: u64,
    pub combat_time: f64,
    pub dps: f64,
    pub current_dps: f64,
    pub hit_count: u64,
    pub crit_count: u64,
    pub miss_count: u64,
    pub ability_usage: Vec<AbilityUsageView>,
    pub auto_attack: AbilityUsage,
    pub dps_series: Vec<DpsSample>,
    pub sessions: SessionComparison,
    pub external_target: bool,
    pub target_health: f64,
    pub target_max_health: f64,
}

/// The simulation engine.
pub struct RotationEngine {
    config: EngineConfig,
    procs: ProcEngine,
    in_combat: bool,
    energy: f64,
    combo_points: u32,
    global_cooldown: f64,
    cooldowns: HashMap<AbilityId, f64>,
    modifiers: ModifierRegistry,
    effects: EffectManager,
    stats: CombatStatistics,
    energy_tick_progress: f64,
    auto_attack_timer: f64,
    target: Box<dyn TargetAdapter>,
    external_target: bool,
    previous_session: Option<SessionRecord>,
    last_session: Option<SessionRecord>,
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RotationEngine {
    pub fn new(mut config: EngineConfig) -> Self {
        config.sanitize();
        let mut procs = ProcEngine::new();
        for (id, update) in &config.procs {
            procs.update_config(id, update);
        }
        Self {
            energy: config.regen.max_energy,
            combo_points: 0,
            in_combat: false,
            global_cooldown: 0.0,
            cooldowns: HashMap::new(),
            modifiers: ModifierRegistry::new(),
            effects: EffectManager::new(),
            stats: CombatStatistics::new(),
            energy_tick_progress: 0.0,
            auto_attack_timer: BASE_AUTO_ATTACK_INTERVAL_SECONDS,
            target: Box::new(TrainingDummy::new()),
            external_target: false,
            previous_session: None,
            last_session: None,
            procs,
            config,
        }
    }

    // ── Target binding ──────────────────────────────────────────

    /// Route damage to an external target instead of the internal dummy.
    pub fn bind_target(&mut self, target: Box<dyn TargetAdapter>) {
        self.target = target;
        self.external_target = true;
    }

    /// Return to the internal training dummy.
    pub fn unbind_target(&mut self) {
        self.target = Box::new(TrainingDummy::new());
        self.external_target = false;
    }

    // ── Combat lifecycle ────────────────────────────────────────

    pub fn start_combat(&mut self) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        self.start_combat_inner(&mut events);
        events
    }

    fn start_combat_inner(&mut self, events: &mut Vec<CombatEvent>) {
        if self.in_combat {
            return;
        }
        self.in_combat = true;
        self.stats.reset();
        self.energy_tick_progress = 0.0;
        self.auto_attack_timer =
            BASE_AUTO_ATTACK_INTERVAL_SECONDS / self.modifiers.auto_speed_multiplier();
        self.target.on_combat_start();
        events.push(CombatEvent::CombatStarted {
            message: "Combat started".to_string(),
        });
    }

    /// Stop combat, capture a session record, and release every active
    /// effect and modifier.
    pub fn stop_combat(&mut self) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        self.stop_combat_inner(&mut events);
        events
    }

    fn stop_combat_inner(&mut self, events: &mut Vec<CombatEvent>) {
        if !self.in_combat {
            return;
        }
        self.in_combat = false;

        if self.stats.combat_time > 0.0 {
            let record = SessionRecord {
                total_damage: self.stats.total_damage,
                duration: self.stats.combat_time,
                dps: self.stats.dps(),
                ended_at: chrono::Utc::now().timestamp(),
            };
            self.previous_session = self.last_session.take();
            self.last_session = Some(record);
        }

        self.effects.clear_all(&mut self.modifiers);
        self.target.on_combat_end();
        events.push(CombatEvent::CombatEnded {
            message: format!(
                "Combat ended after {:.1}s ({:.0} DPS)",
                self.stats.combat_time,
                self.stats.dps()
            ),
        });
    }

    /// Full reset: stop combat, refill energy, clear combo points,
    /// cooldowns, and statistics.
    pub fn reset(&mut self) -> Vec<CombatEvent> {
        let events = self.stop_combat();
        self.energy = self.config.regen.max_energy;
        self.combo_points = 0;
        self.global_cooldown = 0.0;
        self.cooldowns.clear();
        self.stats.reset();
        self.target.on_reset();
        events
    }

    // ── Tick loop ───────────────────────────────────────────────

    /// Advance the simulation by `delta_seconds`.
    ///
    /// Large deltas (a throttled or backgrounded host) are chopped into
    /// sub-steps of at most half a second and applied sequentially, so a
    /// single huge catch-up step cannot skip regen ticks, effect expiry,
    /// or auto attacks.
    pub fn advance(&mut self, delta_seconds: f64, rng: &mut impl Rng) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        let mut remaining = delta_seconds.max(0.0);
        while remaining > 0.0 {
            let step = remaining.min(MAX_SUB_STEP_SECONDS);
            self.step(step, rng, &mut events);
            remaining -= step;
        }
        events
    }

    fn step(&mut self, dt: f64, rng: &mut impl Rng, events: &mut Vec<CombatEvent>) {
        // Global cooldown decays in real time
        self.global_cooldown = (self.global_cooldown - dt).max(0.0);

        // Ability cooldowns decay at the cooldown-rate multiplier and are
        // removed once spent
        let rate = self.modifiers.multiplier(ModifierChannel::CooldownRate);
        for remaining in self.cooldowns.values_mut() {
            *remaining -= dt * rate;
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0.0);

        if !self.in_combat {
            return;
        }

        self.stats.combat_time += dt;

        // Buff/debuff ticking
        let outcome = self.effects.tick(dt, &mut self.modifiers);
        for expired in outcome.expired {
            events.push(match expired.slot {
                EffectSlot::Buff => CombatEvent::BuffExpired {
                    effect: expired.id,
                    message: format!("{} fades", expired.name),
                },
                EffectSlot::Debuff => CombatEvent::DebuffExpired {
                    effect: expired.id,
                    message: format!("{} fades from the target", expired.name),
                },
            });
        }
        for fire in outcome.fires {
            match fire.action {
                TickAction::Damage { amount } => {
                    let damage =
                        amount * self.modifiers.multiplier(ModifierChannel::Damage);
                    let mut post = Vec::new();
                    let applied =
                        self.apply_damage(damage, None, false, true, false, 0, rng, &mut post);
                    if applied > 0 {
                        events.push(CombatEvent::PeriodicDamage {
                            effect: fire.id,
                            damage: applied,
                            message: format!("{} ticks for {}", fire.name, applied),
                        });
                    }
                    events.append(&mut post);
                }
                TickAction::Energy { amount } => {
                    self.gain_energy(amount);
                    events.push(CombatEvent::EnergyRestored {
                        amount,
                        message: format!("{} restores {:.0} energy", fire.name, amount),
                    });
                }
            }
        }

        // Energy regeneration: a while loop so one large delta grants
        // every elapsed tick, not just the first
        self.energy_tick_progress += dt;
        let interval = self.config.regen.tick_interval;
        while self.energy_tick_progress >= interval {
            self.energy_tick_progress -= interval;
            let gained = self.config.regen.energy_per_tick
                * (1.0 + self.config.regen.vigor_bonus)
                * self.modifiers.multiplier(ModifierChannel::EnergyRegen);
            self.gain_energy(gained);
        }

        // Auto attack: the timer re-arms by adding the current interval,
        // preserving overshoot across speed changes
        self.auto_attack_timer -= dt;
        while self.auto_attack_timer <= 0.0 {
            self.perform_white_damage(rng, events);
            let interval =
                BASE_AUTO_ATTACK_INTERVAL_SECONDS / self.modifiers.auto_speed_multiplier();
            self.auto_attack_timer += interval;
        }

        self.stats.maybe_sample();
    }

    // ── Cast protocol ───────────────────────────────────────────

    /// True when a cast of `id` would pass validation right now.
    pub fn can_use(&self, id: AbilityId) -> bool {
        let def = abilities::ability(id);
        self.energy >= def.energy_cost
            && !(def.on_global_cooldown && self.global_cooldown > 0.0)
            && !self.cooldowns.contains_key(&id)
    }

    /// Attempt to cast an ability.
    ///
    /// Validation checks run in order (energy, global cooldown, own
    /// cooldown) and reject without mutating state. A committed cast
    /// spends energy and arms cooldowns even if its attack roll misses;
    /// only an explicit resource-precondition failure inside the handler
    /// (a finisher with no combo points) refunds the energy and leaves
    /// every cooldown untouched.
    pub fn try_cast(&mut self, id: AbilityId, rng: &mut impl Rng) -> CastOutcome {
        let def = abilities::ability(id);
        let mut events = Vec::new();

        // Casting auto-starts combat
        self.start_combat_inner(&mut events);

        if self.energy < def.energy_cost {
            events.push(CombatEvent::CastRejected {
                ability: id,
                message: format!(
                    "Not enough energy for {} ({:.0}/{:.0})",
                    def.name, self.energy, def.energy_cost
                ),
            });
            return CastOutcome {
                used: false,
                events,
            };
        }
        if def.on_global_cooldown && self.global_cooldown > 0.0 {
            events.push(CombatEvent::CastRejected {
                ability: id,
                message: format!(
                    "{} is on global cooldown ({:.1}s)",
                    def.name, self.global_cooldown
                ),
            });
            return CastOutcome {
                used: false,
                events,
            };
        }
        if let Some(remaining) = self.cooldowns.get(&id).copied() {
            events.push(CombatEvent::CastRejected {
                ability: id,
                message: format!("{} is on cooldown ({:.1}s)", def.name, remaining),
            });
            return CastOutcome {
                used: false,
                events,
            };
        }

        // Cost is deducted up front; the handler decides whether the cast
        // commits
        self.energy -= def.energy_cost;
        let committed = self.execute_handler(def, rng, &mut events);
        if !committed {
            self.energy += def.energy_cost;
            return CastOutcome {
                used: false,
                events,
            };
        }

        if def.on_global_cooldown {
            self.global_cooldown = self.config.global_cooldown;
        }
        if def.cooldown > 0.0 {
            self.cooldowns.insert(id, def.cooldown);
        }
        CastOutcome { used: true, events }
    }

    fn execute_handler(
        &mut self,
        def: &Ability,
        rng: &mut impl Rng,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let attack_power = self.config.stats.attack_power;
        match def.id {
            AbilityId::SinisterStrike => {
                let weapon = weapon_damage(
                    self.config.stats.weapon_min,
                    self.config.stats.weapon_max,
                    rng,
                );
                let base = abilities::sinister_strike_damage(attack_power, weapon);
                self.perform_yellow_damage(
                    YellowStrike {
                        ability: def.id,
                        base_damage: base,
                        combo_points_generated: def.combo_points_generated,
                        combo_points_spent: 0,
                        crit_bonus_percent: def.crit_bonus_percent,
                    },
                    rng,
                    events,
                );
                true
            }
            AbilityId::Eviscerate => {
                let points = self.combo_points;
                if points == 0 {
                    events.push(CombatEvent::CastRolledBack {
                        ability: def.id,
                        message: format!("No combo points for {}", def.name),
                    });
                    return false;
                }
                let base = abilities::eviscerate_damage(attack_power, points);
                self.perform_yellow_damage(
                    YellowStrike {
                        ability: def.id,
                        base_damage: base,
                        combo_points_generated: 0,
                        combo_points_spent: points,
                        crit_bonus_percent: def.crit_bonus_percent,
                    },
                    rng,
                    events,
                );
                true
            }
            AbilityId::SliceAndDice => {
                let points = self.combo_points;
                if points == 0 {
                    events.push(CombatEvent::CastRolledBack {
                        ability: def.id,
                        message: format!("No combo points for {}", def.name),
                    });
                    return false;
                }
                let buff = abilities::slice_and_dice_buff(points);
                self.apply_buff_inner(buff, events);
                self.combo_points = 0;
                true
            }
            AbilityId::Rupture => {
                let points = self.combo_points;
                if points == 0 {
                    events.push(CombatEvent::CastRolledBack {
                        ability: def.id,
                        message: format!("No combo points for {}", def.name),
                    });
                    return false;
                }
                // A missed application still commits the cast
                if !roll_hit(self.hit_chance(), rng) {
                    self.stats.record_miss();
                    events.push(CombatEvent::AbilityMiss {
                        ability: def.id,
                        message: format!("{} misses", def.name),
                    });
                    return true;
                }
                let debuff = abilities::rupture_debuff(attack_power, points);
                self.apply_debuff_inner(debuff, events);
                self.combo_points = 0;
                true
            }
            AbilityId::ExposeArmor => {
                let points = self.combo_points;
                if points == 0 {
                    events.push(CombatEvent::CastRolledBack {
                        ability: def.id,
                        message: format!("No combo points for {}", def.name),
                    });
                    return false;
                }
                if !roll_hit(self.hit_chance(), rng) {
                    self.stats.record_miss();
                    events.push(CombatEvent::AbilityMiss {
                        ability: def.id,
                        message: format!("{} misses", def.name),
                    });
                    return true;
                }
                let debuff = abilities::expose_armor_debuff(points);
                self.apply_debuff_inner(debuff, events);
                self.combo_points = 0;
                true
            }
            AbilityId::AdrenalineRush => {
                self.apply_buff_inner(abilities::adrenaline_rush_buff(), events);
                true
            }
        }
    }

    // ── Combat resolution ───────────────────────────────────────

    fn hit_chance(&self) -> f64 {
        let mut chance = self.config.stats.hit_chance;
        if self.config.talents.precision {
            chance += PRECISION_HIT_BONUS_PERCENT;
        }
        chance
    }

    fn crit_chance(&self, extra_percent: f64) -> f64 {
        self.config.stats.crit_chance + self.modifiers.crit_chance_bonus() + extra_percent
    }

    fn perform_yellow_damage(
        &mut self,
        strike: YellowStrike,
        rng: &mut impl Rng,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let name = abilities::ability(strike.ability).name;

        if !roll_hit(self.hit_chance(), rng) {
            self.stats.record_miss();
            events.push(CombatEvent::AbilityMiss {
                ability: strike.ability,
                message: format!("{} misses", name),
            });
            return false;
        }

        let mut crit_chance = self.crit_chance(strike.crit_bonus_percent);
        if strike.combo_points_spent > 0 && self.config.talents.lethality {
            crit_chance += LETHALITY_FINISHER_CRIT_BONUS_PERCENT;
        }
        let crit = roll_crit(crit_chance, rng);

        let mut base = strike.base_damage;
        if strike.combo_points_spent > 0 && self.config.talents.precision {
            base += PRECISION_FINISHER_FLAT_BONUS;
        }

        let damage = apply_damage_modifiers(
            base,
            crit,
            self.effects.armor_reduction(),
            self.modifiers.multiplier(ModifierChannel::Damage),
        );

        let mut post = Vec::new();
        let applied = self.apply_damage(
            damage,
            Some(strike.ability),
            false,
            false,
            crit,
            strike.combo_points_spent,
            rng,
            &mut post,
        );
        if applied > 0 {
            let verb = if crit { "crits" } else { "hits" };
            events.push(CombatEvent::AbilityHit {
                ability: strike.ability,
                damage: applied,
                crit,
                message: format!("{} {} for {}", name, verb, applied),
            });
        }
        events.append(&mut post);

        self.combo_points = self.combo_points.saturating_sub(strike.combo_points_spent);
        self.gain_combo_points(strike.combo_points_generated);
        true
    }

    fn perform_white_damage(&mut self, rng: &mut impl Rng, events: &mut Vec<CombatEvent>) {
        if !roll_hit(self.hit_chance(), rng) {
            self.stats.record_miss();
            events.push(CombatEvent::AutoAttackMiss {
                message: "Auto attack misses".to_string(),
            });
            return;
        }

        let crit = roll_crit(self.crit_chance(0.0), rng);
        let base = weapon_damage(
            self.config.stats.weapon_min,
            self.config.stats.weapon_max,
            rng,
        );
        let damage = apply_damage_modifiers(
            base,
            crit,
            self.effects.armor_reduction(),
            self.modifiers.multiplier(ModifierChannel::Damage),
        );

        let mut post = Vec::new();
        let applied = self.apply_damage(damage, None, true, false, crit, 0, rng, &mut post);
        if applied > 0 {
            let verb = if crit { "crits" } else { "hits" };
            events.push(CombatEvent::AutoAttackHit {
                damage: applied,
                crit,
                message: format!("Auto attack {} for {}", verb, applied),
            });
        }
        events.append(&mut post);

        // Shadow Techniques rides on white hits only; this roll is a
        // talent effect, independent of the proc table
        if self.config.talents.shadow_techniques
            && roll_hit(SHADOW_TECHNIQUES_COMBO_CHANCE_PERCENT, rng)
        {
            self.gain_combo_points(1);
            events.push(CombatEvent::ComboPointGained {
                total: self.combo_points,
                message: "Shadow Techniques grants a combo point".to_string(),
            });
        }
    }

    /// Apply rounded damage to the bound target.
    ///
    /// Amounts that round to zero or below are dropped without touching
    /// statistics, the log, or the proc table — a deliberate policy, not
    /// a bug.
    #[allow(clippy::too_many_arguments)]
    fn apply_damage(
        &mut self,
        amount: f64,
        ability: Option<AbilityId>,
        white: bool,
        periodic: bool,
        crit: bool,
        combo_points_spent: u32,
        rng: &mut impl Rng,
        events: &mut Vec<CombatEvent>,
    ) -> u64 {
        let rounded = amount.round();
        if rounded <= 0.0 {
            return 0;
        }
        let applied = rounded as u64;

        self.target.apply_damage(rounded);
        self.stats.record_hit(ability, white, applied, crit);

        let ctx = ProcContext {
            ability,
            white,
            periodic,
            crit,
            combo_points_spent,
            amount: applied,
        };
        for fire in self.procs.handle_damage(&ctx, rng) {
            self.apply_proc_fire(fire, events);
        }

        if self.target.current_health() <= 0.0 {
            events.push(CombatEvent::TargetDefeated {
                message: "Target defeated".to_string(),
            });
            self.target.on_defeated();
            self.stop_combat_inner(events);
        }

        applied
    }

    fn apply_proc_fire(&mut self, fire: ProcFire, events: &mut Vec<CombatEvent>) {
        events.push(CombatEvent::ProcTriggered {
            proc: fire.proc,
            message: fire.message,
            flash: fire.flash,
        });
        if fire.energy > 0.0 {
            self.gain_energy(fire.energy);
        }
        if fire.combo_points > 0 {
            self.gain_combo_points(fire.combo_points);
        }
        if let Some(buff) = fire.buff {
            self.apply_buff_inner(buff, events);
        }
    }

    fn gain_energy(&mut self, amount: f64) {
        self.energy = (self.energy + amount).clamp(0.0, self.config.regen.max_energy);
    }

    fn gain_combo_points(&mut self, points: u32) {
        self.combo_points = (self.combo_points + points).min(MAX_COMBO_POINTS);
    }

    // ── Effects ─────────────────────────────────────────────────

    /// Apply a buff. Re-applying an active id releases the prior
    /// instance's modifiers before the new ones install.
    pub fn apply_buff(&mut self, spec: EffectSpec) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        self.apply_buff_inner(spec, &mut events);
        events
    }

    /// Apply a debuff to the target.
    pub fn apply_debuff(&mut self, spec: EffectSpec) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        self.apply_debuff_inner(spec, &mut events);
        events
    }

    fn apply_buff_inner(&mut self, spec: EffectSpec, events: &mut Vec<CombatEvent>) {
        let id = spec.id;
        let name = spec.name;
        let duration = spec.duration;
        let replaced = self.effects.apply_buff(spec, &mut self.modifiers);
        let message = if replaced {
            format!("{} refreshed ({:.1}s)", name, duration)
        } else {
            format!("Gained {} ({:.1}s)", name, duration)
        };
        events.push(CombatEvent::BuffApplied {
            effect: id,
            message,
        });
    }

    fn apply_debuff_inner(&mut self, spec: EffectSpec, events: &mut Vec<CombatEvent>) {
        let id = spec.id;
        let name = spec.name;
        let duration = spec.duration;
        let replaced = self.effects.apply_debuff(spec, &mut self.modifiers);
        let message = if replaced {
            format!("{} refreshed on the target ({:.1}s)", name, duration)
        } else {
            format!("{} afflicts the target ({:.1}s)", name, duration)
        };
        events.push(CombatEvent::DebuffApplied {
            effect: id,
            message,
        });
    }

    /// Remove a buff early, releasing its modifiers.
    pub fn remove_buff(&mut self, id: EffectId) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if self.effects.remove_buff(id, &mut self.modifiers) {
            events.push(CombatEvent::BuffExpired {
                effect: id,
                message: format!("{} removed", id),
            });
        }
        events
    }

    /// Remove a debuff early, releasing its modifiers.
    pub fn remove_debuff(&mut self, id: EffectId) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if self.effects.remove_debuff(id, &mut self.modifiers) {
            events.push(CombatEvent::DebuffExpired {
                effect: id,
                message: format!("{} removed", id),
            });
        }
        events
    }

    // ── Configuration ───────────────────────────────────────────

    /// Merge a partial configuration update over the current values and
    /// forward any proc tuning to the proc table.
    pub fn update_config(&mut self, update: &EngineConfigUpdate) {
        self.config.merge(update);
        self.energy = self.energy.min(self.config.regen.max_energy);
        for (id, proc_update) in &update.procs {
            self.procs.update_config(id, proc_update);
        }
    }

    /// Update a single proc's tuning.
    pub fn update_proc_config(&mut self, id: &str, update: &ProcConfigUpdate) -> bool {
        self.procs.update_config(id, update)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn max_energy(&self) -> f64 {
        self.config.regen.max_energy
    }

    pub fn combo_points(&self) -> u32 {
        self.combo_points
    }

    pub fn global_cooldown(&self) -> f64 {
        self.global_cooldown
    }

    /// Remaining cooldown for an ability; 0 when ready.
    pub fn cooldown_remaining(&self, id: AbilityId) -> f64 {
        self.cooldowns.get(&id).copied().unwrap_or(0.0)
    }

    pub fn has_buff(&self, id: EffectId) -> bool {
        self.effects.has_buff(id)
    }

    pub fn has_debuff(&self, id: EffectId) -> bool {
        self.effects.has_debuff(id)
    }

    pub fn buff_remaining(&self, id: EffectId) -> Option<f64> {
        self.effects.buff_remaining(id)
    }

    pub fn debuff_remaining(&self, id: EffectId) -> Option<f64> {
        self.effects.debuff_remaining(id)
    }

    pub fn stats(&self) -> &CombatStatistics {
        &self.stats
    }

    pub fn last_session(&self) -> Option<&SessionRecord> {
        self.last_session.as_ref()
    }

    /// Produce the read-only snapshot consumed by presentation layers.
    pub fn snapshot(&self) -> EngineSnapshot {
        let mut cooldowns: Vec<CooldownView> = self
            .cooldowns
            .iter()
            .map(|(ability, remaining)| CooldownView {
                ability: *ability,
                remaining: *remaining,
            })
            .collect();
        cooldowns.sort_by_key(|view| view.ability.name());

        let mut ability_usage: Vec<AbilityUsageView> = self
            .stats
            .ability_usage
            .iter()
            .map(|(ability, usage)| AbilityUsageView {
                ability: *ability,
                count: usage.count,
                damage: usage.damage,
            })
            .collect();
        ability_usage.sort_by_key(|view| view.ability.name());

        let effect_view = |effect: &crate::effects::ActiveEffect| EffectView {
            id: effect.spec.id.to_string(),
            name: effect.spec.name.to_string(),
            remaining: effect.remaining,
        };
        let mut buffs: Vec<EffectView> = self.effects.buffs().map(effect_view).collect();
        buffs.sort_by(|a, b| a.id.cmp(&b.id));
        let mut debuffs: Vec<EffectView> = self.effects.debuffs().map(effect_view).collect();
        debuffs.sort_by(|a, b| a.id.cmp(&b.id));

        EngineSnapshot {
            in_combat: self.in_combat,
            energy: self.energy,
            max_energy: self.config.regen.max_energy,
            combo_points: self.combo_points,
            max_combo_points: MAX_COMBO_POINTS,
            global_cooldown: self.global_cooldown,
            cooldowns,
            buffs,
            debuffs,
            total_damage: self.stats.total_damage,
            combat_time: self.stats.combat_time,
            dps: self.stats.dps(),
            current_dps: self.stats.current_dps(),
            hit_count: self.stats.hit_count,
            crit_count: self.stats.crit_count,
            miss_count: self.stats.miss_count,
            ability_usage,
            auto_attack: self.stats.auto_attack,
            dps_series: self.stats.dps_samples.iter().copied().collect(),
            sessions: SessionComparison::new(self.previous_session, self.last_session),
            external_target: self.external_target,
            target_health: self.target.current_health(),
            target_max_health: self.target.max_health(),
        }
    }
}
