//! Timed buff/debuff lifecycle.
//!
//! Effects are declarative: an [`EffectSpec`] states which modifier
//! channels it installs, its tick behavior, and any side-data the damage
//! formula reads. Install and removal both derive from the same spec
//! keyed by the effect id, so a modifier installed on apply cannot
//! outlive its effect. Tick actions are returned to the engine as
//! [`EffectFire`] values rather than executed here, keeping the manager
//! free of combat logic.

use crate::modifiers::{ModifierChannel, ModifierRegistry};
use std::collections::HashMap;

/// Stable identifier for an effect. Re-applying an id replaces the prior
/// instance; two simultaneous instances of one id cannot exist.
pub type EffectId = &'static str;

/// What a ticking effect does on each elapsed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickAction {
    /// Periodic damage to the target (a DoT).
    Damage { amount: f64 },
    /// Periodic energy restoration to the combatant.
    Energy { amount: f64 },
}

/// Immutable description of an effect.
#[derive(Debug, Clone)]
pub struct EffectSpec {
    pub id: EffectId,
    pub name: &'static str,
    /// Duration in seconds. `f64::INFINITY` is allowed for persistent
    /// effects that only leave via explicit removal or `clear_all`.
    pub duration: f64,
    /// Modifier contributions installed on apply and removed on expiry,
    /// keyed in the registry by the effect id.
    pub modifiers: Vec<(ModifierChannel, f64)>,
    /// Tick interval in seconds plus the action fired once per interval.
    pub tick: Option<(f64, TickAction)>,
    /// Armor reduction fraction read directly by the damage formula while
    /// this effect is active on the target. 0.0 = none.
    pub armor_reduction: f64,
}

impl EffectSpec {
    pub fn new(id: EffectId, name: &'static str, duration: f64) -> Self {
        Self {
            id,
            name,
            duration,
            modifiers: Vec::new(),
            tick: None,
            armor_reduction: 0.0,
        }
    }
}

/// A live effect instance.
#[derive(Debug, Clone)]
pub struct ActiveEffect {
    pub spec: EffectSpec,
    /// Seconds left before expiry.
    pub remaining: f64,
    /// Progress toward the next tick interval.
    pub tick_progress: f64,
}

impl ActiveEffect {
    fn new(spec: EffectSpec) -> Self {
        let remaining = spec.duration;
        Self {
            spec,
            remaining,
            tick_progress: 0.0,
        }
    }
}

/// Which collection an effect lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSlot {
    Buff,
    Debuff,
}

/// A tick action due for execution by the engine.
#[derive(Debug, Clone, Copy)]
pub struct EffectFire {
    pub id: EffectId,
    pub name: &'static str,
    pub action: TickAction,
}

/// An effect removed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredEffect {
    pub slot: EffectSlot,
    pub id: EffectId,
    pub name: &'static str,
}

/// Result of ticking both effect collections.
#[derive(Debug, Clone, Default)]
pub struct EffectTickOutcome {
    /// One entry per elapsed tick interval, so an effect can fire several
    /// times when a single delta spans multiple intervals.
    pub fires: Vec<EffectFire>,
    /// Effects that expired this tick, in removal order.
    pub expired: Vec<ExpiredEffect>,
}

/// Owner of the active buff and debuff collections.
#[derive(Debug, Clone, Default)]
pub struct EffectManager {
    buffs: HashMap<EffectId, ActiveEffect>,
    debuffs: HashMap<EffectId, ActiveEffect>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a buff. If the id is already active its modifiers are
    /// released first, then the new instance installs fresh — exactly one
    /// net contribution per channel regardless of re-application.
    /// Returns true when a prior instance was replaced.
    pub fn apply_buff(&mut self, spec: EffectSpec, modifiers: &mut ModifierRegistry) -> bool {
        Self::apply(&mut self.buffs, spec, modifiers)
    }

    /// Apply a debuff to the target. Same replacement rule as buffs.
    pub fn apply_debuff(&mut self, spec: EffectSpec, modifiers: &mut ModifierRegistry) -> bool {
        Self::apply(&mut self.debuffs, spec, modifiers)
    }

    fn apply(
        map: &mut HashMap<EffectId, ActiveEffect>,
        spec: EffectSpec,
        modifiers: &mut ModifierRegistry,
    ) -> bool {
        let replaced = match map.remove(spec.id) {
            Some(old) => {
                Self::uninstall(&old.spec, modifiers);
                true
            }
            None => false,
        };
        Self::install(&spec, modifiers);
        map.insert(spec.id, ActiveEffect::new(spec));
        replaced
    }

    /// Explicit early removal of a buff. Releases its modifiers exactly
    /// once. Returns true if the buff was present.
    pub fn remove_buff(&mut self, id: EffectId, modifiers: &mut ModifierRegistry) -> bool {
        match self.buffs.remove(id) {
            Some(effect) => {
                Self::uninstall(&effect.spec, modifiers);
                true
            }
            None => false,
        }
    }

    /// Explicit early removal of a debuff.
    pub fn remove_debuff(&mut self, id: EffectId, modifiers: &mut ModifierRegistry) -> bool {
        match self.debuffs.remove(id) {
            Some(effect) => {
                Self::uninstall(&effect.spec, modifiers);
                true
            }
            None => false,
        }
    }

    /// Advance every active effect by `delta` seconds.
    ///
    /// Tick progress accumulates in a while loop, so one large delta
    /// produces one fire per elapsed interval. Effects whose remaining
    /// time reaches zero release their modifiers and are removed after
    /// their final fires are collected.
    pub fn tick(&mut self, delta: f64, modifiers: &mut ModifierRegistry) -> EffectTickOutcome {
        let mut outcome = EffectTickOutcome::default();
        Self::tick_collection(
            &mut self.buffs,
            EffectSlot::Buff,
            delta,
            modifiers,
            &mut outcome,
        );
        Self::tick_collection(
            &mut self.debuffs,
            EffectSlot::Debuff,
            delta,
            modifiers,
            &mut outcome,
        );
        outcome
    }

    fn tick_collection(
        map: &mut HashMap<EffectId, ActiveEffect>,
        slot: EffectSlot,
        delta: f64,
        modifiers: &mut ModifierRegistry,
        outcome: &mut EffectTickOutcome,
    ) {
        let mut expired: Vec<EffectId> = Vec::new();

        for effect in map.values_mut() {
            effect.remaining -= delta;

            if let Some((interval, action)) = effect.spec.tick {
                effect.tick_progress += delta;
                while effect.tick_progress >= interval {
                    effect.tick_progress -= interval;
                    outcome.fires.push(EffectFire {
                        id: effect.spec.id,
                        name: effect.spec.name,
                        action,
                    });
                }
            }

            if effect.remaining <= 0.0 {
                expired.push(effect.spec.id);
            }
        }

        for id in expired {
            if let Some(effect) = map.remove(id) {
                Self::uninstall(&effect.spec, modifiers);
                outcome.expired.push(ExpiredEffect {
                    slot,
                    id,
                    name: effect.spec.name,
                });
            }
        }
    }

    /// Remove every active effect, releasing its modifiers, then wipe all
    /// modifier channels outright. Invoked on combat stop/reset so no
    /// modifier can leak across sessions.
    pub fn clear_all(&mut self, modifiers: &mut ModifierRegistry) {
        for effect in self.buffs.values().chain(self.debuffs.values()) {
            Self::uninstall(&effect.spec, modifiers);
        }
        self.buffs.clear();
        self.debuffs.clear();
        modifiers.clear_all();
    }

    fn install(spec: &EffectSpec, modifiers: &mut ModifierRegistry) {
        for (channel, value) in &spec.modifiers {
            modifiers.set(*channel, spec.id, *value);
        }
    }

    fn uninstall(spec: &EffectSpec, modifiers: &mut ModifierRegistry) {
        for (channel, _) in &spec.modifiers {
            modifiers.remove(*channel, spec.id);
        }
    }

    /// Combined armor reduction fraction across active debuffs.
    pub fn armor_reduction(&self) -> f64 {
        self.debuffs
            .values()
            .map(|effect| effect.spec.armor_reduction)
            .sum()
    }

    pub fn has_buff(&self, id: EffectId) -> bool {
        self.buffs.contains_key(id)
    }

    pub fn has_debuff(&self, id: EffectId) -> bool {
        self.debuffs.contains_key(id)
    }

    pub fn buff_remaining(&self, id: EffectId) -> Option<f64> {
        self.buffs.get(id).map(|effect| effect.remaining)
    }

    pub fn debuff_remaining(&self, id: EffectId) -> Option<f64> {
        self.debuffs.get(id).map(|effect| effect.remaining)
    }

    pub fn buffs(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.buffs.values()
    }

    pub fn debuffs(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.debuffs.values()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty() && self.debuffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damage_buff(value: f64) -> EffectSpec {
        EffectSpec {
            modifiers: vec![(ModifierChannel::Damage, value)],
            ..EffectSpec::new("test_damage_buff", "Test Damage Buff", 10.0)
        }
    }

    #[test]
    fn test_apply_installs_modifiers() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);

        assert!(manager.has_buff("test_damage_buff"));
        assert!((modifiers.sum(ModifierChannel::Damage) - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_reapply_replaces_without_stacking() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        let replaced = manager.apply_buff(damage_buff(0.20), &mut modifiers);

        assert!(replaced);
        // Exactly one net contribution: 0.2, not 0.4
        assert!((modifiers.sum(ModifierChannel::Damage) - 0.20).abs() < 1e-9);
        assert_eq!(modifiers.source_count(ModifierChannel::Damage), 1);
    }

    #[test]
    fn test_reapply_resets_duration() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        manager.tick(6.0, &mut modifiers);
        assert!(manager.buff_remaining("test_damage_buff").unwrap() < 5.0);

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        assert_eq!(manager.buff_remaining("test_damage_buff"), Some(10.0));
    }

    #[test]
    fn test_expiry_releases_modifiers() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        let outcome = manager.tick(10.5, &mut modifiers);

        assert_eq!(
            outcome.expired,
            vec![ExpiredEffect {
                slot: EffectSlot::Buff,
                id: "test_damage_buff",
                name: "Test Damage Buff",
            }]
        );
        assert!(!manager.has_buff("test_damage_buff"));
        assert_eq!(modifiers.sum(ModifierChannel::Damage), 0.0);
    }

    #[test]
    fn test_tick_fires_once_per_interval() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        let dot = EffectSpec {
            tick: Some((2.0, TickAction::Damage { amount: 50.0 })),
            ..EffectSpec::new("test_dot", "Test DoT", 12.0)
        };
        manager.apply_debuff(dot, &mut modifiers);

        // One large delta spanning 2.5 intervals: exactly 2 fires
        let outcome = manager.tick(5.0, &mut modifiers);
        assert_eq!(outcome.fires.len(), 2);

        // The half-interval carries over
        let outcome = manager.tick(1.0, &mut modifiers);
        assert_eq!(outcome.fires.len(), 1);
    }

    #[test]
    fn test_final_tick_fires_before_expiry() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        let dot = EffectSpec {
            tick: Some((2.0, TickAction::Damage { amount: 50.0 })),
            ..EffectSpec::new("test_dot", "Test DoT", 6.0)
        };
        manager.apply_debuff(dot, &mut modifiers);

        let outcome = manager.tick(6.0, &mut modifiers);
        assert_eq!(outcome.fires.len(), 3);
        assert_eq!(outcome.expired.len(), 1);
    }

    #[test]
    fn test_zero_delta_changes_nothing() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        let outcome = manager.tick(0.0, &mut modifiers);

        assert!(outcome.fires.is_empty());
        assert!(outcome.expired.is_empty());
        assert_eq!(manager.buff_remaining("test_damage_buff"), Some(10.0));
    }

    #[test]
    fn test_persistent_effect_never_expires() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        let stance = EffectSpec {
            modifiers: vec![(ModifierChannel::CritChance, 5.0)],
            ..EffectSpec::new("test_stance", "Test Stance", f64::INFINITY)
        };
        manager.apply_buff(stance, &mut modifiers);

        manager.tick(10_000.0, &mut modifiers);
        assert!(manager.has_buff("test_stance"));
    }

    #[test]
    fn test_early_removal_runs_cleanup_once() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        assert!(manager.remove_buff("test_damage_buff", &mut modifiers));
        assert!(!manager.remove_buff("test_damage_buff", &mut modifiers));
        assert_eq!(modifiers.sum(ModifierChannel::Damage), 0.0);
    }

    #[test]
    fn test_clear_all_leaves_nothing_behind() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        manager.apply_buff(damage_buff(0.20), &mut modifiers);
        let dot = EffectSpec {
            armor_reduction: 0.08,
            tick: Some((2.0, TickAction::Damage { amount: 40.0 })),
            ..EffectSpec::new("test_dot", "Test DoT", 18.0)
        };
        manager.apply_debuff(dot, &mut modifiers);
        // A stray modifier outside any effect is wiped by the backstop too
        modifiers.set(ModifierChannel::CooldownRate, "stray", 0.5);

        manager.clear_all(&mut modifiers);

        assert!(manager.is_empty());
        assert!(modifiers.is_empty());
        assert_eq!(manager.armor_reduction(), 0.0);
    }

    #[test]
    fn test_armor_reduction_reads_active_debuffs() {
        let mut manager = EffectManager::new();
        let mut modifiers = ModifierRegistry::new();

        let sunder = EffectSpec {
            armor_reduction: 0.08,
            ..EffectSpec::new("test_sunder", "Test Sunder", 30.0)
        };
        manager.apply_debuff(sunder, &mut modifiers);

        assert!((manager.armor_reduction() - 0.08).abs() < 1e-9);
    }
}
