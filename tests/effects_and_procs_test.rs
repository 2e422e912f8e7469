//! Integration tests for buff/debuff lifecycle and proc behavior driven
//! through the public engine API.

use rotsim::abilities::{AbilityId, RUPTURE_EFFECT, SLICE_AND_DICE_EFFECT};
use rotsim::config::{EngineConfigUpdate, StatsConfigUpdate, TalentsUpdate};
use rotsim::effects::{EffectSpec, TickAction};
use rotsim::events::CombatEvent;
use rotsim::procs::{self, ProcConfigUpdate, BATTLE_TRANCE_EFFECT};
use rotsim::{EngineConfig, RotationEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn pinned_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.stats.hit_chance = 100.0;
    config.stats.crit_chance = 0.0;
    config.stats.weapon_min = 75.0;
    config.stats.weapon_max = 75.0;
    config
}

fn pinned_engine() -> RotationEngine {
    let mut engine = RotationEngine::new(pinned_config());
    for def in procs::definitions() {
        engine.update_proc_config(
            def.id,
            &ProcConfigUpdate {
                enabled: Some(false),
                values: Default::default(),
            },
        );
    }
    engine
}

fn proc_update(values: &[(&str, f64)], enabled: Option<bool>) -> ProcConfigUpdate {
    ProcConfigUpdate {
        enabled,
        values: values
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect(),
    }
}

fn count_events<F: Fn(&CombatEvent) -> bool>(events: &[CombatEvent], pred: F) -> usize {
    events.iter().filter(|event| pred(event)).count()
}

// =============================================================================
// 1. DoT lifecycle through the engine
// =============================================================================

#[test]
fn test_rupture_ticks_to_expiry() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    engine.try_cast(AbilityId::SinisterStrike, &mut rng);
    engine.advance(1.1, &mut rng);
    let outcome = engine.try_cast(AbilityId::Rupture, &mut rng);
    assert!(outcome.used);
    assert!(engine.has_debuff(RUPTURE_EFFECT));

    // 1 combo point: 8s duration, 2s interval = 4 ticks
    let events = engine.advance(8.6, &mut rng);
    let ticks = count_events(&events, |event| {
        matches!(event, CombatEvent::PeriodicDamage { effect, .. } if *effect == RUPTURE_EFFECT)
    });
    let expiries = count_events(&events, |event| {
        matches!(event, CombatEvent::DebuffExpired { effect, .. } if *effect == RUPTURE_EFFECT)
    });

    assert_eq!(ticks, 4);
    assert_eq!(expiries, 1);
    assert!(!engine.has_debuff(RUPTURE_EFFECT));
}

#[test]
fn test_dot_damage_lands_in_statistics() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();
    engine.update_config(&EngineConfigUpdate {
        stats: StatsConfigUpdate {
            hit_chance: Some(100.0),
            ..StatsConfigUpdate::default()
        },
        ..EngineConfigUpdate::default()
    });

    engine.start_combat();
    engine.apply_debuff(EffectSpec {
        tick: Some((1.0, TickAction::Damage { amount: 50.0 })),
        ..EffectSpec::new("test_bleed", "Test Bleed", 4.0)
    });

    let before = engine.stats().total_damage;
    engine.advance(4.0, &mut rng);
    let dot_damage = engine.stats().total_damage - before - engine.stats().auto_attack.damage;

    // 4 ticks of 50
    assert_eq!(dot_damage, 200);
}

#[test]
fn test_energy_restoring_effect() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    engine.try_cast(AbilityId::SinisterStrike, &mut rng); // 100 -> 60
    engine.apply_buff(EffectSpec {
        tick: Some((1.0, TickAction::Energy { amount: 10.0 })),
        ..EffectSpec::new("second_wind", "Second Wind", 3.0)
    });

    let events = engine.advance(1.0, &mut rng);

    // One energy tick (+10) and no regen tick yet (interval 2s)
    assert_eq!(engine.energy(), 70.0);
    assert!(events
        .iter()
        .any(|event| matches!(event, CombatEvent::EnergyRestored { .. })));
}

#[test]
fn test_slice_and_dice_expires_on_schedule() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    engine.try_cast(AbilityId::SinisterStrike, &mut rng);
    engine.advance(1.1, &mut rng);
    engine.try_cast(AbilityId::SliceAndDice, &mut rng);

    // 1 combo point: 9s duration
    let remaining = engine.buff_remaining(SLICE_AND_DICE_EFFECT).unwrap();
    assert!((remaining - 9.0).abs() < 1e-9);

    let events = engine.advance(9.5, &mut rng);
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::BuffExpired { effect, .. } if *effect == SLICE_AND_DICE_EFFECT
    )));
    assert!(!engine.has_buff(SLICE_AND_DICE_EFFECT));
}

// =============================================================================
// 2. Proc behavior through the engine
// =============================================================================

#[test]
fn test_clamped_chance_fires_every_white_hit() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    // 150% clamps to 100%: every white hit procs
    engine.update_proc_config(
        "combat_potency",
        &proc_update(&[("chance", 150.0)], Some(true)),
    );

    engine.start_combat();
    let events = engine.advance(20.0, &mut rng);

    let swings = engine.stats().auto_attack.count as usize;
    let fires = count_events(&events, |event| {
        matches!(event, CombatEvent::ProcTriggered { proc, .. } if *proc == "combat_potency")
    });

    assert!(swings > 0);
    assert_eq!(fires, swings);
}

#[test]
fn test_disabled_proc_never_fires_in_combat() {
    let mut engine = RotationEngine::new(pinned_config());
    let mut rng = test_rng();

    engine.update_proc_config("combat_potency", &proc_update(&[], Some(false)));

    engine.start_combat();
    let events = engine.advance(120.0, &mut rng);

    assert_eq!(
        count_events(&events, |event| {
            matches!(event, CombatEvent::ProcTriggered { proc, .. } if *proc == "combat_potency")
        }),
        0
    );
}

#[test]
fn test_finisher_proc_restores_energy() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    // Guaranteed: 20% x 5 combo points = 100%
    engine.update_proc_config("relentless_strikes", &proc_update(&[], Some(true)));

    // Build 5 combo points, regenerating to full between casts
    for _ in 0..5 {
        engine.try_cast(AbilityId::SinisterStrike, &mut rng);
        engine.advance(4.0, &mut rng);
    }
    assert_eq!(engine.combo_points(), 5);

    let energy_before = engine.energy();
    let outcome = engine.try_cast(AbilityId::Eviscerate, &mut rng);

    assert!(outcome.used);
    assert!(outcome.events.iter().any(|event| matches!(
        event,
        CombatEvent::ProcTriggered { proc, .. } if *proc == "relentless_strikes"
    )));
    // Cost 35, refund 25
    assert_eq!(engine.energy(), energy_before - 35.0 + 25.0);
}

#[test]
fn test_crit_proc_installs_buff() {
    let mut config = pinned_config();
    config.stats.crit_chance = 100.0;
    config.procs.insert(
        "battle_trance".to_string(),
        proc_update(&[("chance", 100.0)], Some(true)),
    );
    let mut engine = RotationEngine::new(config);
    let mut rng = test_rng();

    let outcome = engine.try_cast(AbilityId::SinisterStrike, &mut rng);

    assert!(outcome.events.iter().any(|event| matches!(
        event,
        CombatEvent::ProcTriggered { proc, .. } if *proc == "battle_trance"
    )));
    assert!(engine.has_buff(BATTLE_TRANCE_EFFECT));
}

#[test]
fn test_proc_buff_expires_like_any_effect() {
    let mut config = pinned_config();
    config.stats.crit_chance = 100.0;
    config.procs.insert(
        "battle_trance".to_string(),
        proc_update(&[("chance", 100.0), ("duration", 5.0)], Some(true)),
    );
    let mut engine = RotationEngine::new(config);
    let mut rng = test_rng();

    engine.try_cast(AbilityId::SinisterStrike, &mut rng);
    assert!(engine.has_buff(BATTLE_TRANCE_EFFECT));

    // No further crits: make everything miss so the buff cannot refresh
    engine.update_config(&EngineConfigUpdate {
        stats: StatsConfigUpdate {
            hit_chance: Some(0.0),
            ..StatsConfigUpdate::default()
        },
        ..EngineConfigUpdate::default()
    });
    engine.advance(5.5, &mut rng);

    assert!(!engine.has_buff(BATTLE_TRANCE_EFFECT));
}

// =============================================================================
// 3. Talent interactions
// =============================================================================

#[test]
fn test_shadow_techniques_builds_combo_from_white_hits() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();
    engine.update_config(&EngineConfigUpdate {
        talents: TalentsUpdate {
            shadow_techniques: Some(true),
            ..TalentsUpdate::default()
        },
        ..EngineConfigUpdate::default()
    });

    engine.start_combat();
    let events = engine.advance(120.0, &mut rng);

    // ~60 swings at 30%: combo points accrue without any yellow cast
    assert!(engine.combo_points() > 0);
    assert!(events
        .iter()
        .any(|event| matches!(event, CombatEvent::ComboPointGained { .. })));
}

#[test]
fn test_without_shadow_techniques_white_hits_build_nothing() {
    let mut engine = pinned_engine();
    let mut rng = test_rng();

    engine.start_combat();
    engine.advance(120.0, &mut rng);

    assert_eq!(engine.combo_points(), 0);
}

#[test]
fn test_precision_adds_flat_finisher_damage() {
    let mut baseline = pinned_engine();
    let mut with_talent = pinned_engine();
    let mut rng_a = test_rng();
    let mut rng_b = test_rng();

    with_talent.update_config(&EngineConfigUpdate {
        talents: TalentsUpdate {
            precision: Some(true),
            ..TalentsUpdate::default()
        },
        ..EngineConfigUpdate::default()
    });

    for engine_and_rng in [
        (&mut baseline, &mut rng_a),
        (&mut with_talent, &mut rng_b),
    ] {
        let (engine, rng) = engine_and_rng;
        engine.try_cast(AbilityId::SinisterStrike, rng);
        engine.advance(1.1, rng);
        engine.try_cast(AbilityId::Eviscerate, rng);
    }

    let eviscerate = |engine: &RotationEngine| {
        engine.stats().ability_usage[&AbilityId::Eviscerate].damage
    };

    // Fixed rolls everywhere: the only difference is the +25 flat bonus
    assert_eq!(eviscerate(&with_talent), eviscerate(&baseline) + 25);
}

// =============================================================================
// 4. Proc tuning via the engine config surface
// =============================================================================

#[test]
fn test_proc_tuning_through_engine_config() {
    let mut procs_map = HashMap::new();
    procs_map.insert(
        "combat_potency".to_string(),
        proc_update(&[("energy_restored", 500.0)], Some(true)),
    );
    let config = EngineConfig {
        procs: procs_map,
        ..pinned_config()
    };
    let mut engine = RotationEngine::new(config);
    let mut rng = test_rng();

    // energy_restored clamps to its declared max of 100
    engine.try_cast(AbilityId::SinisterStrike, &mut rng); // 100 -> 60
    engine.start_combat();

    // Drain regen interference: single short advance with one swing window
    let events = engine.advance(2.0, &mut rng);
    let fired = events
        .iter()
        .any(|event| matches!(event, CombatEvent::ProcTriggered { proc, .. } if *proc == "combat_potency"));

    if fired {
        // 60 + 20 regen + clamped 100 would overflow max anyway; the point
        // is that it cannot exceed the configured maximum energy
        assert!(engine.energy() <= engine.max_energy());
    }
}
