//! Combat events produced by the engine.
//!
//! Every outcome of a tick or a cast is reported as a [`CombatEvent`]
//! carrying a preformatted `message` for the presentation layer's combat
//! log. The engine never touches UI types; the host decides how (and
//! whether) to display each event.

use crate::abilities::AbilityId;
use crate::effects::EffectId;

/// A single event produced by `advance` or `try_cast`.
#[derive(Debug, Clone)]
pub enum CombatEvent {
    // ── Combat flow ─────────────────────────────────────────────
    /// Combat started (explicitly or auto-started by a cast).
    CombatStarted { message: String },

    /// Combat stopped; a session record was captured.
    CombatEnded { message: String },

    /// The target's health reached zero.
    TargetDefeated { message: String },

    // ── Casts ───────────────────────────────────────────────────
    /// A cast failed validation (energy, global cooldown, or cooldown).
    /// No state was mutated.
    CastRejected { ability: AbilityId, message: String },

    /// A handler signalled a resource-precondition failure; the energy
    /// cost was refunded and no cooldown was armed.
    CastRolledBack { ability: AbilityId, message: String },

    /// An ability attack landed.
    AbilityHit {
        ability: AbilityId,
        damage: u64,
        crit: bool,
        message: String,
    },

    /// An ability attack missed. The cast is still committed: energy was
    /// spent and cooldowns were armed.
    AbilityMiss { ability: AbilityId, message: String },

    // ── Auto attacks ────────────────────────────────────────────
    /// An auto attack landed.
    AutoAttackHit {
        damage: u64,
        crit: bool,
        message: String,
    },

    /// An auto attack missed.
    AutoAttackMiss { message: String },

    // ── Effects ─────────────────────────────────────────────────
    /// A buff was applied (re-application replaces the prior instance).
    BuffApplied { effect: EffectId, message: String },

    /// A buff ran out or was removed early.
    BuffExpired { effect: EffectId, message: String },

    /// A debuff was applied to the target.
    DebuffApplied { effect: EffectId, message: String },

    /// A debuff ran out or was removed early.
    DebuffExpired { effect: EffectId, message: String },

    /// A damage-over-time effect ticked.
    PeriodicDamage {
        effect: EffectId,
        damage: u64,
        message: String,
    },

    // ── Procs and resources ─────────────────────────────────────
    /// A chance-based secondary effect fired. `flash` is a short
    /// transient text for on-screen feedback.
    ProcTriggered {
        proc: &'static str,
        message: String,
        flash: String,
    },

    /// A combo point was gained outside normal ability generation
    /// (talent or proc).
    ComboPointGained { total: u32, message: String },

    /// Energy was restored by a proc.
    EnergyRestored { amount: f64, message: String },
}

impl CombatEvent {
    /// The log message for this event.
    pub fn message(&self) -> &str {
        match self {
            CombatEvent::CombatStarted { message }
            | CombatEvent::CombatEnded { message }
            | CombatEvent::TargetDefeated { message }
            | CombatEvent::CastRejected { message, .. }
            | CombatEvent::CastRolledBack { message, .. }
            | CombatEvent::AbilityHit { message, .. }
            | CombatEvent::AbilityMiss { message, .. }
            | CombatEvent::AutoAttackHit { message, .. }
            | CombatEvent::AutoAttackMiss { message }
            | CombatEvent::BuffApplied { message, .. }
            | CombatEvent::BuffExpired { message, .. }
            | CombatEvent::DebuffApplied { message, .. }
            | CombatEvent::DebuffExpired { message, .. }
            | CombatEvent::PeriodicDamage { message, .. }
            | CombatEvent::ProcTriggered { message, .. }
            | CombatEvent::ComboPointGained { message, .. }
            | CombatEvent::EnergyRestored { message, .. } => message,
        }
    }
}
