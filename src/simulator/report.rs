//! Simulation report generation.

use super::runner::RunStats;
use crate::abilities::AbilityId;
use serde::Serialize;

/// Per-source damage breakdown averaged across runs.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityBreakdown {
    pub source: String,
    pub avg_count: f64,
    pub avg_damage: f64,
    pub damage_share_percent: f64,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,

    // Aggregated stats
    pub avg_dps: f64,
    pub min_dps: f64,
    pub max_dps: f64,
    pub avg_total_damage: f64,
    pub avg_fight_duration: f64,
    pub avg_casts: f64,
    pub avg_proc_fires: f64,
    pub crit_rate_percent: f64,
    pub miss_rate_percent: f64,

    // Damage breakdown by source
    pub breakdown: Vec<AbilityBreakdown>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let denom = num_runs.max(1) as f64;

        let avg_dps = runs.iter().map(|r| r.dps).sum::<f64>() / denom;
        let min_dps = runs.iter().map(|r| r.dps).fold(f64::INFINITY, f64::min);
        let max_dps = runs.iter().map(|r| r.dps).fold(0.0, f64::max);
        let avg_total_damage = runs.iter().map(|r| r.total_damage as f64).sum::<f64>() / denom;
        let avg_fight_duration = runs.iter().map(|r| r.duration).sum::<f64>() / denom;
        let avg_casts = runs.iter().map(|r| r.casts as f64).sum::<f64>() / denom;
        let avg_proc_fires = runs.iter().map(|r| r.proc_fires as f64).sum::<f64>() / denom;

        let total_hits: u64 = runs.iter().map(|r| r.hits).sum();
        let total_crits: u64 = runs.iter().map(|r| r.crits).sum();
        let total_misses: u64 = runs.iter().map(|r| r.misses).sum();
        let total_attacks = total_hits + total_misses;
        let crit_rate_percent = if total_hits > 0 {
            total_crits as f64 / total_hits as f64 * 100.0
        } else {
            0.0
        };
        let miss_rate_percent = if total_attacks > 0 {
            total_misses as f64 / total_attacks as f64 * 100.0
        } else {
            0.0
        };

        // Damage breakdown: one row per ability plus auto attacks
        let mut breakdown = Vec::new();
        for id in AbilityId::ALL {
            let (count, damage) = runs
                .iter()
                .filter_map(|r| r.ability_usage.get(&id))
                .fold((0u64, 0u64), |(c, d), usage| {
                    (c + usage.count, d + usage.damage)
                });
            if count == 0 {
                continue;
            }
            breakdown.push(AbilityBreakdown {
                source: id.name().to_string(),
                avg_count: count as f64 / denom,
                avg_damage: damage as f64 / denom,
                damage_share_percent: share(damage as f64 / denom, avg_total_damage),
            });
        }
        let auto_count: u64 = runs.iter().map(|r| r.auto_attack.count).sum();
        let auto_damage: u64 = runs.iter().map(|r| r.auto_attack.damage).sum();
        if auto_count > 0 {
            breakdown.push(AbilityBreakdown {
                source: "Auto Attack".to_string(),
                avg_count: auto_count as f64 / denom,
                avg_damage: auto_damage as f64 / denom,
                damage_share_percent: share(auto_damage as f64 / denom, avg_total_damage),
            });
        }
        breakdown.sort_by(|a, b| {
            b.avg_damage
                .partial_cmp(&a.avg_damage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            num_runs,
            avg_dps,
            min_dps: if min_dps.is_finite() { min_dps } else { 0.0 },
            max_dps,
            avg_total_damage,
            avg_fight_duration,
            avg_casts,
            avg_proc_fires,
            crit_rate_percent,
            miss_rate_percent,
            breakdown,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    ROTATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} x {:.0}s fights\n\n",
            self.num_runs, self.avg_fight_duration
        ));

        report.push_str(&format!(
            "DPS:        avg {:.1}  (min {:.1}, max {:.1})\n",
            self.avg_dps, self.min_dps, self.max_dps
        ));
        report.push_str(&format!(
            "Damage:     avg {:.0} per fight\n",
            self.avg_total_damage
        ));
        report.push_str(&format!(
            "Casts:      avg {:.1}, procs avg {:.1}\n",
            self.avg_casts, self.avg_proc_fires
        ));
        report.push_str(&format!(
            "Crit rate:  {:.1}%   Miss rate: {:.1}%\n\n",
            self.crit_rate_percent, self.miss_rate_percent
        ));

        report.push_str("Damage breakdown:\n");
        report.push_str("  Source            Count    Damage     Share\n");
        report.push_str("  ───────────────── ──────── ────────── ──────\n");
        for row in &self.breakdown {
            report.push_str(&format!(
                "  {:<17} {:>8.1} {:>10.0} {:>5.1}%\n",
                row.source, row.avg_count, row.avg_damage, row.damage_share_percent
            ));
        }

        report
    }

    /// Serialize the full report (including per-run stats) as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("report serializes")
    }
}

fn share(damage: f64, total: f64) -> f64 {
    if total > 0.0 {
        damage / total * 100.0
    } else {
        0.0
    }
}
