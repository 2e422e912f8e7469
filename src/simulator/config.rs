//! Simulation configuration.

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent fights to simulate
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Length of each fight in seconds
    pub fight_duration: f64,

    /// Host tick size in seconds (the per-frame delta fed to the engine)
    pub tick_delta: f64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per-run lines)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            fight_duration: 180.0,
            tick_delta: 0.1,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for sanity-checking a build.
    pub fn smoke_test() -> Self {
        Self {
            num_runs: 5,
            fight_duration: 30.0,
            verbosity: 0,
            ..Default::default()
        }
    }

    /// Long single-target fight for steady-state DPS numbers.
    pub fn long_fight(fight_duration: f64) -> Self {
        Self {
            num_runs: 50,
            fight_duration,
            ..Default::default()
        }
    }
}
