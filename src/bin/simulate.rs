//! Rotation DPS simulator CLI.
//!
//! Run Monte Carlo fights to evaluate rotational DPS under a stat and
//! talent configuration.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 100 x 180s fights
//!   cargo run --bin simulate -- -n 20 -d 60           # 20 x 60s fights
//!   cargo run --bin simulate -- --seed 42             # Reproducible run
//!   cargo run --bin simulate -- --precision --lethality
//!   cargo run --bin simulate -- --config build.json   # Partial config file

use rotsim::config::EngineConfigUpdate;
use rotsim::simulator::{run_simulation, SimConfig};
use rotsim::EngineConfig;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let (sim_config, engine_config) = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                  ROTATION DPS SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", sim_config.num_runs);
    println!("  Fight length:   {:.0}s", sim_config.fight_duration);
    println!("  Tick:           {:.2}s", sim_config.tick_delta);
    println!(
        "  Stats:          AP {:.0}, weapon {:.0}-{:.0}, crit {:.0}%, hit {:.0}%",
        engine_config.stats.attack_power,
        engine_config.stats.weapon_min,
        engine_config.stats.weapon_max,
        engine_config.stats.crit_chance,
        engine_config.stats.hit_chance
    );
    println!(
        "  Talents:        precision={} shadow_techniques={} lethality={}",
        engine_config.talents.precision,
        engine_config.talents.shadow_techniques,
        engine_config.talents.lethality
    );
    if let Some(seed) = sim_config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&sim_config, &engine_config);

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "rotation_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, report.to_json()).expect("Failed to write JSON report");
        println!("JSON report saved to: {}", filename);
    }
}

fn parse_args(args: &[String]) -> (SimConfig, EngineConfig) {
    let mut sim_config = SimConfig::default();
    let mut engine_config = EngineConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    sim_config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-d" | "--duration" => {
                if i + 1 < args.len() {
                    sim_config.fight_duration = args[i + 1].parse().unwrap_or(180.0);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    sim_config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--tick" => {
                if i + 1 < args.len() {
                    sim_config.tick_delta = args[i + 1].parse().unwrap_or(0.1);
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    // Partial JSON config merged over the defaults
                    let raw = std::fs::read_to_string(&args[i + 1])
                        .expect("Failed to read config file");
                    let update: EngineConfigUpdate =
                        serde_json::from_str(&raw).expect("Failed to parse config file");
                    engine_config.merge(&update);
                    i += 1;
                }
            }
            "--ap" => {
                if i + 1 < args.len() {
                    if let Ok(value) = args[i + 1].parse::<f64>() {
                        engine_config.stats.attack_power = value;
                        i += 1;
                    }
                }
            }
            "--crit" => {
                if i + 1 < args.len() {
                    if let Ok(value) = args[i + 1].parse::<f64>() {
                        engine_config.stats.crit_chance = value;
                        i += 1;
                    }
                }
            }
            "--hit" => {
                if i + 1 < args.len() {
                    if let Ok(value) = args[i + 1].parse::<f64>() {
                        engine_config.stats.hit_chance = value;
                        i += 1;
                    }
                }
            }
            "--precision" => {
                engine_config.talents.precision = true;
            }
            "--shadow-techniques" => {
                engine_config.talents.shadow_techniques = true;
            }
            "--lethality" => {
                engine_config.talents.lethality = true;
            }
            "-v" | "--verbose" => {
                sim_config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                sim_config.verbosity = 0;
            }
            "--json" => {
                // Handled after the run
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    engine_config.sanitize();
    (sim_config, engine_config)
}

fn print_help() {
    println!("Rotation DPS simulator");
    println!();
    println!("Options:");
    println!("  -n, --runs N          Number of fights (default 100)");
    println!("  -d, --duration SECS   Fight length in seconds (default 180)");
    println!("  -t, --tick SECS       Host tick size (default 0.1)");
    println!("  -s, --seed N          Seed for reproducible runs");
    println!("      --config FILE     Partial engine config JSON merged over defaults");
    println!("      --ap N            Attack power");
    println!("      --crit PCT        Base crit chance");
    println!("      --hit PCT         Base hit chance");
    println!("      --precision       Enable the Precision talent");
    println!("      --shadow-techniques  Enable the Shadow Techniques talent");
    println!("      --lethality       Enable the Lethality talent");
    println!("      --json            Save the full report as JSON");
    println!("  -v, --verbose         Per-run output");
    println!("  -q, --quiet           Summary only");
}
