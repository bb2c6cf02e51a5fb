//! Gray-Scott CLI - Run simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use gray_scott::{
    schema::{ChannelMix, ParamPreset, SessionRecord, SimulationConfig},
    session::Session,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let mut args: Vec<String> = std::env::args().collect();

    // Optional --seed N anywhere on the line.
    let mut rng_seed: Option<u64> = None;
    if let Some(pos) = args.iter().position(|a| a == "--seed") {
        rng_seed = args.get(pos + 1).and_then(|s| s.parse().ok());
        let end = (pos + 2).min(args.len());
        args.drain(pos..end);
    }

    // Optional --preset NAME, overrides the config's reaction parameters.
    let mut preset: Option<ParamPreset> = None;
    if let Some(pos) = args.iter().position(|a| a == "--preset") {
        let name = args.get(pos + 1).cloned().unwrap_or_default();
        preset = match name.parse() {
            Ok(p) => Some(p),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Known presets: {}", preset_names().join(", "));
                std::process::exit(1);
            }
        };
        let end = (pos + 2).min(args.len());
        args.drain(pos..end);
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks] [--seed N] [--preset NAME]", args[0]);
        eprintln!();
        eprintln!("Run a Gray-Scott simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json    Path to simulation configuration file");
        eprintln!("  ticks          Number of render ticks to simulate (default: 100)");
        eprintln!("  --seed N       Entropy for the random seed pattern (default: fresh)");
        eprintln!("  --preset NAME  Feed/kill preset ({})", preset_names().join(", "));
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });
    if let Some(preset) = preset {
        config.params = preset.parameters();
    }

    let rng_seed = rng_seed.unwrap_or_else(rand::random);
    let mut session = Session::with_rng_seed(&config, rng_seed).unwrap_or_else(|e| {
        eprintln!("Error creating session: {}", e);
        std::process::exit(1);
    });

    println!("Gray-Scott Simulation");
    println!("=====================");
    println!("Grid: {}x{} (toroidal)", config.width, config.height);
    println!(
        "Params: du={} dv={} feed={} kill={}",
        config.params.du, config.params.dv, config.params.feed, config.params.kill
    );
    println!("Seed pattern: {}", config.seed_pattern);
    println!(
        "Ticks: {} ({} steps each, dt={})",
        ticks, config.steps_per_tick, config.dt
    );
    println!();

    let initial_stats = session.stats();
    println!("Initial state:");
    println!("  Active cells: {}", initial_stats.active_cells);
    println!(
        "  u range: [{:.6}, {:.6}]  v range: [{:.6}, {:.6}]",
        initial_stats.min_u, initial_stats.max_u, initial_stats.min_v, initial_stats.max_v
    );
    println!();

    // Run simulation
    println!("Running simulation...");
    let start = Instant::now();
    let mut token = session.play();

    for i in 0..ticks {
        token = match session.tick(token) {
            Some(next) => next,
            None => break,
        };

        // Print progress every 10%
        if (i + 1) % (ticks / 10).max(1) == 0 {
            let stats = session.stats();
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = session.steps_total() as f32 / elapsed;
            println!(
                "  Tick {}/{}: step={}, active={}, mean_v={:.6}, {:.1} steps/s",
                i + 1,
                ticks,
                session.steps_total(),
                stats.active_cells,
                stats.mean_v,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = session.stats();

    println!();
    println!("Final state:");
    println!("  Steps: {}", session.steps_total());
    println!("  Active cells: {}", final_stats.active_cells);
    println!(
        "  u range: [{:.6}, {:.6}]  v range: [{:.6}, {:.6}]",
        final_stats.min_u, final_stats.max_u, final_stats.min_v, final_stats.max_v
    );
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        session.steps_total() as f32 / elapsed.as_secs_f32()
    );
}

fn preset_names() -> Vec<&'static str> {
    ParamPreset::ALL.iter().map(|p| p.name()).collect()
}

fn print_example_config() {
    let config = SimulationConfig::default();
    let record = SessionRecord::from_config(&config, ChannelMix::default());

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example settings record (as written by hosts):");
    println!("{}", serde_json::to_string_pretty(&record).unwrap());
    println!();
    println!("Presets (--preset NAME):");
    for preset in ParamPreset::ALL {
        let p = preset.parameters();
        println!("  {:<13} feed={:.3} kill={:.3}", preset.name(), p.feed, p.kill);
    }
}
