use clap::Parser;
use firebreak_core::core_types::readings::PartialReadings;
use firebreak_core::{
    seeded_rng, CoreResult, FireSpreadSimulator, FirebreakMode, FirebreakOptimizer, FuelCode,
    FuelGrid, FuelTable, JsonFileStore, OptimizerConfig, RosVariant, SpreadConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Firebreak planning demo on a synthetic landscape
#[derive(Parser, Debug)]
#[command(name = "firebreak-demo")]
#[command(about = "Wildfire spread and firebreak optimization demo", long_about = None)]
struct Args {
    /// Grid size in cells (square grid)
    #[arg(short, long, default_value_t = 30)]
    size: usize,

    /// Ignition column
    #[arg(long, default_value_t = 15)]
    ignite_x: usize,

    /// Ignition row
    #[arg(long, default_value_t = 15)]
    ignite_y: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Spread steps per simulation
    #[arg(short, long, default_value_t = 30)]
    iterations: usize,

    /// Dead fuel moisture (fraction)
    #[arg(short, long, default_value_t = 0.06)]
    moisture: f64,

    /// Wind speed
    #[arg(short, long, default_value_t = 6.0)]
    wind_speed: f64,

    /// Air temperature in °C
    #[arg(short, long, default_value_t = 30.0)]
    temperature: f64,

    /// Annealing iterations (0 = skip optimization)
    #[arg(long, default_value_t = 40)]
    optimize_iters: usize,

    /// Evaluate every candidate with the same RNG seed
    #[arg(long)]
    common_seed: Option<u64>,

    /// Use the binary firebreak model instead of the continuous one
    #[arg(long)]
    binary_firebreaks: bool,

    /// Use the legacy rate-of-spread variant
    #[arg(long)]
    legacy_ros: bool,

    /// Wall-clock budget per spread run in milliseconds
    #[arg(long)]
    max_run_ms: Option<u64>,

    /// Print every frame instead of just the final state
    #[arg(short, long)]
    frames: bool,

    /// Directory to write the best snapshot to
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Banded fuel mosaic over a gentle ridge running north-south
fn synthetic_landscape(args: &Args, table: &FuelTable) -> CoreResult<FuelGrid> {
    let bands: [FuelCode; 6] = [
        "GR2".parse()?,
        "GS2".parse()?,
        "SH5".parse()?,
        "TU1".parse()?,
        "TL8".parse()?,
        "GR4".parse()?,
    ];
    let size = args.size;
    let ridge = size as f64 / 2.0;

    FuelGrid::from_codes(table, size, size, |x, y| {
        let band = (x / 5 + y / 7) % bands.len();
        let code = if (x * 7 + y * 13) % 97 == 0 {
            FuelCode::NON_BURNABLE
        } else {
            bands[band]
        };

        let elevation = 200.0 - 12.0 * (x as f64 - ridge).abs();
        let readings = PartialReadings {
            ambient_moisture: Some(args.moisture + 0.01 * ((x + 2 * y) % 3) as f64),
            temperature: Some(args.temperature),
            wind_speed: Some(args.wind_speed),
            elevation: Some(elevation),
            neighbor_elevation: Some(elevation + 12.0),
            ..Default::default()
        };
        (code, readings)
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> CoreResult<()> {
    println!("=== Firebreak Planning Demo ===\n");

    let table = FuelTable::scott_burgan();
    let grid = synthetic_landscape(args, &table)?;
    println!(
        "Landscape: {}x{} cells, {} burnable",
        grid.width(),
        grid.height(),
        grid.burnable_count()
    );

    let spread = SpreadConfig {
        iterations: args.iterations,
        max_duration: args.max_run_ms.map(Duration::from_millis),
        firebreak_mode: if args.binary_firebreaks {
            FirebreakMode::binary()
        } else {
            FirebreakMode::default()
        },
        ros_variant: if args.legacy_ros {
            RosVariant::Legacy
        } else {
            RosVariant::Canonical
        },
        ..SpreadConfig::default()
    };
    let origin = (args.ignite_x, args.ignite_y);

    // Spread without any firebreak
    let sim = FireSpreadSimulator::new(spread);
    let mut ctx = sim.context(&grid, origin)?;
    let mut rng = seeded_rng(args.seed);
    let frames = sim.run(&grid, &mut ctx, &mut rng);

    if args.frames {
        for (i, frame) in frames.iter().enumerate() {
            println!("Step {}:\n{}", i + 1, frame.render_ascii());
        }
    } else if let Some(last) = frames.last() {
        println!("\nFinal state after {} steps:\n{}", frames.len(), last.render_ascii());
    }
    println!(
        "Unburned: {}/{} cells",
        ctx.fire_state.unburned_count(),
        grid.len()
    );

    if args.optimize_iters == 0 {
        return Ok(());
    }

    println!("\nOptimizing firebreak placement...\n");
    let optimizer = FirebreakOptimizer::new(
        OptimizerConfig {
            max_iterations: args.optimize_iters,
            evaluation_seed: args.common_seed,
            ..OptimizerConfig::default()
        },
        spread,
    )?;
    let result = optimizer.run(&grid, origin, &mut rng)?;

    for record in &result.history {
        println!(
            "[Step {:>2}] T={:.4} {:?} {} attempts={} unburned={}",
            record.iteration,
            record.temperature,
            record.outcome,
            record.params,
            record.attempts,
            record.unburned
        );
    }

    match (&result.best_params, &result.best_snapshot) {
        (Some(params), Some(snapshot)) => {
            println!("\nBest firebreak: {params}");
            println!("Best cost: {:.4}", result.best_cost.unwrap_or_default());
            println!(
                "Unburned area: {}/{} (baseline {})",
                snapshot.fire_state.unburned_count(),
                result.total_cells,
                result.baseline_unburned
            );
            println!(
                "Firebreak area used: {}",
                result.best_firebreak_area.unwrap_or_default()
            );
            println!("\n{}", snapshot.fire_state.render_ascii());

            if let Some(dir) = &args.output {
                let mut store = JsonFileStore::new(dir)?;
                result.persist(&mut store, "best_final_grid")?;
                println!("Snapshot written to {}", dir.join("best_final_grid.json").display());
            }
        }
        _ => println!("\nNo valid firebreak found"),
    }

    Ok(())
}
