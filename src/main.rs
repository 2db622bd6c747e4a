use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process::ExitCode;

mod ascii;
mod biomes;
mod climate;
mod elevation;
mod hydrology;
mod noise;
mod params;
mod rivers;
mod tilemap;
mod topology;
mod world;

use ascii::AsciiMode;
use params::WorldParams;

#[derive(Parser, Debug)]
#[command(name = "planetmap")]
#[command(about = "Generate procedural tile-based planetary maps")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// Height of the map in tiles
    #[arg(short = 'H', long, default_value = "64")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Target fraction of ocean tiles
    #[arg(short = 'o', long, default_value = "0.6")]
    ocean_fraction: f32,

    /// Noise units spanned by the longer axis (higher = busier terrain)
    #[arg(short = 'n', long, default_value = "2.0")]
    noise_scale: f32,

    /// Disable toroidal wrap on the X axis
    #[arg(long)]
    no_wrap_x: bool,

    /// Enable toroidal wrap on the Y axis
    #[arg(long)]
    wrap_y: bool,

    /// Westward-rotating planet (swaps wind directions)
    #[arg(long)]
    rotate_west: bool,

    /// ASCII view: types, elevation, temperature, rainfall, rivers
    #[arg(short = 'v', long, default_value = "types")]
    view: String,

    /// Export the full world as JSON to this path
    #[arg(long)]
    export: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(mode) = AsciiMode::parse(&args.view) else {
        eprintln!("Unknown view '{}'", args.view);
        return ExitCode::FAILURE;
    };

    let mut params = WorldParams::default();
    params.width = args.width;
    params.height = args.height;
    params.ocean_fraction = args.ocean_fraction;
    params.noise_scale = args.noise_scale;
    params.wrap_x = !args.no_wrap_x;
    params.wrap_y = args.wrap_y;
    params.rotate_west = args.rotate_west;

    println!("Generating {}x{} map...", params.width, params.height);
    let world = world::generate(&params, args.seed);

    for warning in &world.warnings {
        println!("Warning: {}: {}", warning.field, warning.message);
    }
    println!("Seed: {}", world.seed);
    println!(
        "Ocean: {:.1}% of tiles (target {:.1}%)",
        100.0 * world.ocean_fraction(),
        100.0 * world.params.ocean_fraction as f64
    );

    let mut min_temp = f32::MAX;
    let mut max_temp = f32::MIN;
    let mut max_elev = f32::MIN;
    for (_, _, tile) in world.tiles.iter() {
        min_temp = min_temp.min(tile.temperature);
        max_temp = max_temp.max(tile.temperature);
        max_elev = max_elev.max(tile.elevation);
    }
    println!(
        "Temperature: {:.1}°C to {:.1}°C, peak elevation {:.0}m",
        min_temp, max_temp, max_elev
    );
    println!("River corners: {}", world.rivers.len());

    let mut counts = vec![0usize; world.params.tile_types.len()];
    let mut unmatched = 0usize;
    for (_, _, tile) in world.tiles.iter() {
        match tile.tile_type {
            Some(idx) => counts[idx] += 1,
            None => unmatched += 1,
        }
    }
    for (idx, tile_type) in world.params.tile_types.iter().enumerate() {
        if counts[idx] > 0 {
            println!("  {:12} {:6} tiles", tile_type.name, counts[idx]);
        }
    }
    if unmatched > 0 {
        println!("  {:12} {:6} tiles", "(unmatched)", unmatched);
    }

    println!();
    print!("{}", ascii::render(&world, mode));

    if let Some(path) = &args.export {
        match export_json(&world, path) {
            Ok(()) => println!("Exported world to {}", path),
            Err(e) => {
                eprintln!("Export failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn export_json(world: &world::WorldData, path: &str) -> std::io::Result<()> {
    let json = serde_json::to_string(&world.to_export())?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())
}
