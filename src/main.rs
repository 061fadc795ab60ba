use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use torus_world::export::write_world;
use torus_world::generator::generate;
use torus_world::map_export::save_png;
use torus_world::params::GenParams;
use torus_world::seeds::WorldSeeds;

#[derive(Parser, Debug)]
#[command(name = "torus_world")]
#[command(about = "Generate a wrap-around terrain map and write it to stdout")]
struct Args {
    /// World width in cells
    #[arg(short = 'W', long, default_value = "500")]
    width: usize,

    /// World height in cells
    #[arg(short = 'H', long, default_value = "500")]
    height: usize,

    /// Random seed (0 uses the current time)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Override the seed of a single stage (heightmap, oceans, lakes,
    /// growth, rivers or start), e.g. `--stage-seed rivers=7`. Repeatable.
    #[arg(long = "stage-seed", value_name = "STAGE=SEED", value_parser = parse_stage_seed)]
    stage_seeds: Vec<(Stage, u64)>,

    /// JSON file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also render the world to a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Shade the PNG by liquid floor instead of surface
    #[arg(long)]
    depth_png: bool,

    /// Write generation statistics as JSON
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the effective parameters as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let params = match &args.config {
        Some(path) => GenParams::load(path)?,
        None => GenParams::default(),
    };

    if args.dump_config {
        println!("{}", params.to_json()?);
        return Ok(());
    }

    if args.width == 0 || args.height == 0 {
        return Err("width and height must be positive".into());
    }

    let seed = if args.seed == 0 { time_seed() } else { args.seed };
    let mut builder = WorldSeeds::builder(seed);
    for &(stage, value) in &args.stage_seeds {
        builder = match stage {
            Stage::Heightmap => builder.heightmap(value),
            Stage::Oceans => builder.oceans(value),
            Stage::Lakes => builder.lakes(value),
            Stage::Growth => builder.growth(value),
            Stage::Rivers => builder.rivers(value),
            Stage::Start => builder.start(value),
        };
    }
    let seeds = builder.build();
    tracing::info!(seed, width = args.width, height = args.height, "generating world");
    tracing::debug!("{}", seeds);

    let total = Instant::now();
    let (world, stats) = generate(args.width, args.height, &seeds, &params);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_world(&world, &mut out)?;
    out.flush()?;

    if let Some(path) = &args.png {
        save_png(&world, path, args.depth_png)?;
        tracing::info!(path = %path.display(), "wrote image");
    }

    if let Some(path) = &args.stats {
        fs::write(path, stats.to_json()?)?;
        tracing::info!(path = %path.display(), "wrote statistics");
    }

    tracing::info!(elapsed_ms = total.elapsed().as_millis() as u64, "total time");
    for share in stats.terrain.iter().filter(|s| s.cells > 0) {
        tracing::info!("{:.2}% {}", share.percent, share.terrain);
    }
    if let Some((x, y)) = stats.start {
        tracing::info!(x, y, "start location");
    }

    Ok(())
}

/// Generation stage whose seed can be overridden
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Stage {
    Heightmap,
    Oceans,
    Lakes,
    Growth,
    Rivers,
    Start,
}

fn parse_stage_seed(s: &str) -> Result<(Stage, u64), String> {
    let (stage, seed) = s.split_once('=').ok_or_else(|| format!("expected STAGE=SEED, got {:?}", s))?;
    let stage = Stage::from_str(stage, true)?;
    let seed = seed.parse().map_err(|e| format!("bad seed {:?}: {}", seed, e))?;
    Ok((stage, seed))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_seed_overrides() {
        let args = Args::parse_from(["torus_world", "--stage-seed", "rivers=7", "--stage-seed", "Lakes=9"]);
        assert_eq!(args.stage_seeds, vec![(Stage::Rivers, 7), (Stage::Lakes, 9)]);
        assert!(parse_stage_seed("rivers").is_err());
        assert!(parse_stage_seed("volcanoes=1").is_err());
        assert!(parse_stage_seed("start=x").is_err());
    }
}
