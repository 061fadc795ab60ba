//! Render a serialized world from stdin to a PNG

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use torus_world::export::{read_world, write_world};
use torus_world::map_export::save_png;

#[derive(Parser, Debug)]
#[command(name = "render_world")]
#[command(about = "Read a world from stdin and save it as a PNG")]
struct Args {
    /// Output image path
    #[arg(short, long, default_value = "world.png")]
    output: PathBuf,

    /// Shade by liquid floor instead of surface
    #[arg(short, long)]
    depth: bool,

    /// Echo the world to stdout
    #[arg(short, long)]
    echo: bool,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let world = read_world(io::stdin().lock())?;
    tracing::info!(width = world.width(), height = world.height(), "read world");

    save_png(&world, &args.output, args.depth)?;
    tracing::info!(path = %args.output.display(), "wrote image");

    if args.echo {
        let mut out = BufWriter::new(io::stdout().lock());
        write_world(&world, &mut out)?;
        out.flush()?;
    }
    Ok(())
}
