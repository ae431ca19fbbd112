//! Entry point for the dapmap binary.
//! Parses the CLI, sets up logging, maps the dataset and prints the result.

use clap::Parser;
use dapmap::prelude::*;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, OutputFormat};

fn print_summary(raster: &VirtualRaster) {
    let spec = raster.spec();

    println!("\n Raster");
    println!("==========");
    println!("    Size: {} x {}", spec.raster_x_size, spec.raster_y_size);
    println!("    GeoTransform: {:?}", spec.geotransform.to_array());
    if spec.projection.is_empty() {
        println!("    Projection: (none)");
    } else {
        println!("    Projection: {}", spec.projection);
    }

    println!("\n Bands ({})", raster.band_count());
    println!("==========");
    for (i, band) in raster.bands().iter().enumerate() {
        let label = band
            .metadata
            .get("wkv")
            .unwrap_or(&band.variable);
        println!("    {:>4}  {:<30} {}", i + 1, label, band.source);
    }
}

fn run(args: &Args) -> Result<()> {
    let options = MapperOptions {
        placeholders: Placeholders {
            x: args.x_placeholder.clone(),
            y: args.y_placeholder.clone(),
        },
        ..MapperOptions::default()
    };

    let raster: VirtualRaster = Mapper::new(options).open(&args.locator)?;

    match args.format {
        OutputFormat::Summary => print_summary(&raster),
        OutputFormat::Json => println!("{}", raster.to_json()?),
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    run(&args)?;
    Ok(())
}
