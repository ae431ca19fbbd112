//! Defines command-line interface options using `clap` for the dapmap binary.

use clap::{Parser, ValueEnum};

/// Output format for a mapped dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Projection, geometry and one line per band
    Summary,
    /// The full virtual raster as JSON
    Json,
}

/// Map an OPeNDAP dataset onto georeferenced 2D bands
#[derive(Parser, Debug)]
#[command(
    name = "dapmap",
    version,
    about = "Map CF-convention OPeNDAP datasets onto georeferenced 2D raster slices"
)]
pub struct Args {
    /// Dataset locator, e.g. http://server/thredds/dodsC/path/file.nc
    pub locator: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Placeholder emitted for the X axis in subsetting expressions
    #[arg(long, default_value = "x")]
    pub x_placeholder: String,

    /// Placeholder emitted for the Y axis in subsetting expressions
    #[arg(long, default_value = "y")]
    pub y_placeholder: String,

    /// Log filter (e.g. "info", "dapmap=debug")
    #[arg(long, env = "DAPMAP_LOG", default_value = "warn")]
    pub log_level: String,
}
