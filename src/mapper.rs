//! Mapping pass: dataset -> projection, extent, geotransform and bands
//!
//! [`Mapper::map_dataset`] runs the pure part of the pass on an already
//! captured [`Dataset`]. [`Mapper::open`] adds the remote-locator check and the
//! blocking open, then hands the result to a [`RasterSink`]. Bands are all
//! computed before the sink is constructed, so a failure never leaves a
//! half-populated sink behind.

use crate::bands::{enumerate_all, Placeholders, SliceDescriptor};
use crate::dataset::Dataset;
use crate::dimensions::{select_spatial_dimensions, SpatialDimensions};
use crate::discovery::discover_projection;
use crate::errors::{MapperError, Result};
use crate::geotransform::{geotransform_for, raster_extent};
use crate::projection::{Proj4Wkt, ProjectionDescriptor, WktConverter};
use crate::sink::{RasterSink, RasterSpec};
use tracing::{debug, info};

/// Mapper configuration
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// Locator prefixes accepted as remote datasets
    pub remote_schemes: Vec<String>,
    /// Segments emitted for the X and Y axes in subsetting expressions
    pub placeholders: Placeholders,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            remote_schemes: vec!["http://".to_string(), "https://".to_string()],
            placeholders: Placeholders::default(),
        }
    }
}

/// Result of mapping one dataset
#[derive(Debug, Clone)]
pub struct MappedRaster {
    pub projection: ProjectionDescriptor,
    pub spatial: SpatialDimensions,
    pub spec: RasterSpec,
    pub bands: Vec<SliceDescriptor>,
}

/// Fail unless `locator` starts with one of the remote schemes
pub fn ensure_remote(locator: &str, schemes: &[String]) -> Result<()> {
    if schemes.iter().any(|scheme| locator.starts_with(scheme.as_str())) {
        Ok(())
    } else {
        Err(MapperError::NotRemote(locator.to_string()))
    }
}

/// Runs the mapping pass
pub struct Mapper {
    options: MapperOptions,
    converter: Box<dyn WktConverter>,
}

impl Mapper {
    /// Mapper using the built-in WKT converter
    pub fn new(options: MapperOptions) -> Self {
        Self::with_converter(options, Box::new(Proj4Wkt))
    }

    pub fn with_converter(options: MapperOptions, converter: Box<dyn WktConverter>) -> Self {
        Self { options, converter }
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Map a captured dataset. `locator` is the base of every subsetting
    /// expression.
    pub fn map_dataset(&self, locator: &str, dataset: &Dataset) -> Result<MappedRaster> {
        let projection = discover_projection(dataset, self.converter.as_ref())?;
        let spatial = select_spatial_dimensions(dataset)?;
        let (raster_x_size, raster_y_size) = raster_extent(dataset, &spatial)?;
        let geotransform = geotransform_for(dataset, &spatial)?;
        debug!(?geotransform, raster_x_size, raster_y_size, "derived raster geometry");

        let bands = enumerate_all(locator, dataset, &spatial, &self.options.placeholders)?;
        info!(locator, bands = bands.len(), "mapped dataset");

        Ok(MappedRaster {
            spec: RasterSpec {
                geotransform,
                projection: projection.wkt.clone(),
                raster_x_size,
                raster_y_size,
            },
            projection,
            spatial,
            bands,
        })
    }

    /// Construct a sink from a mapped raster and add its bands
    pub fn build_sink<S: RasterSink>(&self, mapped: MappedRaster) -> Result<S> {
        let mut sink = S::create(mapped.spec)?;
        sink.create_bands(mapped.bands)?;
        Ok(sink)
    }

    /// Full pass over a remote dataset
    pub fn open<S: RasterSink>(&self, locator: &str) -> Result<S> {
        ensure_remote(locator, &self.options.remote_schemes)?;
        let dataset = Dataset::open_remote(locator)?;
        let mapped = self.map_dataset(locator, &dataset)?;
        self.build_sink(mapped)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(MapperOptions::default())
    }
}
