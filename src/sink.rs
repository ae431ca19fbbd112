//! Raster sink construction contract
//!
//! A sink is created from a [`RasterSpec`] and then receives every slice
//! descriptor in one bulk call. [`VirtualRaster`] keeps everything in memory
//! and can be serialized for inspection.

use crate::bands::SliceDescriptor;
use crate::errors::{MapperError, Result};
use crate::geotransform::GeoTransform;
use serde::Serialize;

/// Everything a sink needs at construction time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterSpec {
    pub geotransform: GeoTransform,
    /// Projection as WKT, empty when the dataset is not georeferenced
    pub projection: String,
    pub raster_x_size: usize,
    pub raster_y_size: usize,
}

/// Destination for mapped rasters
pub trait RasterSink: Sized {
    fn create(spec: RasterSpec) -> Result<Self>;

    /// Add bands in the given order
    fn create_bands(&mut self, bands: Vec<SliceDescriptor>) -> Result<()>;
}

/// In-memory raster description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualRaster {
    spec: RasterSpec,
    bands: Vec<SliceDescriptor>,
}

impl VirtualRaster {
    pub fn spec(&self) -> &RasterSpec {
        &self.spec
    }

    pub fn bands(&self) -> &[SliceDescriptor] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Band by 1-based number
    pub fn band(&self, number: usize) -> Option<&SliceDescriptor> {
        number.checked_sub(1).and_then(|i| self.bands.get(i))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RasterSink for VirtualRaster {
    fn create(spec: RasterSpec) -> Result<Self> {
        if spec.raster_x_size == 0 || spec.raster_y_size == 0 {
            return Err(MapperError::Sink(format!(
                "invalid raster size {}x{}",
                spec.raster_x_size, spec.raster_y_size
            )));
        }
        Ok(Self {
            spec,
            bands: Vec::new(),
        })
    }

    fn create_bands(&mut self, bands: Vec<SliceDescriptor>) -> Result<()> {
        self.bands.extend(bands);
        Ok(())
    }
}
