//! Projection handling
//!
//! - [`grid_mapping`]: CF grid-mapping attributes to PROJ strings
//! - [`wkt`]: PROJ strings to well-known text

pub mod grid_mapping;
pub mod wkt;

pub use grid_mapping::{proj4_from_variable, GridMappingSpec, GRID_MAPPINGS};
pub use wkt::{Proj4Wkt, WktConverter};

use crate::errors::Result;
use serde::Serialize;

/// A dataset's projection as PROJ string and WKT
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionDescriptor {
    pub proj4: String,
    pub wkt: String,
}

impl ProjectionDescriptor {
    /// No georeferencing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_proj4(proj4: String, converter: &dyn WktConverter) -> Result<Self> {
        let wkt = converter.to_wkt(&proj4)?;
        Ok(Self { proj4, wkt })
    }

    pub fn is_empty(&self) -> bool {
        self.proj4.is_empty()
    }
}
