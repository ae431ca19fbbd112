//! dapmap: CF-convention OPeNDAP datasets as georeferenced 2D raster slices
//!
//! dapmap reads the metadata of a remote gridded dataset and describes it as a
//! virtual raster: a projection, a raster size, an affine geotransform and one
//! band per 2D slice of every georeferenced variable. Each band carries an
//! OPeNDAP subsetting expression that retrieves just that slice.
//!
//! ## Module Organization
//!
//! - [`dataset`]: immutable snapshot of the dataset's variables and attributes
//! - [`projection`]: CF grid mappings to PROJ strings and WKT
//! - [`discovery`]: finding the grid-mapping variable
//! - [`dimensions`]: X/Y/other role assignment for dimensions
//! - [`geotransform`]: affine transform and raster extent
//! - [`bands`]: slice enumeration and subsetting expressions
//! - [`sink`]: raster sink contract and the in-memory [`VirtualRaster`]
//! - [`mapper`]: the full mapping pass
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dapmap::prelude::*;
//!
//! let mapper = Mapper::default();
//! let raster: VirtualRaster = mapper
//!     .open("http://thredds.met.no/thredds/dodsC/osisaf/met.no/ice/conc/ice_conc_nh.nc")
//!     .unwrap();
//!
//! for band in raster.bands() {
//!     println!("{}", band.source);
//! }
//! ```

pub mod bands;
pub mod dataset;
pub mod dimensions;
pub mod discovery;
pub mod errors;
pub mod geotransform;
pub mod mapper;
pub mod projection;
pub mod sink;

pub use errors::{MapperError, Result};
pub use sink::VirtualRaster;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::bands::{Placeholders, SliceDescriptor};
    pub use crate::dataset::{AttributeValue, Dataset, Variable};
    pub use crate::dimensions::{DimensionRole, SpatialDimensions};
    pub use crate::errors::{MapperError, Result};
    pub use crate::geotransform::GeoTransform;
    pub use crate::mapper::{MappedRaster, Mapper, MapperOptions};
    pub use crate::projection::{ProjectionDescriptor, Proj4Wkt, WktConverter};
    pub use crate::sink::{RasterSink, RasterSpec, VirtualRaster};
}
