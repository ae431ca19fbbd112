//! Centralized error handling for dapmap
//!
//! Every stage of the mapping pass reports failures through [`MapperError`].
//! Errors from the NetCDF/OPeNDAP layer are wrapped without translation.

use thiserror::Error;

/// Main error type for dapmap operations
#[derive(Debug, Error)]
pub enum MapperError {
    /// The locator does not point at a remotely addressable dataset
    #[error("not a remote-accessible dataset: '{0}'")]
    NotRemote(String),

    /// Grid mapping family (or PROJ `+proj` value) with no known translation
    #[error("unsupported projection: '{0}'")]
    UnsupportedProjection(String),

    /// A PROJ parameter could not be interpreted
    #[error("invalid projection parameter: {0}")]
    InvalidProjection(String),

    /// Required attribute absent from a variable
    #[error("attribute '{attr}' not found on variable '{var}'")]
    MissingAttribute { var: String, attr: String },

    /// No dimension could be classified for the given axis
    #[error("no spatial dimension found for axis {axis}")]
    NoSpatialDimension { axis: char },

    /// Variable not found in the dataset
    #[error("variable '{var}' not found in dataset")]
    VariableNotFound { var: String },

    /// Dimension not found in variable
    #[error("dimension '{dim}' not found in variable '{var}'")]
    DimensionNotFound { var: String, dim: String },

    /// Coordinate array too short to derive a pixel size
    #[error("coordinate variable '{dim}' has {len} samples, at least 2 are required")]
    MalformedCoordinates { dim: String, len: usize },

    /// Coordinate variable length disagrees with the data variable's axis
    #[error(
        "dimension '{dim}' of variable '{var}' has {axis} elements but its coordinate variable has {coordinate}"
    )]
    ShapeMismatch {
        var: String,
        dim: String,
        coordinate: usize,
        axis: usize,
    },

    /// The raster sink rejected construction or band creation
    #[error("raster sink error: {0}")]
    Sink(String),

    /// NetCDF / OPeNDAP access errors
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dapmap operations
pub type Result<T> = std::result::Result<T, MapperError>;
