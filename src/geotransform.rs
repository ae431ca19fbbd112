//! Affine geotransform derivation from coordinate variables
//!
//! Grids are assumed to be axis-aligned and regularly spaced; only the first
//! two samples of each coordinate axis are used.

use crate::dataset::Dataset;
use crate::dimensions::SpatialDimensions;
use crate::errors::{MapperError, Result};
use ndarray::ArrayView1;
use serde::Serialize;

/// Six-parameter affine transform from pixel to projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Derive the transform from the X and Y coordinate samples
    pub fn from_coordinates(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<Self> {
        Self::from_named_axes(("x", x), ("y", y))
    }

    /// Same as [`GeoTransform::from_coordinates`], reporting errors against
    /// the given dimension names
    fn from_named_axes(x: (&str, ArrayView1<f64>), y: (&str, ArrayView1<f64>)) -> Result<Self> {
        let (origin_x, pixel_width) = origin_and_step(x.0, x.1)?;
        let (origin_y, pixel_height) = origin_and_step(y.0, y.1)?;
        Ok(Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            column_rotation: 0.0,
            pixel_height,
        })
    }

    /// Coefficients in GDAL order
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.column_rotation,
            self.pixel_height,
        ]
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(gt: GeoTransform) -> Self {
        gt.to_array()
    }
}

fn origin_and_step(dim: &str, coords: ArrayView1<f64>) -> Result<(f64, f64)> {
    if coords.len() < 2 {
        return Err(MapperError::MalformedCoordinates {
            dim: dim.to_string(),
            len: coords.len(),
        });
    }
    Ok((coords[0], coords[1] - coords[0]))
}

/// Read the geotransform from the dataset's X and Y coordinate variables
pub fn geotransform_for(dataset: &Dataset, spatial: &SpatialDimensions) -> Result<GeoTransform> {
    let coordinates = |dim: &str| {
        let var = dataset
            .variable(dim)
            .ok_or_else(|| MapperError::VariableNotFound {
                var: dim.to_string(),
            })?;
        var.values().ok_or_else(|| MapperError::MalformedCoordinates {
            dim: dim.to_string(),
            len: 0,
        })
    };

    GeoTransform::from_named_axes(
        (&spatial.x, coordinates(&spatial.x)?.view()),
        (&spatial.y, coordinates(&spatial.y)?.view()),
    )
}

/// Raster size `(columns, rows)` from the first data variable
pub fn raster_extent(dataset: &Dataset, spatial: &SpatialDimensions) -> Result<(usize, usize)> {
    let var = dataset
        .data_variables()
        .next()
        .ok_or(MapperError::NoSpatialDimension { axis: 'x' })?;

    let axis_len = |dim: &str| {
        var.dimension_index(dim)
            .map(|i| var.shape()[i])
            .ok_or_else(|| MapperError::DimensionNotFound {
                var: var.name().to_string(),
                dim: dim.to_string(),
            })
    };

    Ok((axis_len(&spatial.x)?, axis_len(&spatial.y)?))
}
