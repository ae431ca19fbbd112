//! Enumeration of 2D slices over the non-spatial dimensions of data variables
//!
//! Every data variable becomes one band per combination of indices along its
//! non-X/Y dimensions. Each band is addressed by an OPeNDAP constraint
//! expression of the form `<locator>?<var>.<var>[x][y][3]`, with one
//! bracketed segment per declared dimension.

use crate::dataset::{Dataset, Variable};
use crate::dimensions::{DimensionRole, SpatialDimensions};
use crate::errors::{MapperError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Band index inside a single-variable OPeNDAP slice
pub const SOURCE_BAND: usize = 1;

/// Placeholder segments for the spatial axes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub x: String,
    pub y: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

/// One addressable 2D slice of a data variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceDescriptor {
    /// Data variable the slice comes from
    pub variable: String,
    /// Indices along the variable's non-spatial dimensions
    pub indices: Vec<usize>,
    /// Remote subsetting expression
    pub source: String,
    pub source_band: usize,
    /// Band metadata for the raster sink
    pub metadata: BTreeMap<String, String>,
}

/// Row-major (C-order) unraveling of `flat` against `shape`
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    for (slot, &size) in indices.iter_mut().zip(shape).rev() {
        if size == 0 {
            continue;
        }
        *slot = flat % size;
        flat /= size;
    }
    indices
}

/// Sizes of the variable's non-spatial dimensions, `[1]` if there are none.
///
/// Sizes come from each dimension's coordinate variable when one exists and
/// must agree with the variable's own axis length.
pub fn non_spatial_shape(
    dataset: &Dataset,
    var: &Variable,
    spatial: &SpatialDimensions,
) -> Result<Vec<usize>> {
    let mut shape = Vec::new();

    for (dim, &axis) in var.dimensions().iter().zip(var.shape()) {
        if spatial.is_spatial(dim) {
            continue;
        }
        let size = match dataset.variable(dim) {
            Some(coord) if coord.is_coordinate_variable() => {
                if coord.len() != axis {
                    return Err(MapperError::ShapeMismatch {
                        var: var.name().to_string(),
                        dim: dim.clone(),
                        coordinate: coord.len(),
                        axis,
                    });
                }
                coord.len()
            }
            _ => axis,
        };
        shape.push(size);
    }

    if shape.is_empty() {
        shape.push(1);
    }
    Ok(shape)
}

/// Destination metadata: every attribute, the variable name and, when a
/// `standard_name` is present, the well-known variable key `wkv`
pub fn band_metadata(var: &Variable) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("name".to_string(), var.name().to_string());
    for (name, value) in var.attributes() {
        metadata.insert(name.to_string(), value.to_string());
    }
    if let Some(standard_name) = var.attribute("standard_name") {
        metadata.insert("wkv".to_string(), standard_name.to_string());
    }
    metadata
}

fn source_expression(
    locator: &str,
    var: &Variable,
    spatial: &SpatialDimensions,
    placeholders: &Placeholders,
    indices: &[usize],
) -> String {
    let mut expr = format!("{}?{}.{}", locator, var.name(), var.name());
    let mut extra = indices.iter();
    for dim in var.dimensions() {
        let segment = match spatial.role_of(dim) {
            DimensionRole::X => placeholders.x.clone(),
            DimensionRole::Y => placeholders.y.clone(),
            DimensionRole::Other => extra.next().copied().unwrap_or(0).to_string(),
        };
        expr.push('[');
        expr.push_str(&segment);
        expr.push(']');
    }
    expr
}

/// All slices of one data variable, in flat-index order
pub fn enumerate_slices(
    locator: &str,
    dataset: &Dataset,
    var: &Variable,
    spatial: &SpatialDimensions,
    placeholders: &Placeholders,
) -> Result<Vec<SliceDescriptor>> {
    let shape = non_spatial_shape(dataset, var, spatial)?;
    let total: usize = shape.iter().product();
    let metadata = band_metadata(var);

    let slices = (0..total)
        .map(|flat| {
            let indices = unravel_index(flat, &shape);
            SliceDescriptor {
                variable: var.name().to_string(),
                source: source_expression(locator, var, spatial, placeholders, &indices),
                indices,
                source_band: SOURCE_BAND,
                metadata: metadata.clone(),
            }
        })
        .collect();
    Ok(slices)
}

/// Slices of every data variable, in declaration order
pub fn enumerate_all(
    locator: &str,
    dataset: &Dataset,
    spatial: &SpatialDimensions,
    placeholders: &Placeholders,
) -> Result<Vec<SliceDescriptor>> {
    let mut all = Vec::new();
    for var in dataset.data_variables() {
        all.extend(enumerate_slices(locator, dataset, var, spatial, placeholders)?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const URL: &str = "http://server/dods/file.nc";

    #[test]
    fn test_unravel_index_row_major() {
        let shape = [3, 5];
        let all: Vec<Vec<usize>> = (0..15).map(|i| unravel_index(i, &shape)).collect();
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[4], vec![0, 4]);
        assert_eq!(all[5], vec![1, 0]);
        assert_eq!(all[14], vec![2, 4]);

        for (i, idx) in all.iter().enumerate() {
            assert_eq!(idx[0] * 5 + idx[1], i);
        }
        let distinct: HashSet<_> = all.into_iter().collect();
        assert_eq!(distinct.len(), 15);
    }

    #[test]
    fn test_unravel_single_axis() {
        assert_eq!(unravel_index(0, &[1]), vec![0]);
        assert_eq!(unravel_index(7, &[2, 2, 2]), vec![1, 1, 1]);
    }

    fn dataset() -> Dataset {
        Dataset::new()
            .with_variable(Variable::new("time", &["time"], &[3]).with_values(vec![0.0, 1.0, 2.0]))
            .with_variable(Variable::new("depth", &["depth"], &[5]).with_values(vec![0.0; 5]))
            .with_variable(
                Variable::new("temp", &["time", "depth", "lat", "lon"], &[3, 5, 4, 6])
                    .with_attribute("grid_mapping", "crs")
                    .with_attribute("units", "K")
                    .with_attribute("_FillValue", -999.0f32),
            )
            .with_variable(
                Variable::new("mask", &["lat", "lon"], &[4, 6])
                    .with_attribute("grid_mapping", "crs")
                    .with_attribute("standard_name", "land_binary_mask"),
            )
    }

    fn spatial() -> SpatialDimensions {
        SpatialDimensions::new("lon", "lat")
    }

    #[test]
    fn test_enumerates_every_combination() {
        let ds = dataset();
        let var = ds.variable("temp").unwrap();
        let slices = enumerate_slices(URL, &ds, var, &spatial(), &Placeholders::default()).unwrap();

        assert_eq!(slices.len(), 15);
        for (i, slice) in slices.iter().enumerate() {
            assert_eq!(slice.indices, unravel_index(i, &[3, 5]));
            assert_eq!(slice.source_band, 1);
        }
        assert_eq!(slices[0].source, format!("{}?temp.temp[0][0][y][x]", URL));
        assert_eq!(slices[7].source, format!("{}?temp.temp[1][2][y][x]", URL));
        assert_eq!(slices[14].source, format!("{}?temp.temp[2][4][y][x]", URL));

        let distinct: HashSet<&str> = slices.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(distinct.len(), 15);
    }

    #[test]
    fn test_no_extra_dimensions_yields_one_slice() {
        let ds = dataset();
        let var = ds.variable("mask").unwrap();
        assert_eq!(non_spatial_shape(&ds, var, &spatial()).unwrap(), vec![1]);

        let slices = enumerate_slices(URL, &ds, var, &spatial(), &Placeholders::default()).unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].source, format!("{}?mask.mask[y][x]", URL));
    }

    #[test]
    fn test_metadata() {
        let ds = dataset();
        let temp = band_metadata(ds.variable("temp").unwrap());
        assert_eq!(temp["name"], "temp");
        assert_eq!(temp["units"], "K");
        assert_eq!(temp["_FillValue"], "-999");
        assert_eq!(temp["grid_mapping"], "crs");
        assert!(!temp.contains_key("wkv"));

        let mask = band_metadata(ds.variable("mask").unwrap());
        assert_eq!(mask["wkv"], "land_binary_mask");
    }

    #[test]
    fn test_enumerate_all_keeps_variable_order() {
        let ds = dataset();
        let slices = enumerate_all(URL, &ds, &spatial(), &Placeholders::default()).unwrap();
        assert_eq!(slices.len(), 16);
        assert!(slices[..15].iter().all(|s| s.variable == "temp"));
        assert_eq!(slices[15].variable, "mask");
    }

    #[test]
    fn test_custom_placeholders() {
        let ds = dataset();
        let placeholders = Placeholders {
            x: "0:1:5".to_string(),
            y: "0:1:3".to_string(),
        };
        let slices = enumerate_slices(URL, &ds, ds.variable("mask").unwrap(), &spatial(), &placeholders).unwrap();
        assert_eq!(slices[0].source, format!("{}?mask.mask[0:1:3][0:1:5]", URL));
    }

    #[test]
    fn test_dimension_without_coordinate_variable_uses_axis() {
        let ds = Dataset::new().with_variable(
            Variable::new("v", &["member", "y", "x"], &[4, 2, 2]).with_attribute("grid_mapping", "crs"),
        );
        let var = ds.variable("v").unwrap();
        let spatial = SpatialDimensions::new("x", "y");
        assert_eq!(non_spatial_shape(&ds, var, &spatial).unwrap(), vec![4]);
    }

    #[test]
    fn test_coordinate_length_mismatch() {
        let ds = Dataset::new()
            .with_variable(Variable::new("time", &["time"], &[2]).with_values(vec![0.0, 1.0]))
            .with_variable(
                Variable::new("v", &["time", "y", "x"], &[3, 2, 2]).with_attribute("grid_mapping", "crs"),
            );
        let var = ds.variable("v").unwrap();
        match non_spatial_shape(&ds, var, &SpatialDimensions::new("x", "y")) {
            Err(MapperError::ShapeMismatch { coordinate, axis, .. }) => {
                assert_eq!(coordinate, 2);
                assert_eq!(axis, 3);
            }
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }
}
