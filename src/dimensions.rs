//! Spatial role assignment for dataset dimensions
//!
//! Roles come from substrings of the dimension name. Candidate names are
//! visited in lexicographic order and the last match wins per role, so the
//! choice is reproducible for a given set of names.

use crate::dataset::Dataset;
use crate::errors::{MapperError, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Axis role of a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionRole {
    X,
    Y,
    Other,
}

/// Name fragments marking each spatial role, checked in order
const ROLE_RULES: [(DimensionRole, &[&str]); 2] = [
    (DimensionRole::X, &["x", "lon", "east"]),
    (DimensionRole::Y, &["y", "lat", "north"]),
];

fn matches_role(name: &str, role: DimensionRole) -> bool {
    ROLE_RULES
        .iter()
        .filter(|(r, _)| *r == role)
        .any(|(_, fragments)| fragments.iter().any(|f| name.contains(f)))
}

/// Role of a single dimension name. A name matching both rule sets is X.
pub fn classify(name: &str) -> DimensionRole {
    ROLE_RULES
        .iter()
        .find(|(role, _)| matches_role(name, *role))
        .map(|(role, _)| *role)
        .unwrap_or(DimensionRole::Other)
}

/// The chosen X and Y dimension names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialDimensions {
    pub x: String,
    pub y: String,
}

impl SpatialDimensions {
    pub fn new<S: Into<String>>(x: S, y: S) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn role_of(&self, dim: &str) -> DimensionRole {
        if dim == self.x {
            DimensionRole::X
        } else if dim == self.y {
            DimensionRole::Y
        } else {
            DimensionRole::Other
        }
    }

    pub fn is_spatial(&self, dim: &str) -> bool {
        self.role_of(dim) != DimensionRole::Other
    }
}

/// Distinct dimension names used by data variables
pub fn qualifying_dimensions(dataset: &Dataset) -> BTreeSet<String> {
    dataset
        .data_variables()
        .flat_map(|var| var.dimensions().iter().cloned())
        .collect()
}

/// Pick one X and one Y dimension among the data variables' dimensions.
///
/// A name matching both rule sets is a candidate for both roles.
pub fn select_spatial_dimensions(dataset: &Dataset) -> Result<SpatialDimensions> {
    let mut x_dim = None;
    let mut y_dim = None;

    for dim in qualifying_dimensions(dataset) {
        if matches_role(&dim, DimensionRole::X) {
            x_dim = Some(dim.clone());
        }
        if matches_role(&dim, DimensionRole::Y) {
            y_dim = Some(dim);
        }
    }

    let x = x_dim.ok_or(MapperError::NoSpatialDimension { axis: 'x' })?;
    let y = y_dim.ok_or(MapperError::NoSpatialDimension { axis: 'y' })?;
    debug!(x = x.as_str(), y = y.as_str(), "classified spatial dimensions");
    Ok(SpatialDimensions { x, y })
}
