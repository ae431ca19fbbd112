//! Coordinate reference system discovery
//!
//! The first variable (in declaration order) that carries `grid_mapping_name`
//! defines the projection of the whole dataset. Additional grid-mapping
//! variables are not reconciled with it.

use crate::dataset::{Dataset, Variable};
use crate::errors::Result;
use crate::projection::{proj4_from_variable, ProjectionDescriptor, WktConverter};
use tracing::{debug, info, warn};

/// First variable carrying `grid_mapping_name`
pub fn find_grid_mapping_variable(dataset: &Dataset) -> Option<&Variable> {
    dataset
        .variables()
        .find(|var| var.has_attribute("grid_mapping_name"))
}

/// Discover the dataset projection.
///
/// Returns [`ProjectionDescriptor::empty`] when no variable carries
/// `grid_mapping_name`. An unsupported grid mapping on the chosen variable is
/// an error.
pub fn discover_projection(
    dataset: &Dataset,
    converter: &dyn WktConverter,
) -> Result<ProjectionDescriptor> {
    let Some(var) = find_grid_mapping_variable(dataset) else {
        warn!("no grid_mapping_name found, dataset will not be georeferenced");
        return Ok(ProjectionDescriptor::empty());
    };

    let ignored: Vec<&str> = dataset
        .variables()
        .filter(|v| v.has_attribute("grid_mapping_name") && v.name() != var.name())
        .map(|v| v.name())
        .collect();
    if !ignored.is_empty() {
        debug!(used = var.name(), ?ignored, "multiple grid mapping variables");
    }

    let proj4 = proj4_from_variable(var)?;
    info!(variable = var.name(), proj4 = proj4.as_str(), "discovered projection");
    ProjectionDescriptor::from_proj4(proj4, converter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MapperError;
    use crate::projection::Proj4Wkt;

    #[test]
    fn test_first_grid_mapping_wins() {
        let ds = Dataset::new()
            .with_variable(Variable::new("xc", &["xc"], &[2]))
            .with_variable(
                Variable::new("crs_a", &[], &[])
                    .with_attribute("grid_mapping_name", "latitude_longitude"),
            )
            .with_variable(
                Variable::new("crs_b", &[], &[])
                    .with_attribute("grid_mapping_name", "polar_stereographic"),
            );

        assert_eq!(find_grid_mapping_variable(&ds).map(|v| v.name()), Some("crs_a"));
        let projection = discover_projection(&ds, &Proj4Wkt).unwrap();
        assert_eq!(projection.proj4, "+proj=longlat ");
        assert!(projection.wkt.starts_with("GEOGCS["));
    }

    #[test]
    fn test_no_grid_mapping_is_not_fatal() {
        let ds = Dataset::new().with_variable(
            Variable::new("sst", &["lat", "lon"], &[2, 2]).with_attribute("units", "K"),
        );
        let projection = discover_projection(&ds, &Proj4Wkt).unwrap();
        assert!(projection.is_empty());
        assert!(projection.wkt.is_empty());
    }

    #[test]
    fn test_unsupported_grid_mapping_fails() {
        let ds = Dataset::new().with_variable(
            Variable::new("crs", &[], &[]).with_attribute("grid_mapping_name", "mercator"),
        );
        assert!(matches!(
            discover_projection(&ds, &Proj4Wkt),
            Err(MapperError::UnsupportedProjection(_))
        ));
    }
}
