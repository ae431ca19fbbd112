//! Unit tests for the public dapmap API
//!
//! These exercise the mapping pass on in-memory datasets, without NetCDF files.

use dapmap::{
    bands::{enumerate_slices, unravel_index, Placeholders},
    dimensions::{classify, select_spatial_dimensions, DimensionRole},
    errors::{MapperError, Result},
    geotransform::GeoTransform,
    mapper::{ensure_remote, Mapper, MapperOptions},
    projection::{proj4_from_variable, GRID_MAPPINGS},
    VirtualRaster,
};
use dapmap::dataset::{Dataset, Variable};
use ndarray::array;
use std::collections::HashSet;

#[test]
fn test_error_types() {
    let netcdf_err = MapperError::NetCDF(netcdf::Error::NotFound("test".to_string()));
    assert!(format!("{}", netcdf_err).contains("NetCDF error"));

    let err = MapperError::NotRemote("/tmp/file.nc".to_string());
    assert_eq!(format!("{}", err), "not a remote-accessible dataset: '/tmp/file.nc'");

    let err = MapperError::UnsupportedProjection("mercator".to_string());
    assert!(format!("{}", err).contains("unsupported projection"));

    let err = MapperError::NoSpatialDimension { axis: 'y' };
    assert!(format!("{}", err).contains("no spatial dimension found"));

    let err = MapperError::DimensionNotFound {
        var: "temp".to_string(),
        dim: "time".to_string(),
    };
    assert_eq!(format!("{}", err), "dimension 'time' not found in variable 'temp'");
}

#[test]
fn test_every_family_starts_with_its_leading_token() {
    for spec in GRID_MAPPINGS {
        let var = Variable::new("crs", &[], &[]).with_attribute("grid_mapping_name", spec.name);
        let proj4 = proj4_from_variable(&var).expect("supported family");
        assert_eq!(proj4, format!("{} ", spec.proj));
    }
}

#[test]
fn test_classifier_examples() {
    assert_eq!(classify("xc"), DimensionRole::X);
    assert_eq!(classify("lat"), DimensionRole::Y);
    assert_eq!(classify("depth"), DimensionRole::Other);
}

#[test]
fn test_geotransform_example() {
    let gt = GeoTransform::from_coordinates(
        array![10.0, 12.0, 14.0].view(),
        array![50.0, 48.0, 46.0].view(),
    )
    .unwrap();
    assert_eq!(<[f64; 6]>::from(gt), [10.0, 2.0, 0.0, 50.0, 0.0, -2.0]);
}

#[test]
fn test_fifteen_slices_for_three_by_five() -> Result<()> {
    let ds = Dataset::new()
        .with_variable(Variable::new("a", &["a"], &[3]).with_values(vec![0.0, 1.0, 2.0]))
        .with_variable(Variable::new("b", &["b"], &[5]).with_values(vec![0.0; 5]))
        .with_variable(
            Variable::new("field", &["a", "yc", "b", "xc"], &[3, 10, 5, 20])
                .with_attribute("grid_mapping", "crs"),
        );

    let spatial = select_spatial_dimensions(&ds)?;
    let var = ds.variable("field").unwrap();
    let slices = enumerate_slices("http://h/f.nc", &ds, var, &spatial, &Placeholders::default())?;

    assert_eq!(slices.len(), 15);
    let vectors: HashSet<Vec<usize>> = slices.iter().map(|s| s.indices.clone()).collect();
    assert_eq!(vectors.len(), 15);
    for (i, slice) in slices.iter().enumerate() {
        assert_eq!(slice.indices, unravel_index(i, &[3, 5]));
        let expected = format!(
            "http://h/f.nc?field.field[{}][y][{}][x]",
            slice.indices[0], slice.indices[1]
        );
        assert_eq!(slice.source, expected);
    }
    Ok(())
}

#[test]
fn test_non_remote_locator_fails_fast() {
    let options = MapperOptions::default();
    assert!(ensure_remote("file:///data/x.nc", &options.remote_schemes).is_err());

    let mapper = Mapper::new(options);
    assert!(matches!(
        mapper.open::<VirtualRaster>("ice_conc.nc"),
        Err(MapperError::NotRemote(_))
    ));
}

#[test]
fn test_no_data_variables() {
    let ds = Dataset::new().with_variable(
        Variable::new("crs", &[], &[]).with_attribute("grid_mapping_name", "latitude_longitude"),
    );
    assert!(matches!(
        Mapper::default().map_dataset("http://h/f.nc", &ds),
        Err(MapperError::NoSpatialDimension { .. })
    ));
}
