//! CF grid mappings and their PROJ equivalents
//!
//! Each supported `grid_mapping_name` has a fixed leading PROJ token and an
//! ordered table of CF attribute names with the PROJ parameter they become.

use crate::dataset::Variable;
use crate::errors::{MapperError, Result};

/// A CF grid-mapping family and its PROJ parameter table
#[derive(Debug)]
pub struct GridMappingSpec {
    /// Value of `grid_mapping_name`
    pub name: &'static str,
    /// Leading PROJ token, always emitted
    pub proj: &'static str,
    /// CF attribute -> PROJ parameter, in emission order
    pub parameters: &'static [(&'static str, &'static str)],
}

/// Ellipsoid attributes shared by every family
static ELLIPSOID: [(&str, &str); 4] = [
    ("semi_major_axis", "+a"),
    ("semi_minor_axis", "+b"),
    ("inverse_flattening", "+rf"),
    ("earth_radius", "+R"),
];

/// Supported grid mappings
pub static GRID_MAPPINGS: &[GridMappingSpec] = &[
    GridMappingSpec {
        name: "albers_conical_equal_area",
        proj: "+proj=aea",
        parameters: &[
            ("standard_parallel", "+lat_1"),
            ("longitude_of_central_meridian", "+lon_0"),
            ("latitude_of_projection_origin", "+lat_0"),
            ("false_easting", "+x_0"),
            ("false_northing", "+y_0"),
        ],
    },
    GridMappingSpec {
        name: "polar_stereographic",
        proj: "+proj=stere",
        parameters: &[
            ("straight_vertical_longitude_from_pole", "+lon_0"),
            ("latitude_of_projection_origin", "+lat_0"),
            ("standard_parallel", "+lat_ts"),
            ("scale_factor_at_projection_origin", "+k_0"),
            ("false_easting", "+x_0"),
            ("false_northing", "+y_0"),
        ],
    },
    GridMappingSpec {
        name: "stereographic",
        proj: "+proj=stere",
        parameters: &[
            ("longitude_of_projection_origin", "+lon_0"),
            ("latitude_of_projection_origin", "+lat_0"),
            ("scale_factor_at_projection_origin", "+k_0"),
            ("false_easting", "+x_0"),
            ("false_northing", "+y_0"),
        ],
    },
    GridMappingSpec {
        name: "latitude_longitude",
        proj: "+proj=longlat",
        parameters: &[],
    },
];

impl GridMappingSpec {
    /// Look up a family by its `grid_mapping_name`
    pub fn find(name: &str) -> Option<&'static GridMappingSpec> {
        GRID_MAPPINGS.iter().find(|spec| spec.name == name)
    }

    /// Family parameters followed by the shared ellipsoid parameters
    pub fn all_parameters(&self) -> impl Iterator<Item = &(&'static str, &'static str)> {
        self.parameters.iter().chain(ELLIPSOID.iter())
    }

    /// Build the PROJ string from the attributes present on `var`.
    ///
    /// Every emitted token, including the leading one, is followed by a space.
    pub fn proj4(&self, var: &Variable) -> String {
        let mut proj4 = format!("{} ", self.proj);
        for (attr, token) in self.all_parameters() {
            if let Some(value) = var.attribute(attr) {
                proj4.push_str(&format!("{}={} ", token, value));
            }
        }
        proj4
    }
}

/// Translate a grid-mapping variable into a PROJ string
pub fn proj4_from_variable(var: &Variable) -> Result<String> {
    let gm_name = var
        .attribute("grid_mapping_name")
        .ok_or_else(|| MapperError::MissingAttribute {
            var: var.name().to_string(),
            attr: "grid_mapping_name".to_string(),
        })?
        .to_string();

    let spec = GridMappingSpec::find(&gm_name)
        .ok_or_else(|| MapperError::UnsupportedProjection(gm_name.clone()))?;

    Ok(spec.proj4(var))
}
