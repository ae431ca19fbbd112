//! PROJ string to WKT1 conversion.
//!
//! The raster sink expects its projection as well-known text. Conversion sits
//! behind [`WktConverter`] so a full geodesy library can be plugged in; the
//! built-in [`Proj4Wkt`] covers the projections produced by the grid-mapping
//! table.

use crate::errors::{MapperError, Result};
use std::collections::BTreeMap;

const WGS84_SEMI_MAJOR: f64 = 6378137.0;
const WGS84_INVERSE_FLATTENING: f64 = 298.257223563;

/// Pure PROJ -> WKT function
pub trait WktConverter {
    fn to_wkt(&self, proj4: &str) -> Result<String>;
}

/// Built-in converter for `longlat`, `stere` and `aea`
#[derive(Debug, Clone, Copy, Default)]
pub struct Proj4Wkt;

/// Parsed `+key=value` parameters
struct ProjParams(BTreeMap<String, String>);

impl ProjParams {
    fn parse(proj4: &str) -> Self {
        let params = proj4
            .split_whitespace()
            .map(|token| token.trim_start_matches('+'))
            .map(|token| match token.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (token.to_string(), String::new()),
            })
            .collect();
        Self(params)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Numeric parameter; lists keep only the element at `index`
    fn nth(&self, key: &str, index: usize) -> Result<Option<f64>> {
        let Some(raw) = self.text(key) else {
            return Ok(None);
        };
        match raw.split(',').nth(index) {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| MapperError::InvalidProjection(format!("+{}={}", key, raw))),
            None => Ok(None),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        self.nth(key, 0)
    }

    fn number_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.number(key)?.unwrap_or(default))
    }
}

fn geogcs(params: &ProjParams) -> Result<String> {
    let (name, datum, spheroid, a, rf) = if let Some(r) = params.number("R")? {
        ("unknown", "unknown", "Sphere", r, 0.0)
    } else if let Some(a) = params.number("a")? {
        let rf = match (params.number("rf")?, params.number("b")?) {
            (Some(rf), _) => rf,
            (None, Some(b)) if (a - b).abs() > f64::EPSILON => a / (a - b),
            _ => 0.0,
        };
        ("unknown", "unknown", "unnamed", a, rf)
    } else {
        ("WGS 84", "WGS_1984", "WGS 84", WGS84_SEMI_MAJOR, WGS84_INVERSE_FLATTENING)
    };

    Ok(format!(
        r#"GEOGCS["{}",DATUM["{}",SPHEROID["{}",{},{}]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#,
        name, datum, spheroid, a, rf
    ))
}

fn projcs(geogcs: &str, projection: &str, parameters: &[(&str, f64)]) -> String {
    let params: String = parameters
        .iter()
        .map(|(name, value)| format!(r#",PARAMETER["{}",{}]"#, name, value))
        .collect();
    format!(
        r#"PROJCS["unnamed",{},PROJECTION["{}"]{},UNIT["metre",1]]"#,
        geogcs, projection, params
    )
}

impl WktConverter for Proj4Wkt {
    fn to_wkt(&self, proj4: &str) -> Result<String> {
        if proj4.trim().is_empty() {
            return Ok(String::new());
        }

        let params = ProjParams::parse(proj4);
        let geog = geogcs(&params)?;
        let x_0 = params.number_or("x_0", 0.0)?;
        let y_0 = params.number_or("y_0", 0.0)?;

        match params.text("proj") {
            Some("longlat") | Some("latlong") => Ok(geog),
            Some("stere") => {
                let lat_0 = params.number_or("lat_0", 90.0)?;
                let lon_0 = params.number_or("lon_0", 0.0)?;
                let k_0 = params.number_or("k_0", 1.0)?;
                if (lat_0.abs() - 90.0).abs() < f64::EPSILON {
                    let lat_ts = params.number_or("lat_ts", lat_0)?;
                    Ok(projcs(
                        &geog,
                        "Polar_Stereographic",
                        &[
                            ("latitude_of_origin", lat_ts),
                            ("central_meridian", lon_0),
                            ("scale_factor", k_0),
                            ("false_easting", x_0),
                            ("false_northing", y_0),
                        ],
                    ))
                } else {
                    Ok(projcs(
                        &geog,
                        "Stereographic",
                        &[
                            ("latitude_of_origin", lat_0),
                            ("central_meridian", lon_0),
                            ("scale_factor", k_0),
                            ("false_easting", x_0),
                            ("false_northing", y_0),
                        ],
                    ))
                }
            }
            Some("aea") => {
                let lat_1 = params.number_or("lat_1", 0.0)?;
                let lat_2 = match params.nth("lat_1", 1)? {
                    Some(v) => v,
                    None => params.number_or("lat_2", lat_1)?,
                };
                Ok(projcs(
                    &geog,
                    "Albers_Conic_Equal_Area",
                    &[
                        ("standard_parallel_1", lat_1),
                        ("standard_parallel_2", lat_2),
                        ("latitude_of_center", params.number_or("lat_0", 0.0)?),
                        ("longitude_of_center", params.number_or("lon_0", 0.0)?),
                        ("false_easting", x_0),
                        ("false_northing", y_0),
                    ],
                ))
            }
            Some(other) => Err(MapperError::UnsupportedProjection(other.to_string())),
            None => Err(MapperError::InvalidProjection(format!(
                "missing +proj in '{}'",
                proj4.trim()
            ))),
        }
    }
}
