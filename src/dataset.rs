//! Immutable snapshot of a CF dataset's variables
//!
//! The mapping pass never talks to the remote server directly: the dataset is
//! opened once, copied into a [`Dataset`] and every later stage reads from
//! that snapshot. Snapshots can also be assembled in memory with the builder
//! methods, which is how most unit tests drive the pipeline.

use crate::dimensions::{classify, DimensionRole};
use crate::errors::Result;
use ndarray::Array1;
use netcdf::types::NcVariableType;
use std::fmt;
use tracing::debug;

/// Attribute value as stored on a variable
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Strs(Vec<String>),
    Int(i64),
    Ints(Vec<i64>),
    Float(f32),
    Floats(Vec<f32>),
    Double(f64),
    Doubles(Vec<f64>),
}

impl AttributeValue {
    /// Borrow the value as a string slice, if it is a single string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric scalar as `f64`; lists and strings give `None`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::Ints(is) if is.len() == 1 => Some(is[0] as f64),
            Self::Floats(vs) if vs.len() == 1 => Some(f64::from(vs[0])),
            Self::Doubles(vs) if vs.len() == 1 => Some(vs[0]),
            _ => None,
        }
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Strs(ss) => join(f, ss),
            Self::Int(i) => write!(f, "{}", i),
            Self::Ints(is) => join(f, is),
            Self::Float(v) => write!(f, "{}", v),
            Self::Floats(vs) => join(f, vs),
            Self::Double(v) => write!(f, "{}", v),
            Self::Doubles(vs) => join(f, vs),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Doubles(value)
    }
}

impl From<netcdf::AttributeValue> for AttributeValue {
    fn from(value: netcdf::AttributeValue) -> Self {
        use netcdf::AttributeValue as Nc;

        fn widen<T: Into<i64> + Copy>(values: &[T]) -> Vec<i64> {
            values.iter().map(|&v| v.into()).collect()
        }

        match value {
            Nc::Str(s) => Self::Str(s),
            Nc::Strs(ss) => Self::Strs(ss),
            Nc::Uchar(v) => Self::Int(v.into()),
            Nc::Uchars(vs) => Self::Ints(widen(&vs)),
            Nc::Schar(v) => Self::Int(v.into()),
            Nc::Schars(vs) => Self::Ints(widen(&vs)),
            Nc::Ushort(v) => Self::Int(v.into()),
            Nc::Ushorts(vs) => Self::Ints(widen(&vs)),
            Nc::Short(v) => Self::Int(v.into()),
            Nc::Shorts(vs) => Self::Ints(widen(&vs)),
            Nc::Uint(v) => Self::Int(v.into()),
            Nc::Uints(vs) => Self::Ints(widen(&vs)),
            Nc::Int(v) => Self::Int(v.into()),
            Nc::Ints(vs) => Self::Ints(widen(&vs)),
            Nc::Longlong(v) => Self::Int(v),
            Nc::Longlongs(vs) => Self::Ints(vs),
            Nc::Ulonglong(v) => match i64::try_from(v) {
                Ok(v) => Self::Int(v),
                Err(_) => Self::Str(v.to_string()),
            },
            Nc::Float(v) => Self::Float(v),
            Nc::Floats(vs) => Self::Floats(vs),
            Nc::Double(v) => Self::Double(v),
            Nc::Doubles(vs) => Self::Doubles(vs),
            other => Self::Str(format!("{:?}", other)),
        }
    }
}

/// One variable of the dataset, as seen by the mapping pass
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    dimensions: Vec<String>,
    shape: Vec<usize>,
    attributes: Vec<(String, AttributeValue)>,
    values: Option<Array1<f64>>,
}

impl Variable {
    /// Create a variable with the given dimension names and sizes
    pub fn new<S: Into<String>>(name: S, dimensions: &[&str], shape: &[usize]) -> Self {
        Self {
            name: name.into(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            shape: shape.to_vec(),
            attributes: Vec::new(),
            values: None,
        }
    }

    /// Add (or replace) an attribute
    #[must_use]
    pub fn with_attribute<V: Into<AttributeValue>>(mut self, name: &str, value: V) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    /// Attach coordinate values (1-D variables)
    #[must_use]
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(Array1::from(values));
        self
    }

    /// Apply `scale_factor` and `add_offset`, when present, to raw samples
    pub fn unpack(&self, raw: Vec<f64>) -> Array1<f64> {
        let scale = self
            .attribute("scale_factor")
            .and_then(AttributeValue::as_f64)
            .unwrap_or(1.0);
        let offset = self
            .attribute("add_offset")
            .and_then(AttributeValue::as_f64)
            .unwrap_or(0.0);
        Array1::from(raw).mapv(|v| v * scale + offset)
    }

    /// Only numeric X/Y coordinate variables carry values in the snapshot;
    /// every other axis contributes its length alone.
    fn wants_values(&self) -> bool {
        self.is_coordinate_variable() && classify(&self.name) != DimensionRole::Other
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Attributes in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Position of a dimension in the variable's declared order
    pub fn dimension_index(&self, dim: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == dim)
    }

    /// Coordinate values, present for 1-D coordinate variables
    pub fn values(&self) -> Option<&Array1<f64>> {
        self.values.as_ref()
    }

    /// A CF coordinate variable is 1-D and named after its dimension
    pub fn is_coordinate_variable(&self) -> bool {
        self.dimensions.len() == 1 && self.dimensions[0] == self.name
    }

    /// Number of elements along the variable's first axis
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered collection of variables, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: Vec<Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Open a dataset through the NetCDF library and take a snapshot of it.
    ///
    /// This is a single blocking call with no timeout or retry; errors from the
    /// library are returned unmodified.
    pub fn open_remote(locator: &str) -> Result<Self> {
        let file = netcdf::open(locator)?;
        debug!(locator, "opened dataset");
        Self::from_netcdf(&file)
    }

    /// Copy names, dimensions, attributes and coordinate values out of an
    /// open NetCDF file.
    pub fn from_netcdf(file: &netcdf::File) -> Result<Self> {
        let mut variables = Vec::new();

        for var in file.variables() {
            let name = var.name().to_string();
            let dims = var.dimensions();

            let mut variable = Variable {
                name,
                dimensions: dims.iter().map(|d| d.name().to_string()).collect(),
                shape: dims.iter().map(|d| d.len()).collect(),
                attributes: Vec::new(),
                values: None,
            };

            for attr in var.attributes() {
                let value = attr.value()?;
                variable
                    .attributes
                    .push((attr.name().to_string(), AttributeValue::from(value)));
            }

            let numeric = matches!(
                var.vartype(),
                NcVariableType::Int(_) | NcVariableType::Float(_)
            );
            if variable.wants_values() && numeric {
                let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
                variable.values = Some(variable.unpack(raw));
            } else if variable.is_coordinate_variable() {
                debug!(variable = variable.name.as_str(), "coordinate values not read");
            }

            variables.push(variable);
        }

        debug!(variables = variables.len(), "captured dataset snapshot");
        Ok(Self { variables })
    }

    /// Variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Variables carrying a `grid_mapping` attribute, in declaration order
    pub fn data_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(|v| v.has_attribute("grid_mapping"))
    }
}
