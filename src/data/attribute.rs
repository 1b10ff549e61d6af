use super::*;
use crate::Energy;
use crate::MiningError;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A numeric column, bounded by the observed `[min, max]` of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Continuous {
    name: String,
    index: usize,
    min: f64,
    max: f64,
}

impl Continuous {
    pub fn new(
        name: impl Into<String>,
        index: usize,
        min: f64,
        max: f64,
    ) -> Result<Self, MiningError> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() {
            return Err(MiningError::invalid(format!("non-finite bounds on {}", name)));
        }
        if min > max {
            return Err(MiningError::invalid(format!(
                "min {} exceeds max {} on {}",
                min, max, name
            )));
        }
        Ok(Self {
            name,
            index,
            min,
            max,
        })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }
    /// maps the observed range onto [0, 1].
    /// a column that never varies scales everything to 0.
    pub fn scale(&self, v: f64) -> Energy {
        if self.max == self.min {
            0.
        } else {
            (v - self.min) / (self.max - self.min)
        }
    }
}

/// A categorical column with its ordered set of permissible values.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete {
    name: String,
    index: usize,
    values: BTreeSet<String>,
}

impl Discrete {
    pub fn new<I, S>(name: impl Into<String>, index: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            index,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn index(&self) -> usize {
        self.index
    }
    /// distinct values in lexicographic order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
    pub fn n(&self) -> usize {
        self.values.len()
    }
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }
}

/// One column of a record set.
///
/// Variants are shared behind `Arc` so that every [`Item`]
/// of every tuple can point back at its column for free.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Continuous(Arc<Continuous>),
    Discrete(Arc<Discrete>),
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Self::Continuous(a) => a.name(),
            Self::Discrete(a) => a.name(),
        }
    }
    pub fn index(&self) -> usize {
        match self {
            Self::Continuous(a) => a.index(),
            Self::Discrete(a) => a.index(),
        }
    }
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous(_))
    }
    /// whether a raw value may be bound to this column
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Continuous(_), Value::Number(x)) => x.is_finite(),
            (Self::Discrete(a), Value::Text(s)) => a.contains(s),
            _ => false,
        }
    }
}

impl From<Continuous> for Attribute {
    fn from(a: Continuous) -> Self {
        Self::Continuous(Arc::new(a))
    }
}
impl From<Discrete> for Attribute {
    fn from(a: Discrete) -> Self {
        Self::Discrete(Arc::new(a))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_bounds_to_unit_interval() {
        let temperature = Continuous::new("temperature", 1, -5.0, 35.0).unwrap();
        assert_eq!(temperature.scale(-5.0), 0.0);
        assert_eq!(temperature.scale(35.0), 1.0);
        assert_eq!(temperature.scale(15.0), 0.5);
    }
    #[test]
    fn scale_of_constant_column_is_zero() {
        let flat = Continuous::new("flat", 0, 3.0, 3.0).unwrap();
        assert_eq!(flat.scale(3.0), 0.0);
    }
    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            Continuous::new("x", 0, 2.0, 1.0),
            Err(MiningError::InvalidArgument(_))
        ));
        assert!(Continuous::new("x", 0, f64::NAN, 1.0).is_err());
    }
    #[test]
    fn discrete_values_are_sorted_and_distinct() {
        let outlook = Discrete::new("outlook", 0, ["sunny", "overcast", "rain", "sunny"]);
        assert_eq!(outlook.n(), 3);
        assert_eq!(
            outlook.values().collect::<Vec<_>>(),
            vec!["overcast", "rain", "sunny"]
        );
    }
    #[test]
    fn attributes_admit_matching_values_only() {
        let outlook = Attribute::from(Discrete::new("outlook", 0, ["sunny", "rain"]));
        let humidity = Attribute::from(Continuous::new("humidity", 1, 0.0, 100.0).unwrap());
        assert!(outlook.admits(&Value::from("sunny")));
        assert!(!outlook.admits(&Value::from("snow")));
        assert!(!outlook.admits(&Value::from(1.0)));
        assert!(humidity.admits(&Value::from(50.0)));
        assert!(!humidity.admits(&Value::from("50")));
    }
}
