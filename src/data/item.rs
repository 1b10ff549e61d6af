use super::*;
use crate::Energy;
use crate::MiningError;
use std::sync::Arc;

/// One attribute bound to one concrete value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Continuous(Arc<Continuous>, f64),
    Discrete(Arc<Discrete>, String),
}

impl Item {
    /// Binds a raw value to its column. Finite numbers outside the observed
    /// range are accepted; categorical values must belong to the column.
    pub fn bind(attribute: &Attribute, value: Value) -> Result<Self, MiningError> {
        match (attribute, value) {
            (Attribute::Continuous(a), Value::Number(x)) if x.is_finite() => {
                Ok(Self::Continuous(a.clone(), x))
            }
            (Attribute::Continuous(a), Value::Number(x)) => Err(MiningError::invalid(format!(
                "{} cannot hold non-finite {}",
                a.name(),
                x
            ))),
            (Attribute::Discrete(a), Value::Text(s)) if a.contains(&s) => {
                Ok(Self::Discrete(a.clone(), s))
            }
            (Attribute::Discrete(a), Value::Text(s)) => Err(MiningError::invalid(format!(
                "{} is not a value of {}",
                s,
                a.name()
            ))),
            (attribute, value) => Err(MiningError::invalid(format!(
                "{} cannot hold {}",
                attribute, value
            ))),
        }
    }
    pub fn attribute(&self) -> Attribute {
        match self {
            Self::Continuous(a, _) => Attribute::Continuous(a.clone()),
            Self::Discrete(a, _) => Attribute::Discrete(a.clone()),
        }
    }
    pub fn value(&self) -> Value {
        match self {
            Self::Continuous(_, x) => Value::Number(*x),
            Self::Discrete(_, s) => Value::Text(s.clone()),
        }
    }
    /// Continuous items measure the gap between scaled values.
    /// Discrete items measure 0 on equality and 1 otherwise.
    pub fn distance(&self, other: &Value) -> Result<Energy, MiningError> {
        match (self, other) {
            (Self::Continuous(a, x), Value::Number(y)) if y.is_finite() => {
                Ok((a.scale(*x) - a.scale(*y)).abs())
            }
            (Self::Continuous(a, _), Value::Number(y)) => Err(MiningError::invalid(format!(
                "{} expects a finite number, found {}",
                a.name(),
                y
            ))),
            (Self::Continuous(a, _), Value::Text(s)) => Err(MiningError::invalid(format!(
                "{} expects a number, found {}",
                a.name(),
                s
            ))),
            (Self::Discrete(_, s), Value::Text(t)) if s == t => Ok(0.),
            (Self::Discrete(..), _) => Ok(1.),
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous(_, x) => write!(f, "{}", x),
            Self::Discrete(_, s) => write!(f, "{}", s),
        }
    }
}
