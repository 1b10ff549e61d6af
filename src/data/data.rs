use super::*;
use crate::Arbitrary;
use crate::Id;
use crate::MiningError;
use std::collections::BTreeSet;

/// An immutable, 0-indexed record set sharing one schema.
///
/// Records stay as raw values; [`Tuple`]s are materialized on demand,
/// and clusters only ever refer back to records by [`Id`].
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    schema: Vec<Attribute>,
    records: Vec<Vec<Value>>,
}

impl Data {
    /// Validates that attribute indices follow the positional layout
    /// and that every record fits the schema.
    pub fn new(schema: Vec<Attribute>, records: Vec<Vec<Value>>) -> Result<Self, MiningError> {
        if let Some((i, a)) = schema.iter().enumerate().find(|(i, a)| a.index() != *i) {
            return Err(MiningError::invalid(format!(
                "attribute {} sits at position {} but claims index {}",
                a,
                i,
                a.index()
            )));
        }
        for (i, record) in records.iter().enumerate() {
            if record.len() != schema.len() {
                return Err(MiningError::invalid(format!(
                    "record {} has {} values for {} attributes",
                    i,
                    record.len(),
                    schema.len()
                )));
            }
            if let Some((a, v)) = schema.iter().zip(record).find(|&(a, v)| !a.admits(v)) {
                return Err(MiningError::invalid(format!(
                    "record {} holds {} for {}",
                    i, v, a
                )));
            }
        }
        Ok(Self { schema, records })
    }

    /// Derives the schema from the records themselves:
    /// numeric columns become continuous over their observed range,
    /// text columns become categorical over their distinct values.
    pub fn infer<I, S>(names: I, records: Vec<Vec<Value>>) -> Result<Self, MiningError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<String>>();
        if let Some(record) = records.iter().find(|r| r.len() != names.len()) {
            return Err(MiningError::invalid(format!(
                "record of {} values for {} columns",
                record.len(),
                names.len()
            )));
        }
        let schema = names
            .into_iter()
            .enumerate()
            .map(|(j, name)| Self::column(name, j, &records))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(schema, records)
    }

    fn column(name: String, j: usize, records: &[Vec<Value>]) -> Result<Attribute, MiningError> {
        let numbers = records
            .iter()
            .map(|r| r[j].number())
            .collect::<Option<Vec<f64>>>();
        match numbers {
            Some(xs) if !xs.is_empty() => {
                let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
                let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Continuous::new(name, j, min, max).map(Attribute::from)
            }
            _ => records
                .iter()
                .map(|r| r[j].text().map(String::from))
                .collect::<Option<BTreeSet<String>>>()
                .map(|values| Attribute::from(Discrete::new(name.clone(), j, values)))
                .ok_or_else(|| MiningError::invalid(format!("column {} mixes kinds", name))),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn n_attributes(&self) -> usize {
        self.schema.len()
    }
    pub fn schema(&self) -> &[Attribute] {
        &self.schema
    }
    pub fn attribute(&self, j: usize) -> Option<&Attribute> {
        self.schema.get(j)
    }
    pub fn record(&self, i: Id) -> Option<&[Value]> {
        self.records.get(i).map(Vec::as_slice)
    }

    /// Binds record `i` to the schema.
    pub fn tuple(&self, i: Id) -> Result<Tuple, MiningError> {
        let record = self
            .record(i)
            .ok_or_else(|| MiningError::invalid(format!("no record {} among {}", i, self.len())))?;
        self.schema
            .iter()
            .zip(record.iter().cloned())
            .map(|(a, v)| Item::bind(a, v))
            .collect::<Result<Vec<_>, _>>()
            .map(Tuple::from)
    }

    /// Every record as a tuple, in record order.
    pub fn tuples(&self) -> Result<Vec<Tuple>, MiningError> {
        (0..self.len()).map(|i| self.tuple(i)).collect()
    }
}

impl std::fmt::Display for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = self
            .schema
            .iter()
            .map(Attribute::name)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(f, "{}", header)?;
        for (i, record) in self.records.iter().enumerate() {
            let row = record
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{}:{}", i + 1, row)?;
        }
        Ok(())
    }
}

impl Arbitrary for Data {
    fn random() -> Self {
        use rand::Rng;
        const LABELS: [&str; 3] = ["a", "b", "c"];
        let mut rng = rand::rng();
        let n = rng.random_range(2..24);
        let records = (0..n)
            .map(|_| {
                vec![
                    Value::from(rng.random_range(0..100) as f64),
                    Value::from(rng.random::<f64>()),
                    Value::from(LABELS[rng.random_range(0..LABELS.len())]),
                ]
            })
            .collect();
        Self::infer(["x", "y", "label"], records).expect("random records share one layout")
    }
}
