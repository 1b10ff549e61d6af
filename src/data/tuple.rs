use super::*;
use crate::Energy;
use crate::Id;
use crate::MiningError;
use std::collections::BTreeSet;

/// A record expressed as items, positionally aligned with the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple(Vec<Item>);

impl Tuple {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.iter().map(Item::value)
    }

    /// Sum of item distances, position by position.
    pub fn distance(&self, other: &Self) -> Result<Energy, MiningError> {
        if self.len() != other.len() {
            return Err(MiningError::invalid(format!(
                "tuples differ in length ({} vs {})",
                self.len(),
                other.len()
            )));
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.distance(&b.value()))
            .sum()
    }

    /// Mean distance from this tuple to each referenced record.
    pub fn average_distance(
        &self,
        data: &Data,
        ids: &BTreeSet<Id>,
    ) -> Result<Energy, MiningError> {
        if ids.is_empty() {
            return Err(MiningError::invalid("no records to average over"));
        }
        let total = ids
            .iter()
            .map(|&id| data.tuple(id).and_then(|t| self.distance(&t)))
            .sum::<Result<Energy, MiningError>>()?;
        Ok(total / ids.len() as Energy)
    }
}

impl From<Vec<Item>> for Tuple {
    fn from(items: Vec<Item>) -> Self {
        Self(items)
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;

    fn weather() -> Data {
        Data::infer(
            ["outlook", "temperature", "windy"],
            vec![
                vec![Value::from("sunny"), Value::from(30.0), Value::from("no")],
                vec![Value::from("rain"), Value::from(10.0), Value::from("yes")],
                vec![Value::from("sunny"), Value::from(20.0), Value::from("yes")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn distance_sums_item_distances() {
        let data = weather();
        let a = data.tuple(0).unwrap();
        let b = data.tuple(2).unwrap();
        // same outlook, half the temperature range, different wind
        assert_eq!(a.distance(&b).unwrap(), 1.5);
        assert_eq!(a.distance(&a).unwrap(), 0.0);
    }
    #[test]
    fn distance_is_symmetric() {
        for _ in 0..16 {
            let data = Data::random();
            for i in 0..data.len() {
                for j in 0..data.len() {
                    let a = data.tuple(i).unwrap();
                    let b = data.tuple(j).unwrap();
                    assert_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
                }
            }
        }
    }
    #[test]
    fn distance_rejects_mismatched_lengths() {
        let data = weather();
        let a = data.tuple(0).unwrap();
        let b = Tuple::from(a.items().take(2).cloned().collect::<Vec<_>>());
        assert!(matches!(a.distance(&b), Err(MiningError::InvalidArgument(_))));
        assert!(matches!(b.distance(&a), Err(MiningError::InvalidArgument(_))));
    }
    #[test]
    fn average_is_mean_distance() {
        let data = weather();
        let a = data.tuple(0).unwrap();
        let ids = BTreeSet::from([0, 1, 2]);
        // 0.0 + (1 + 1 + 1) + (0 + 0.5 + 1)
        assert_eq!(a.average_distance(&data, &ids).unwrap(), 4.5 / 3.0);
    }
    #[test]
    fn average_over_nothing_fails() {
        let data = weather();
        let a = data.tuple(0).unwrap();
        assert!(a.average_distance(&data, &BTreeSet::new()).is_err());
    }
    #[test]
    fn display_joins_values() {
        let data = weather();
        assert_eq!(data.tuple(1).unwrap().to_string(), "rain 10 yes");
    }
}
