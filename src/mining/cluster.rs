use super::*;
use crate::Id;
use crate::data::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Write;

/// A fixed centroid (the seed record, not a computed mean)
/// plus the ids of the records assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    centroid: Tuple,
    members: BTreeSet<Id>,
}

impl Cluster {
    pub fn new(centroid: Tuple) -> Self {
        Self {
            centroid,
            members: BTreeSet::new(),
        }
    }
    pub fn centroid(&self) -> &Tuple {
        &self.centroid
    }
    pub fn members(&self) -> &BTreeSet<Id> {
        &self.members
    }
    /// true if the id was not already a member
    pub fn add(&mut self, id: Id) -> bool {
        self.members.insert(id)
    }
    pub fn size(&self) -> usize {
        self.members.len()
    }
    pub fn contains(&self, id: Id) -> bool {
        self.members.contains(&id)
    }
    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.members.iter().copied()
    }

    /// Enumeration order for cluster sets: smaller clusters first,
    /// then centroids compared value by value as rendered text.
    /// Display order only, never identity.
    pub fn rank(a: &Self, b: &Self) -> Ordering {
        a.size().cmp(&b.size()).then_with(|| {
            a.centroid
                .values()
                .zip(b.centroid.values())
                .map(|(x, y)| x.rendered_cmp(&y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.centroid.len().cmp(&b.centroid.len()))
        })
    }

    /// Renders the centroid, every member with its distance
    /// to the centroid, and the mean of those distances.
    pub fn report(&self, data: &Data) -> Result<String, MiningError> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self);
        let _ = writeln!(out, "Examples:");
        for id in self.iter() {
            let record = data
                .record(id)
                .ok_or_else(|| MiningError::invalid(format!("no record {} to report", id)))?
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            let distance = self.centroid.distance(&data.tuple(id)?)?;
            let _ = writeln!(out, "[{}] dist={}", record, distance);
        }
        let _ = writeln!(
            out,
            "AvgDistance={}",
            self.centroid.average_distance(data, &self.members)?
        );
        Ok(out)
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Centroid=({})", self.centroid)
    }
}
