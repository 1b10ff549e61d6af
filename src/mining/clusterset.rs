use super::*;
use crate::data::*;
use std::cmp::Ordering;

/// The clusters produced by one run, kept in [`Cluster::rank`] order.
///
/// Insertion order is irrelevant. Clusters that rank equal are all kept,
/// later insertions after earlier ones; nothing is deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSet(Vec<Cluster>);

impl ClusterSet {
    pub fn add(&mut self, cluster: Cluster) {
        let at = self
            .0
            .partition_point(|c| Cluster::rank(c, &cluster) != Ordering::Greater);
        self.0.insert(at, cluster);
    }
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    /// Full report against the record set the clusters were mined from.
    pub fn report(&self, data: &Data) -> Result<String, MiningError> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, c)| c.report(data).map(|r| format!("{}: {}\n", i + 1, r)))
            .collect()
    }
}

impl FromIterator<Cluster> for ClusterSet {
    fn from_iter<I: IntoIterator<Item = Cluster>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut set, c| {
            set.add(c);
            set
        })
    }
}

impl IntoIterator for ClusterSet {
    type Item = Cluster;
    type IntoIter = std::vec::IntoIter<Cluster>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for ClusterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, cluster) in self.0.iter().enumerate() {
            writeln!(f, "{}: {}", i + 1, cluster)?;
        }
        Ok(())
    }
}
