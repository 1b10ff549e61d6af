use super::*;
use crate::Energy;
use crate::Id;
use crate::data::*;
use crate::save::Disk;
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Quality-Threshold clustering.
///
/// Every pass builds one candidate cluster per unclustered record, holding
/// every unclustered record within `radius` of it, and commits the largest.
/// Passes repeat until nothing is left unclustered.
///
/// # Complexity
///
/// O(U²) distance evaluations per pass over the U unclustered records, and
/// at least one record leaves per pass, so O(n³) overall. Candidate sizes of a
/// pass are measured in parallel; the winner is still chosen by ascending index
/// so results match the sequential scan exactly.
#[derive(Debug, Clone, Default)]
pub struct QTMiner {
    radius: Energy,
    clusters: ClusterSet,
}

impl QTMiner {
    pub fn new(radius: Energy) -> Result<Self, MiningError> {
        if !radius.is_finite() || radius < 0. {
            return Err(MiningError::invalid(format!("radius {} is not usable", radius)));
        }
        Ok(Self {
            radius,
            clusters: ClusterSet::default(),
        })
    }
    pub fn radius(&self) -> Energy {
        self.radius
    }
    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }
    pub fn into_clusters(self) -> ClusterSet {
        self.clusters
    }

    /// Clusters the whole record set and returns how many clusters were committed.
    /// The previous result is dropped up front; the new one is kept only on success.
    /// A single all-encompassing cluster is rejected and discarded.
    pub fn compute(&mut self, data: &Data) -> Result<usize, MiningError> {
        if data.is_empty() {
            return Err(MiningError::EmptyDataset);
        }
        self.clusters.clear();
        let ref tuples = data.tuples()?;
        let mut clusters = ClusterSet::default();
        let mut clustered = vec![false; data.len()];
        let mut remaining = data.len();
        while remaining > 0 {
            let pending = (0..data.len())
                .filter(|&i| !clustered[i])
                .collect::<Vec<Id>>();
            let winner = self.candidate(tuples, &pending)?;
            winner.iter().for_each(|id| clustered[id] = true);
            remaining -= winner.size();
            clusters.add(winner);
        }
        match clusters.len() {
            1 => Err(MiningError::ClusteringRadius(data.len())),
            n => {
                self.clusters = clusters;
                Ok(n)
            }
        }
    }

    /// Largest candidate among the pending records.
    /// Ties go to the lowest seed index.
    fn candidate(&self, tuples: &[Tuple], pending: &[Id]) -> Result<Cluster, MiningError> {
        let sizes = pending
            .par_iter()
            .map(|&i| self.reach(tuples, pending, i).map(|ids| ids.len()))
            .collect::<Result<Vec<usize>, MiningError>>()?;
        let (best, _) = sizes
            .iter()
            .enumerate()
            .fold((0, 0), |(b, n), (k, &m)| if m > n { (k, m) } else { (b, n) });
        let seed = pending[best];
        let mut cluster = Cluster::new(tuples[seed].clone());
        for id in self.reach(tuples, pending, seed)? {
            cluster.add(id);
        }
        match cluster.size() {
            0 => Err(MiningError::invalid(format!(
                "record {} lies outside its own radius",
                seed
            ))),
            _ => Ok(cluster),
        }
    }

    /// Pending records within radius of the seed.
    fn reach(&self, tuples: &[Tuple], pending: &[Id], seed: Id) -> Result<Vec<Id>, MiningError> {
        let ref center = tuples[seed];
        let mut within = Vec::new();
        for &j in pending {
            if center.distance(&tuples[j])? <= self.radius {
                within.push(j);
            }
        }
        Ok(within)
    }

    /// write the current clusters to disk
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.clusters.save(path)
    }
    /// Replaces the current clusters with those decoded from the stream,
    /// re-adding them one at a time. The radius is left untouched.
    pub fn restore<R: Read>(&mut self, reader: &mut R) -> std::io::Result<usize> {
        let restored = ClusterSet::read(reader)?;
        self.clusters.clear();
        restored.into_iter().for_each(|c| self.clusters.add(c));
        Ok(self.clusters.len())
    }
    /// A miner holding the clusters saved at `path`, with a zero radius.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let ref mut reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let mut miner = Self::default();
        miner.restore(reader)?;
        Ok(miner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn line(xs: &[f64]) -> Data {
        Data::infer(["x"], xs.iter().map(|&x| vec![Value::from(x)]).collect()).unwrap()
    }
    fn memberships(miner: &QTMiner) -> BTreeSet<Vec<Id>> {
        miner
            .clusters()
            .iter()
            .map(|c| c.iter().collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn line_splits_into_two_groups() {
        let data = line(&[0.0, 1.0, 2.0, 10.0, 11.0]);
        let mut miner = QTMiner::new(0.1).unwrap();
        assert_eq!(miner.compute(&data).unwrap(), 2);
        assert_eq!(
            memberships(&miner),
            BTreeSet::from([vec![0, 1, 2], vec![3, 4]])
        );
        let centroids = miner
            .clusters()
            .iter()
            .map(|c| c.centroid().to_string())
            .collect::<Vec<_>>();
        assert_eq!(centroids, vec!["10", "1"]);
    }
    #[test]
    fn ties_go_to_the_first_seed() {
        let data = line(&[0.0, 1.0, 3.0, 4.0]);
        let mut miner = QTMiner::new(0.25).unwrap();
        assert_eq!(miner.compute(&data).unwrap(), 2);
        let centroids = miner
            .clusters()
            .iter()
            .map(|c| c.centroid().to_string())
            .collect::<Vec<_>>();
        assert_eq!(centroids, vec!["0", "3"]);
    }
    #[test]
    fn clusters_partition_the_records_within_radius() {
        for _ in 0..32 {
            let data = Data::random();
            let radius = rand::random::<f64>() * 1.5;
            let mut miner = QTMiner::new(radius).unwrap();
            match miner.compute(&data) {
                Err(MiningError::ClusteringRadius(n)) => {
                    assert_eq!(n, data.len());
                    assert!(miner.clusters().is_empty());
                }
                Err(e) => panic!("unexpected failure: {}", e),
                Ok(count) => {
                    assert_eq!(count, miner.clusters().len());
                    let mut seen = vec![0; data.len()];
                    for cluster in miner.clusters().iter() {
                        for id in cluster.iter() {
                            seen[id] += 1;
                            let d = cluster.centroid().distance(&data.tuple(id).unwrap());
                            assert!(d.unwrap() <= radius);
                        }
                    }
                    assert!(seen.iter().all(|&n| n == 1));
                }
            }
        }
    }
    #[test]
    fn large_radius_is_degenerate() {
        let data = line(&[0.0, 1.0, 2.0, 10.0, 11.0]);
        let mut miner = QTMiner::new(1.0).unwrap();
        assert_eq!(miner.compute(&data), Err(MiningError::ClusteringRadius(5)));
        assert!(miner.clusters().is_empty());
    }
    #[test]
    fn empty_dataset_fails_first() {
        let data = line(&[]);
        let mut miner = QTMiner::new(0.5).unwrap();
        assert_eq!(miner.compute(&data), Err(MiningError::EmptyDataset));
        assert!(miner.clusters().is_empty());
    }
    #[test]
    fn identical_categorical_records_share_a_cluster() {
        let data = Data::infer(
            ["outlook", "wind"],
            vec![
                vec![Value::from("sunny"), Value::from("weak")],
                vec![Value::from("rain"), Value::from("strong")],
                vec![Value::from("sunny"), Value::from("weak")],
            ],
        )
        .unwrap();
        for radius in [0.0, 0.5, 1.0] {
            let mut miner = QTMiner::new(radius).unwrap();
            assert_eq!(miner.compute(&data).unwrap(), 2);
            assert!(miner.clusters().iter().any(|c| c.contains(0) && c.contains(2)));
        }
    }
    #[test]
    fn compute_replaces_previous_results() {
        let data = line(&[0.0, 1.0, 2.0, 10.0, 11.0]);
        let mut miner = QTMiner::new(0.1).unwrap();
        miner.compute(&data).unwrap();
        miner.compute(&data).unwrap();
        assert_eq!(miner.clusters().len(), 2);
    }
    #[test]
    fn failed_compute_leaves_no_clusters_behind() {
        let mut miner = QTMiner::new(0.1).unwrap();
        miner.compute(&line(&[0.0, 1.0, 2.0, 10.0, 11.0])).unwrap();
        assert_eq!(
            miner.compute(&line(&[4.0])),
            Err(MiningError::ClusteringRadius(1))
        );
        assert!(miner.clusters().is_empty());
    }
    #[test]
    fn non_finite_records_are_refused_before_mining() {
        let records = [0.0, 1.0, f64::NAN, 10.0, 11.0]
            .into_iter()
            .map(|x| vec![Value::from(x)])
            .collect();
        assert!(matches!(
            Data::infer(["x"], records),
            Err(MiningError::InvalidArgument(_))
        ));
    }
    #[test]
    fn unusable_radii_are_rejected() {
        assert!(QTMiner::new(-0.1).is_err());
        assert!(QTMiner::new(f64::NAN).is_err());
        assert!(QTMiner::new(f64::INFINITY).is_err());
        assert!(QTMiner::new(0.0).is_ok());
    }
    #[test]
    fn restore_replaces_clusters_and_keeps_radius() {
        let data = line(&[0.0, 1.0, 2.0, 10.0, 11.0]);
        let mut source = QTMiner::new(0.1).unwrap();
        source.compute(&data).unwrap();
        let mut bytes = Vec::new();
        source.clusters().write(&mut bytes).unwrap();

        let other = line(&[0.0, 5.0, 10.0]);
        let mut target = QTMiner::new(0.01).unwrap();
        target.compute(&other).unwrap();
        assert_eq!(target.restore(&mut Cursor::new(bytes)).unwrap(), 2);
        assert_eq!(target.radius(), 0.01);
        assert_eq!(memberships(&target), memberships(&source));
    }
}
