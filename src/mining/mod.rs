pub mod cluster;
pub use cluster::*;

pub mod clusterset;
pub use clusterset::*;

pub use crate::MiningError;

pub mod qtminer;
pub use qtminer::*;
