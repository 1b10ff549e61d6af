pub mod clusters;
pub mod disk;

pub use disk::Disk;
