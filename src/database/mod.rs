//! Record sources: where the [`Data`](crate::data::Data) behind a table comes from.
pub mod error;
pub use error::*;

pub mod memory;
pub use memory::*;

#[cfg(feature = "database")]
pub mod postgres;
#[cfg(feature = "database")]
pub use postgres::*;

pub mod source;
pub use source::*;
