pub mod attribute;
pub use attribute::*;

pub mod data;
pub use data::*;

pub mod item;
pub use item::*;

pub mod tuple;
pub use tuple::*;

pub mod value;
pub use value::*;
