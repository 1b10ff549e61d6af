pub mod client;
pub use client::*;

pub mod console;
pub use console::*;
