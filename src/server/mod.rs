pub mod protocol;
pub use protocol::*;

pub mod server;
pub use server::*;

pub mod session;
pub use session::*;
