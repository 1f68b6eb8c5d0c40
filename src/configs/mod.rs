pub mod base;
pub mod cache;
pub mod server;
pub mod sources;
pub mod transcoder;

pub use base::*;
pub use cache::*;
pub use server::*;
pub use sources::*;
pub use transcoder::*;
