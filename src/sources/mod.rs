pub mod provider;
pub mod youtube;

pub use provider::*;
