pub mod loader;
pub mod sample;

pub use loader::*;
pub use sample::*;
