pub mod display;
pub mod resolver;

pub use display::{DisplayVolume, RoundingPolicy};
pub use resolver::{resolve, VolumeError};
