pub mod map;

pub use map::{map, RunOutput};
