#[cfg(feature = "physics")]
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod time;
