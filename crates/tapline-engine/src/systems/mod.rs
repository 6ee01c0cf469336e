pub mod audio;
pub mod color;
pub mod polyline;
pub mod text;
#[cfg(feature = "vectors")]
pub mod vector;
