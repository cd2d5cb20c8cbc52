//! Draw compass needles and map markers for shared locations
pub mod canvas;
pub mod compass;
pub mod map;
pub mod raster;

#[cfg(test)]
pub(crate) mod mock;
