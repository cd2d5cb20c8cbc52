//! Service module that exports the rendering backends used to present shared locations

pub mod visualization;

// rexport the service traits and their factory functions
pub use visualization::canvas::Canvas;
pub use visualization::compass::{new_compass_rendering_handler, CompassDrawingService};
pub use visualization::map::{new_map_rendering_handler, MapDrawingService};
