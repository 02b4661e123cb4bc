//! Small planar geometry types in GPS space. Everything here uses a local equirectangular
//! approximation, which is fine for the few kilometers a single coverage map spans, but breaks
//! down near the poles where `cos(latitude)` approaches zero.

#[macro_use]
extern crate anyhow;

mod angle;
mod bounds;
mod distance;
mod gps;

pub use crate::angle::Angle;
pub use crate::bounds::GPSBounds;
pub use crate::distance::Distance;
pub use crate::gps::{LonLat, METERS_PER_DEGREE_LAT};
