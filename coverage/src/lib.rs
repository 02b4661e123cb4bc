//! Coverage maps for up to three radio cells (BTS sectors). Each cell becomes a wedge-shaped
//! polygon, the wedges are unioned into one footprint, and a labeled grid of fixed-size cells can
//! be laid over the footprint. Everything here is pure computation. `Scene` bundles the results
//! for a renderer, as GeoJSON; KML export lives in the `kml` crate.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod color;
mod config;
mod footprint;
mod grid;
mod labels;
mod scene;
mod sector;

pub use crate::color::Color;
pub use crate::config::{Basemap, CellConfig, CoverageConfig, GridConfig, TileLayer, MAX_CELLS};
pub use crate::footprint::{union_footprint, CoverageFootprint};
pub use crate::grid::{Grid, GridLabel, GridLine, GridSpec, MAX_BOUNDARIES_PER_AXIS};
pub use crate::labels::{cell_label, column_label};
pub use crate::scene::{MapView, Marker, Scene, SectorOverlay};
pub use crate::sector::{
    generate_sector_polygon, Sector, SectorPolygon, DEFAULT_POINT_COUNT, MAX_POINT_COUNT,
};
