//! Writes coverage maps as KML documents and reads them back.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod export;
mod load;

pub use crate::export::{
    export_scene, export_vector_markup, GRID_ALPHA, KML_MIME_TYPE, SECTOR_ALPHA,
};
pub use crate::load::{load, parse, KmlShape, ShapeKind};

/// The name of the folder holding sector polygons and cell markers
pub const SECTORS_FOLDER: &str = "Sectors";
/// The name of the folder holding grid lines, labels, and the perimeter
pub const GRID_FOLDER: &str = "Grid";
pub const PERIMETER_NAME: &str = "Perimeter";
