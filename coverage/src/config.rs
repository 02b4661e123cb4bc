use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::{Distance, LonLat};

use crate::{Color, GridSpec, Sector, DEFAULT_POINT_COUNT};

/// The map only has room for this many cells.
pub const MAX_CELLS: usize = 3;

const DEFAULT_CENTER: (f64, f64) = (-8.6807, 39.2369);
const DEFAULT_AZIMUTH: f64 = 40.0;
const DEFAULT_APERTURE: f64 = 120.0;
const DEFAULT_RANGE_KM: f64 = 3.0;
const DEFAULT_CELL_SIZE_METERS: f64 = 500.0;
const CELL_COLORS: [Color; MAX_CELLS] = [Color::BLUE, Color::RED, Color::GREEN];

/// Everything needed to draw one coverage map. Missing fields in a JSON file take their defaults,
/// so a config can be as small as `{}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub cells: Vec<CellConfig>,
    /// Used by every cell that doesn't set its own range
    pub range_km: f64,
    /// Used by every cell that doesn't set its own aperture
    pub aperture_degrees: f64,
    /// Samples along each sector's arc
    pub point_count: usize,
    pub grid: GridConfig,
    pub basemap: Basemap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub enabled: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub azimuth_degrees: f64,
    pub range_km: Option<f64>,
    pub aperture_degrees: Option<f64>,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub enabled: bool,
    pub cell_size_meters: f64,
    pub color: Color,
    pub label_color: Color,
    pub clip_to_coverage: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Basemap {
    Standard,
    Satellite,
    /// Satellite imagery with boundaries and place names on top
    Hybrid,
}

/// Where a renderer should fetch tiles from. Nothing here fetches anything.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
    pub overlay: bool,
}

impl CellConfig {
    /// The default for the `idx`th cell. Cells fan out 120 degrees apart and only the first is
    /// enabled.
    pub fn default_for(idx: usize) -> CellConfig {
        CellConfig {
            enabled: idx == 0,
            latitude: DEFAULT_CENTER.1,
            longitude: DEFAULT_CENTER.0,
            azimuth_degrees: (DEFAULT_AZIMUTH + 120.0 * idx as f64).rem_euclid(360.0),
            range_km: None,
            aperture_degrees: None,
            color: CELL_COLORS[idx % MAX_CELLS],
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

impl Default for CellConfig {
    fn default() -> Self {
        CellConfig::default_for(0)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            enabled: false,
            cell_size_meters: DEFAULT_CELL_SIZE_METERS,
            color: Color::BLACK,
            label_color: Color::BLACK,
            clip_to_coverage: false,
        }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        CoverageConfig {
            cells: (0..MAX_CELLS).map(CellConfig::default_for).collect(),
            range_km: DEFAULT_RANGE_KM,
            aperture_degrees: DEFAULT_APERTURE,
            point_count: DEFAULT_POINT_COUNT,
            grid: GridConfig::default(),
            basemap: Basemap::Standard,
        }
    }
}

impl CoverageConfig {
    /// One sector per enabled cell, named after the cell's position in the config ("Cell 1" and
    /// so on). Fails on any invalid cell, rather than skipping it.
    pub fn sectors(&self) -> Result<Vec<Sector>> {
        if self.cells.len() > MAX_CELLS {
            bail!(
                "At most {} cells are supported, but {} were configured",
                MAX_CELLS,
                self.cells.len()
            );
        }
        let mut sectors = Vec::new();
        for (idx, cell) in self.cells.iter().enumerate() {
            if !cell.enabled {
                continue;
            }
            let name = format!("Cell {}", idx + 1);
            let range_km = cell.range_km.unwrap_or(self.range_km);
            if !(range_km * 1000.0).is_finite() {
                bail!("{} has a bad range {}", name, range_km);
            }
            let sector = Sector::new(
                name.clone(),
                cell.center(),
                cell.azimuth_degrees,
                cell.aperture_degrees.unwrap_or(self.aperture_degrees),
                Distance::kilometers(range_km),
                cell.color,
            )
            .map_err(|err| anyhow!("{} is invalid: {}", name, err))?;
            sectors.push(sector);
        }
        Ok(sectors)
    }

    /// `None` if the grid is disabled.
    pub fn grid_spec(&self) -> Result<Option<GridSpec>> {
        if !self.grid.enabled {
            return Ok(None);
        }
        if !self.grid.cell_size_meters.is_finite() {
            bail!("Bad grid cell size {}", self.grid.cell_size_meters);
        }
        GridSpec::new(
            Distance::meters(self.grid.cell_size_meters),
            self.grid.color,
            self.grid.label_color,
            self.grid.clip_to_coverage,
        )
        .map(Some)
    }

    /// Where to center the map before anything is fit: the first enabled cell, or the default
    /// location.
    pub fn default_center(&self) -> LonLat {
        self.cells
            .iter()
            .find(|cell| cell.enabled)
            .map(|cell| cell.center())
            .unwrap_or_else(|| LonLat::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1))
    }
}

impl Basemap {
    pub fn tile_layers(self) -> Vec<TileLayer> {
        let carto = TileLayer {
            name: "CartoDB Positron",
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            attribution: "&copy; OpenStreetMap contributors &copy; CARTO",
            overlay: false,
        };
        let imagery = TileLayer {
            name: "Esri World Imagery",
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            attribution: "Esri",
            overlay: false,
        };
        let labels = TileLayer {
            name: "Labels",
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/Reference/World_Boundaries_and_Places/MapServer/tile/{z}/{y}/{x}",
            attribution: "Esri",
            overlay: true,
        };
        match self {
            Basemap::Standard => vec![carto],
            Basemap::Satellite => vec![imagery],
            Basemap::Hybrid => vec![imagery, labels],
        }
    }
}

impl FromStr for Basemap {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Basemap> {
        match raw.to_ascii_lowercase().as_str() {
            "standard" => Ok(Basemap::Standard),
            "satellite" => Ok(Basemap::Satellite),
            "hybrid" => Ok(Basemap::Hybrid),
            _ => bail!("Unknown basemap {}; try standard, satellite, or hybrid", raw),
        }
    }
}

impl Default for Basemap {
    fn default() -> Self {
        Basemap::Standard
    }
}
