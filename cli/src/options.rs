use anyhow::{Context, Result};
use structopt::StructOpt;

use coverage::{Basemap, CellConfig, Color, CoverageConfig, MAX_CELLS};
use geom::LonLat;

/// Where the map config comes from. Everything given on the command line overrides the config
/// file, which overrides the defaults.
#[derive(StructOpt)]
pub struct ConfigArgs {
    /// A JSON config file. Missing fields take their defaults.
    #[structopt(long)]
    config: Option<String>,
    /// How many cells to draw, from 1 to 3. The rest are disabled.
    #[structopt(long)]
    cells: Option<usize>,
    /// Where every cell is, as "lat,lon"
    #[structopt(long, parse(try_from_str = LonLat::parse_lat_lon))]
    center: Option<LonLat>,
    /// The azimuth of each cell in degrees, in order. Repeat for more cells.
    #[structopt(long)]
    azimuth: Vec<f64>,
    /// The range of every cell, in kilometers
    #[structopt(long)]
    range_km: Option<f64>,
    /// The aperture of every cell, in degrees
    #[structopt(long)]
    aperture: Option<f64>,
    /// How many points to sample along each sector's arc
    #[structopt(long)]
    point_count: Option<usize>,
    /// Draw the labeled grid
    #[structopt(long)]
    grid: bool,
    /// The size of each grid cell, in meters
    #[structopt(long)]
    cell_size: Option<f64>,
    /// "#rrggbb" or a color name
    #[structopt(long)]
    grid_color: Option<Color>,
    /// "#rrggbb" or a color name
    #[structopt(long)]
    label_color: Option<Color>,
    /// Trim the grid to the covered area
    #[structopt(long)]
    clip_grid: bool,
    /// standard, satellite, or hybrid
    #[structopt(long)]
    basemap: Option<Basemap>,
}

impl ConfigArgs {
    pub fn load(self) -> Result<CoverageConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let raw = fs_err::read_to_string(path)?;
                let config: CoverageConfig =
                    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;
                info!("Loaded config from {}", path);
                config
            }
            None => CoverageConfig::default(),
        };
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(self, config: &mut CoverageConfig) -> Result<()> {
        if let Some(n) = self.cells {
            if n == 0 || n > MAX_CELLS {
                bail!("--cells must be between 1 and {}, not {}", MAX_CELLS, n);
            }
            while config.cells.len() < MAX_CELLS {
                config.cells.push(CellConfig::default_for(config.cells.len()));
            }
            for (idx, cell) in config.cells.iter_mut().enumerate() {
                cell.enabled = idx < n;
            }
        }
        if self.azimuth.len() > config.cells.len() {
            bail!(
                "{} azimuths given, but there are only {} cells",
                self.azimuth.len(),
                config.cells.len()
            );
        }
        for (cell, azimuth) in config.cells.iter_mut().zip(self.azimuth) {
            cell.azimuth_degrees = azimuth;
        }
        if let Some(center) = self.center {
            for cell in &mut config.cells {
                cell.latitude = center.latitude;
                cell.longitude = center.longitude;
            }
        }
        // The shared values only win if the cells don't override them
        if let Some(range_km) = self.range_km {
            config.range_km = range_km;
            for cell in &mut config.cells {
                cell.range_km = None;
            }
        }
        if let Some(aperture) = self.aperture {
            config.aperture_degrees = aperture;
            for cell in &mut config.cells {
                cell.aperture_degrees = None;
            }
        }
        if let Some(point_count) = self.point_count {
            config.point_count = point_count;
        }

        if self.grid {
            config.grid.enabled = true;
        }
        if let Some(cell_size) = self.cell_size {
            config.grid.cell_size_meters = cell_size;
        }
        if let Some(color) = self.grid_color {
            config.grid.color = color;
        }
        if let Some(color) = self.label_color {
            config.grid.label_color = color;
        }
        if self.clip_grid {
            config.grid.clip_to_coverage = true;
        }
        if let Some(basemap) = self.basemap {
            config.basemap = basemap;
        }
        Ok(())
    }
}
