use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::{Distance, GPSBounds, LonLat, METERS_PER_DEGREE_LAT};

use crate::{cell_label, Color, CoverageFootprint};

/// Refuse to generate absurdly dense grids, like 1m cells over a whole region.
pub const MAX_BOUNDARIES_PER_AXIS: usize = 5000;

/// How to draw the grid overlay.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSpec {
    pub cell_size: Distance,
    pub color: Color,
    pub label_color: Color,
    /// Trim grid lines and labels to the covered area. The perimeter always stays.
    pub clip_to_coverage: bool,
}

impl GridSpec {
    pub fn new(
        cell_size: Distance,
        color: Color,
        label_color: Color,
        clip_to_coverage: bool,
    ) -> Result<GridSpec> {
        if cell_size <= Distance::ZERO {
            bail!("Grid cell size {} must be positive", cell_size);
        }
        Ok(GridSpec {
            cell_size,
            color,
            label_color,
            clip_to_coverage,
        })
    }
}

/// A segment of constant latitude or constant longitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub pt1: LonLat,
    pub pt2: LonLat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLabel {
    /// Roughly the middle of the cell
    pub anchor: LonLat,
    pub text: String,
    /// 0 is the northernmost row
    pub row: usize,
    /// 0 is the westernmost column
    pub col: usize,
}

/// A grid of roughly square cells laid over the bounding box of a footprint. Rows start at the
/// northern edge and proceed south; columns start at the western edge and proceed east. Only
/// complete cells get labels, so a partial strip along the southern or eastern edge is left
/// unlabeled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    pub lines: Vec<GridLine>,
    pub labels: Vec<GridLabel>,
    /// The bounding box, closed
    pub perimeter: Vec<LonLat>,
    row_boundaries: Vec<f64>,
    col_boundaries: Vec<f64>,
}

impl Grid {
    pub fn empty() -> Grid {
        Grid {
            lines: Vec::new(),
            labels: Vec::new(),
            perimeter: Vec::new(),
            row_boundaries: Vec::new(),
            col_boundaries: Vec::new(),
        }
    }

    /// No footprint means nothing to draw, so an empty grid.
    pub fn generate(footprint: Option<&CoverageFootprint>, cell_size: Distance) -> Result<Grid> {
        match footprint {
            Some(footprint) => Grid::from_bounds(footprint.get_bounds(), cell_size),
            None => {
                if cell_size <= Distance::ZERO {
                    bail!("Grid cell size {} must be positive", cell_size);
                }
                Ok(Grid::empty())
            }
        }
    }

    pub fn from_bounds(bounds: &GPSBounds, cell_size: Distance) -> Result<Grid> {
        if cell_size <= Distance::ZERO {
            bail!("Grid cell size {} must be positive", cell_size);
        }
        if bounds.is_empty() {
            return Ok(Grid::empty());
        }

        let delta_lat = cell_size.inner_meters() / METERS_PER_DEGREE_LAT;
        // One longitude step for every row, measured at the middle latitude of the box
        let delta_lon = cell_size.inner_meters() * bounds.center().lon_degrees_per_meter();

        let row_boundaries = boundaries(bounds.max_lat(), bounds.min_lat(), -delta_lat)?;
        let col_boundaries = boundaries(bounds.min_lon(), bounds.max_lon(), delta_lon)?;

        let mut lines = Vec::new();
        for lat in &row_boundaries {
            lines.push(GridLine {
                pt1: LonLat::new(bounds.min_lon(), *lat),
                pt2: LonLat::new(bounds.max_lon(), *lat),
            });
        }
        for lon in &col_boundaries {
            lines.push(GridLine {
                pt1: LonLat::new(*lon, bounds.min_lat()),
                pt2: LonLat::new(*lon, bounds.max_lat()),
            });
        }

        // The last boundary in each direction only closes off the previous cell
        let mut labels = Vec::new();
        let num_rows = row_boundaries.len().saturating_sub(1);
        let num_cols = col_boundaries.len().saturating_sub(1);
        for (row, lat) in row_boundaries.iter().enumerate().take(num_rows) {
            for (col, lon) in col_boundaries.iter().enumerate().take(num_cols) {
                labels.push(GridLabel {
                    anchor: LonLat::new(lon + delta_lon / 2.0, lat - delta_lat / 2.0),
                    text: cell_label(row, col),
                    row,
                    col,
                });
            }
        }

        debug!(
            "Grid with {} cell size has {} rows, {} columns, {} lines",
            cell_size,
            num_rows,
            num_cols,
            lines.len()
        );

        Ok(Grid {
            lines,
            labels,
            perimeter: bounds.get_ring(),
            row_boundaries,
            col_boundaries,
        })
    }

    /// Keeps only the parts of the grid inside the footprint. Labels whose anchor falls outside
    /// are dropped. The perimeter and the row/column boundaries are untouched.
    pub fn clipped_to(mut self, footprint: &CoverageFootprint) -> Grid {
        let segments: Vec<(LonLat, LonLat)> =
            self.lines.iter().map(|line| (line.pt1, line.pt2)).collect();
        self.lines = footprint
            .clip_lines(&segments)
            .into_iter()
            .map(|pts| GridLine {
                pt1: pts[0],
                pt2: pts[pts.len() - 1],
            })
            .collect();
        self.labels.retain(|label| footprint.contains(label.anchor));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.labels.is_empty() && self.perimeter.is_empty()
    }

    /// Latitudes, from north to south
    pub fn row_boundaries(&self) -> &Vec<f64> {
        &self.row_boundaries
    }

    /// Longitudes, from west to east
    pub fn col_boundaries(&self) -> &Vec<f64> {
        &self.col_boundaries
    }

    /// (rows, columns) of complete cells
    pub fn num_cells(&self) -> (usize, usize) {
        (
            self.row_boundaries.len().saturating_sub(1),
            self.col_boundaries.len().saturating_sub(1),
        )
    }
}

/// From `start` towards `limit` (inclusive) in increments of `step`. Each value is computed from
/// its index, so rounding error doesn't accumulate. A value within rounding error of `limit`
/// counts as landing on it.
fn boundaries(start: f64, limit: f64, step: f64) -> Result<Vec<f64>> {
    let tolerance = step.abs() * 1e-9;
    let count = ((limit - start) / step + 1e-9).floor() + 1.0;
    if !(count <= MAX_BOUNDARIES_PER_AXIS as f64) {
        bail!(
            "The grid would need {} lines in one direction; use a bigger cell size",
            count
        );
    }
    let count = count as usize;

    let mut result = Vec::new();
    for i in 0..=count {
        let value = start + (i as f64) * step;
        let overshoot = if step < 0.0 {
            limit - value
        } else {
            value - limit
        };
        if overshoot > tolerance {
            break;
        }
        result.push(if overshoot.abs() <= tolerance {
            limit
        } else {
            value
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> GPSBounds {
        GPSBounds::from(&[
            LonLat::new(min_lon, min_lat),
            LonLat::new(max_lon, max_lat),
        ])
    }

    #[test]
    fn rows_start_north() {
        let grid =
            Grid::from_bounds(&bounds(-8.70, 39.20, -8.65, 39.25), Distance::meters(500.0))
                .unwrap();
        let rows = grid.row_boundaries();
        assert_eq!(rows[0], 39.25);
        assert!(rows.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(*rows.last().unwrap() >= 39.20);
        assert!(rows.last().unwrap() - 500.0 / METERS_PER_DEGREE_LAT < 39.20);

        let cols = grid.col_boundaries();
        assert_eq!(cols[0], -8.70);
        assert!(cols.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(*cols.last().unwrap() <= -8.65);

        let (num_rows, num_cols) = grid.num_cells();
        assert_eq!(num_rows, rows.len() - 1);
        assert_eq!(grid.labels.len(), num_rows * num_cols);
        assert_eq!(grid.lines.len(), rows.len() + cols.len());

        assert_eq!(grid.labels[0].text, "A1");
        assert!(grid.labels[0].text.ends_with('1'));
        assert_eq!(grid.labels[1].text, "B1");
        assert_eq!(grid.labels[num_cols].text, "A2");
        assert_eq!(grid.labels.last().unwrap().text, cell_label(num_rows - 1, num_cols - 1));
    }

    #[test]
    fn longitude_step_depends_on_latitude() {
        let cell = Distance::meters(500.0);
        let south = Grid::from_bounds(&bounds(10.0, 0.0, 10.05, 0.05), cell).unwrap();
        let north = Grid::from_bounds(&bounds(10.0, 60.0, 10.05, 60.05), cell).unwrap();
        let step = |grid: &Grid| grid.col_boundaries()[1] - grid.col_boundaries()[0];
        // cos(60) is half of cos(0), so a degree of longitude is half as long
        assert!((step(&north) / step(&south) - 2.0).abs() < 0.01);
        assert!(north.col_boundaries().len() < south.col_boundaries().len());
        // Rows don't care about latitude
        assert_eq!(north.row_boundaries().len(), south.row_boundaries().len());
    }

    #[test]
    fn cells_are_roughly_square() {
        let grid =
            Grid::from_bounds(&bounds(-8.70, 39.20, -8.65, 39.25), Distance::meters(500.0))
                .unwrap();
        let a1 = grid.labels[0].anchor;
        let b1 = grid.labels[1].anchor;
        let (_, num_cols) = grid.num_cells();
        let a2 = grid.labels[num_cols].anchor;
        assert!((a1.approx_dist(b1).inner_meters() - 500.0).abs() < 5.0);
        assert!((a1.approx_dist(a2).inner_meters() - 500.0).abs() < 5.0);
    }

    #[test]
    fn anchors_sit_inside_their_cells() {
        let grid =
            Grid::from_bounds(&bounds(-8.70, 39.20, -8.65, 39.25), Distance::meters(500.0))
                .unwrap();
        let rows = grid.row_boundaries();
        let cols = grid.col_boundaries();
        for label in &grid.labels {
            assert!(label.anchor.latitude < rows[label.row]);
            assert!(label.anchor.latitude > rows[label.row + 1]);
            assert!(label.anchor.longitude > cols[label.col]);
            assert!(label.anchor.longitude < cols[label.col + 1]);
            assert_eq!(label.text, cell_label(label.row, label.col));
        }
    }

    #[test]
    fn two_by_two() {
        let cell = Distance::meters(500.0);
        let delta_lat = 500.0 / METERS_PER_DEGREE_LAT;
        let min_lat = 39.0;
        let max_lat = min_lat + 2.5 * delta_lat;
        let delta_lon = 500.0 * LonLat::new(0.0, (min_lat + max_lat) / 2.0).lon_degrees_per_meter();
        let grid =
            Grid::from_bounds(&bounds(-8.7, min_lat, -8.7 + 2.5 * delta_lon, max_lat), cell)
                .unwrap();
        assert_eq!(grid.num_cells(), (2, 2));
        assert_eq!(grid.lines.len(), 6);
        let texts: Vec<&str> = grid.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn perimeter_is_the_bounding_box() {
        let grid =
            Grid::from_bounds(&bounds(-8.70, 39.20, -8.65, 39.25), Distance::meters(500.0))
                .unwrap();
        assert_eq!(
            grid.perimeter,
            vec![
                LonLat::new(-8.70, 39.20),
                LonLat::new(-8.65, 39.20),
                LonLat::new(-8.65, 39.25),
                LonLat::new(-8.70, 39.25),
                LonLat::new(-8.70, 39.20),
            ]
        );
        // Horizontal lines span the whole width, vertical lines the whole height
        for line in &grid.lines {
            if line.pt1.latitude == line.pt2.latitude {
                assert_eq!((line.pt1.longitude, line.pt2.longitude), (-8.70, -8.65));
            } else {
                assert_eq!(line.pt1.longitude, line.pt2.longitude);
                assert_eq!((line.pt1.latitude, line.pt2.latitude), (39.20, 39.25));
            }
        }
    }

    #[test]
    fn nothing_to_cover() {
        let grid = Grid::generate(None, Distance::meters(500.0)).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.num_cells(), (0, 0));
        assert!(Grid::from_bounds(&GPSBounds::new(), Distance::meters(500.0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn exact_multiple_of_the_cell_size() {
        let cell = Distance::meters(500.0);
        let delta_lat = 500.0 / METERS_PER_DEGREE_LAT;
        let min_lat = 39.0;
        let max_lat = min_lat + 2.0 * delta_lat;
        let delta_lon = 500.0 * LonLat::new(0.0, (min_lat + max_lat) / 2.0).lon_degrees_per_meter();
        let min_lon = -8.7;
        let max_lon = min_lon + 2.0 * delta_lon;
        let grid = Grid::from_bounds(&bounds(min_lon, min_lat, max_lon, max_lat), cell).unwrap();

        assert_eq!(grid.num_cells(), (2, 2));
        assert_eq!(grid.lines.len(), 6);
        assert_eq!(*grid.row_boundaries().last().unwrap(), min_lat);
        assert_eq!(*grid.col_boundaries().last().unwrap(), max_lon);
        let texts: Vec<&str> = grid.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["A1", "B1", "A2", "B2"]);

        // Other awkward decimal sizes that should divide evenly
        for meters in [100.0, 250.0, 333.3, 1000.0] {
            for cells in 1..20 {
                let step = meters / METERS_PER_DEGREE_LAT;
                let b = bounds(0.0, 10.0, 0.0001, 10.0 + (cells as f64) * step);
                let grid = Grid::from_bounds(&b, Distance::meters(meters)).unwrap();
                assert_eq!(grid.row_boundaries().len(), cells + 1);
                assert_eq!(*grid.row_boundaries().last().unwrap(), 10.0);
            }
        }
    }

    #[test]
    fn bad_cell_sizes() {
        let b = bounds(-8.70, 39.20, -8.65, 39.25);
        assert!(Grid::from_bounds(&b, Distance::ZERO).is_err());
        assert!(Grid::from_bounds(&b, Distance::meters(-100.0)).is_err());
        assert!(Grid::generate(None, Distance::ZERO).is_err());
        assert!(GridSpec::new(Distance::ZERO, Color::BLACK, Color::BLACK, false).is_err());
    }

    #[test]
    fn too_many_lines() {
        // 0.05 degrees of latitude is about 5.5km, so 1m cells need over 5000 rows
        let b = bounds(-8.70, 39.20, -8.65, 39.25);
        assert!(Grid::from_bounds(&b, Distance::meters(1.0)).is_err());
        assert!(Grid::from_bounds(&b, Distance::meters(0.1)).is_err());
        // Just under the limit on both axes is fine
        let step = 10.0 / METERS_PER_DEGREE_LAT;
        let tall = bounds(0.0, 0.0, 0.0001, (MAX_BOUNDARIES_PER_AXIS - 2) as f64 * step);
        assert_eq!(
            Grid::from_bounds(&tall, Distance::meters(10.0))
                .unwrap()
                .row_boundaries()
                .len(),
            MAX_BOUNDARIES_PER_AXIS - 1
        );
    }
}
