use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, Value};

use geom::{GPSBounds, LonLat};

use crate::{
    union_footprint, Basemap, CoverageConfig, CoverageFootprint, Grid, GridSpec, Sector,
    SectorPolygon, TileLayer,
};

/// Matches the translucency the map uses for sector fills
const SECTOR_FILL_OPACITY: f64 = 0.3;
const DEFAULT_ZOOM: u8 = 14;

/// One sector, ready to draw.
#[derive(Clone, Debug)]
pub struct SectorOverlay {
    pub sector: Sector,
    pub polygon: SectorPolygon,
}

/// A pin at a cell's location.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: LonLat,
    pub tooltip: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: LonLat,
    pub zoom: u8,
    /// What to fit the map to. `None` when there's nothing drawn.
    pub fit_bounds: Option<GPSBounds>,
}

/// Everything derived from one `CoverageConfig`. Rebuilt from scratch whenever the config
/// changes.
#[derive(Clone, Debug)]
pub struct Scene {
    pub sectors: Vec<SectorOverlay>,
    pub markers: Vec<Marker>,
    pub footprint: Option<CoverageFootprint>,
    pub grid: Option<(GridSpec, Grid)>,
    pub basemap: Basemap,
    pub view: MapView,
}

impl Scene {
    pub fn build(config: &CoverageConfig) -> Result<Scene> {
        let mut sectors = Vec::new();
        let mut markers = Vec::new();
        for sector in config.sectors()? {
            let polygon = sector.polygon(config.point_count)?;
            debug!(
                "{} at {}: azimuth {}, aperture {}, range {}, {} points",
                sector.name,
                sector.center,
                sector.azimuth_degrees(),
                sector.aperture_degrees(),
                sector.range(),
                polygon.points().len()
            );
            markers.push(Marker {
                position: sector.center,
                tooltip: format!(
                    "BTS {}, {}",
                    sector.center.latitude, sector.center.longitude
                ),
            });
            sectors.push(SectorOverlay { sector, polygon });
        }

        let polygons: Vec<SectorPolygon> = sectors.iter().map(|s| s.polygon.clone()).collect();
        let footprint = union_footprint(&polygons);

        let grid = match config.grid_spec()? {
            Some(spec) => {
                let mut grid = Grid::generate(footprint.as_ref(), spec.cell_size)?;
                if spec.clip_to_coverage {
                    if let Some(ref footprint) = footprint {
                        grid = grid.clipped_to(footprint);
                    }
                }
                Some((spec, grid))
            }
            None => None,
        };

        let fit_bounds = footprint.as_ref().map(|footprint| {
            let mut bounds = footprint.get_bounds().clone();
            for marker in &markers {
                bounds.update(marker.position);
            }
            bounds
        });
        let view = MapView {
            center: config.default_center(),
            zoom: DEFAULT_ZOOM,
            fit_bounds,
        };

        Ok(Scene {
            sectors,
            markers,
            footprint,
            grid,
            basemap: config.basemap,
            view,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.footprint.is_none()
    }

    pub fn tile_layers(&self) -> Vec<TileLayer> {
        self.basemap.tile_layers()
    }

    /// The whole scene as GeoJSON, with simplestyle-ish properties for whatever draws it.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();

        for overlay in &self.sectors {
            let ring = overlay
                .polygon
                .closed_ring()
                .into_iter()
                .map(|pt| pt.to_geojson_position())
                .collect();
            let mut feature = new_feature(Value::Polygon(vec![ring]));
            feature.set_property("type", "sector");
            feature.set_property("name", overlay.sector.name.clone());
            feature.set_property("azimuth", overlay.sector.azimuth_degrees());
            feature.set_property("aperture", overlay.sector.aperture_degrees());
            feature.set_property("range_km", overlay.sector.range().inner_kilometers());
            feature.set_property("stroke", overlay.sector.color.to_hex());
            feature.set_property("fill", overlay.sector.color.to_hex());
            feature.set_property("fill-opacity", SECTOR_FILL_OPACITY);
            features.push(feature);
        }

        for marker in &self.markers {
            let mut feature = new_feature(Value::Point(marker.position.to_geojson_position()));
            feature.set_property("type", "marker");
            feature.set_property("tooltip", marker.tooltip.clone());
            features.push(feature);
        }

        if let Some(ref footprint) = self.footprint {
            let mut feature = new_feature(Value::from(footprint.to_geo()));
            feature.set_property("type", "footprint");
            feature.set_property("fill-opacity", 0.0);
            features.push(feature);
        }

        if let Some((ref spec, ref grid)) = self.grid {
            for line in &grid.lines {
                let mut feature = new_feature(Value::LineString(vec![
                    line.pt1.to_geojson_position(),
                    line.pt2.to_geojson_position(),
                ]));
                feature.set_property("type", "grid line");
                feature.set_property("stroke", spec.color.to_hex());
                features.push(feature);
            }
            for label in &grid.labels {
                let mut feature = new_feature(Value::Point(label.anchor.to_geojson_position()));
                feature.set_property("type", "grid label");
                feature.set_property("label", label.text.clone());
                feature.set_property("label-color", spec.label_color.to_hex());
                features.push(feature);
            }
            if !grid.perimeter.is_empty() {
                let mut feature = new_feature(Value::LineString(
                    grid.perimeter
                        .iter()
                        .map(|pt| pt.to_geojson_position())
                        .collect(),
                ));
                feature.set_property("type", "grid perimeter");
                feature.set_property("stroke", spec.color.to_hex());
                feature.set_property("stroke-width", 3);
                features.push(feature);
            }
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn new_feature(value: Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use geom::Distance;

    use super::*;

    fn properties(fc: &FeatureCollection, kind: &str) -> usize {
        fc.features
            .iter()
            .filter(|f| f.property("type").and_then(|v| v.as_str()) == Some(kind))
            .count()
    }

    #[test]
    fn default_config() {
        let scene = Scene::build(&CoverageConfig::default()).unwrap();
        assert_eq!(scene.sectors.len(), 1);
        assert_eq!(scene.sectors[0].polygon.points().len(), 31);
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].tooltip, "BTS 39.2369, -8.6807");
        assert!(scene.grid.is_none());
        assert!(!scene.is_empty());
        assert_eq!(scene.view.zoom, 14);
        assert_eq!(scene.view.center, LonLat::new(-8.6807, 39.2369));

        let fit = scene.view.fit_bounds.as_ref().unwrap();
        assert!(fit.contains(scene.markers[0].position));
        assert!(fit.contains_bounds(&scene.sectors[0].polygon.get_bounds()));

        let fc = scene.to_geojson();
        assert_eq!(properties(&fc, "sector"), 1);
        assert_eq!(properties(&fc, "marker"), 1);
        assert_eq!(properties(&fc, "footprint"), 1);
        assert_eq!(properties(&fc, "grid line"), 0);
    }

    #[test]
    fn nothing_enabled() {
        let mut config = CoverageConfig::default();
        config.cells[0].enabled = false;
        config.grid.enabled = true;
        let scene = Scene::build(&config).unwrap();
        assert!(scene.is_empty());
        assert!(scene.view.fit_bounds.is_none());
        let (_, grid) = scene.grid.as_ref().unwrap();
        assert!(grid.is_empty());
        assert!(scene.to_geojson().features.is_empty());
    }

    #[test]
    fn three_cells_with_grid() {
        let mut config = CoverageConfig::default();
        for cell in &mut config.cells {
            cell.enabled = true;
        }
        config.grid.enabled = true;
        let scene = Scene::build(&config).unwrap();
        assert_eq!(scene.sectors.len(), 3);
        let footprint = scene.footprint.as_ref().unwrap();
        for overlay in &scene.sectors {
            assert!(footprint
                .get_bounds()
                .contains_bounds(&overlay.polygon.get_bounds()));
        }

        let (spec, grid) = scene.grid.as_ref().unwrap();
        assert_eq!(spec.cell_size, Distance::meters(500.0));
        // Three 120 degree wedges make a ~6km wide disc
        let (rows, cols) = grid.num_cells();
        assert!(rows >= 10 && rows <= 13);
        assert!(cols >= 10 && cols <= 13);
        assert_eq!(grid.labels[0].text, "A1");

        let fc = scene.to_geojson();
        assert_eq!(properties(&fc, "sector"), 3);
        assert_eq!(properties(&fc, "grid line"), grid.lines.len());
        assert_eq!(properties(&fc, "grid label"), grid.labels.len());
        assert_eq!(properties(&fc, "grid perimeter"), 1);
    }

    #[test]
    fn clipped_grid() {
        let mut config = CoverageConfig::default();
        config.grid.enabled = true;
        let unclipped = Scene::build(&config).unwrap();
        config.grid.clip_to_coverage = true;
        let clipped = Scene::build(&config).unwrap();

        let (_, full) = unclipped.grid.as_ref().unwrap();
        let (_, trimmed) = clipped.grid.as_ref().unwrap();
        assert!(trimmed.labels.len() < full.labels.len());
        assert!(!trimmed.labels.is_empty());
        assert_eq!(trimmed.perimeter, full.perimeter);
        let footprint = clipped.footprint.as_ref().unwrap();
        for label in &trimmed.labels {
            assert!(footprint.contains(label.anchor));
        }
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let mut config = CoverageConfig::default();
        config.cells[1].enabled = true;
        config.grid.enabled = true;
        let a = Scene::build(&config).unwrap();
        let b = Scene::build(&config).unwrap();
        assert_eq!(a.to_geojson(), b.to_geojson());
    }

    #[test]
    fn huge_point_count_is_an_error() {
        let config: CoverageConfig =
            serde_json::from_str(r#"{"point_count": 18446744073709551615}"#).unwrap();
        assert!(Scene::build(&config).is_err());
        let config: CoverageConfig = serde_json::from_str(r#"{"point_count": 10000000000}"#).unwrap();
        assert!(Scene::build(&config).is_err());
    }
}
