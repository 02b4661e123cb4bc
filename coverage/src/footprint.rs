use geo::{BooleanOps, Contains};

use geom::{GPSBounds, LonLat};

use crate::SectorPolygon;

/// The union of every active sector. Overlapping sectors merge into one polygon; disjoint ones
/// stay separate members of the multipolygon.
#[derive(Clone, Debug)]
pub struct CoverageFootprint {
    polygons: geo::MultiPolygon,
    // From the input vertices, not the union's output
    bounds: GPSBounds,
}

/// Folds all of the sector polygons into one footprint. Returns `None` when there's nothing to
/// cover, which callers should treat as "nothing to draw."
pub fn union_footprint(polygons: &[SectorPolygon]) -> Option<CoverageFootprint> {
    let mut result: Option<CoverageFootprint> = None;
    for polygon in polygons {
        let next = geo::MultiPolygon::new(vec![polygon.to_geo()]);
        result = Some(match result {
            None => CoverageFootprint {
                polygons: next,
                bounds: polygon.get_bounds(),
            },
            Some(mut acc) => {
                acc.polygons = acc.polygons.union(&next);
                acc.bounds.union(&polygon.get_bounds());
                acc
            }
        });
    }
    if let Some(ref footprint) = result {
        debug!(
            "Unioned {} sectors into {} polygons",
            polygons.len(),
            footprint.polygons.0.len()
        );
    }
    result
}

impl CoverageFootprint {
    pub fn get_bounds(&self) -> &GPSBounds {
        &self.bounds
    }

    pub fn to_geo(&self) -> &geo::MultiPolygon {
        &self.polygons
    }

    /// Each polygon as a list of rings, exterior first. Rings are closed (first point repeated).
    pub fn rings(&self) -> Vec<Vec<Vec<LonLat>>> {
        self.polygons
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors().iter())
                    .map(|ring| ring.coords().map(|c| LonLat::from(*c)).collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Is the point strictly inside the footprint?
    pub fn contains(&self, pt: LonLat) -> bool {
        self.polygons.contains(&geo::Point::from(pt))
    }

    /// Keeps only the parts of each line inside the footprint. One input line may become several
    /// pieces, or vanish entirely.
    pub fn clip_lines(&self, lines: &[(LonLat, LonLat)]) -> Vec<Vec<LonLat>> {
        let input = geo::MultiLineString::new(
            lines
                .iter()
                .map(|(pt1, pt2)| geo::LineString::new(vec![(*pt1).into(), (*pt2).into()]))
                .collect(),
        );
        self.polygons
            .clip(&input, false)
            .into_iter()
            .map(|ls| ls.into_inner().into_iter().map(LonLat::from).collect::<Vec<_>>())
            .filter(|pts| pts.len() >= 2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use geom::Distance;

    use super::*;
    use crate::{Color, Sector};

    fn polygon(lon: f64, lat: f64, azimuth: f64) -> SectorPolygon {
        Sector::new(
            "test".to_string(),
            LonLat::new(lon, lat),
            azimuth,
            120.0,
            Distance::kilometers(3.0),
            Color::BLUE,
        )
        .unwrap()
        .polygon(30)
        .unwrap()
    }

    #[test]
    fn empty_union() {
        assert!(union_footprint(&[]).is_none());
    }

    #[test]
    fn single_sector() {
        let p = polygon(-8.6807, 39.2369, 40.0);
        let footprint = union_footprint(&[p.clone()]).unwrap();
        assert_eq!(footprint.get_bounds(), &p.get_bounds());
        assert_eq!(footprint.to_geo().0.len(), 1);
        // A point well inside the wedge, along the azimuth
        let inside = LonLat::new(-8.6807, 39.2369)
            .offset_by_bearing(Distance::kilometers(1.5), geom::Angle::degrees(40.0));
        assert!(footprint.contains(inside));
        let behind = LonLat::new(-8.6807, 39.2369)
            .offset_by_bearing(Distance::kilometers(1.5), geom::Angle::degrees(220.0));
        assert!(!footprint.contains(behind));
    }

    #[test]
    fn union_bounds_cover_every_input() {
        let inputs = vec![
            polygon(-8.6807, 39.2369, 40.0),
            polygon(-8.6807, 39.2369, 160.0),
            polygon(-8.6500, 39.2500, 280.0),
        ];
        let footprint = union_footprint(&inputs).unwrap();
        for p in &inputs {
            assert!(footprint.get_bounds().contains_bounds(&p.get_bounds()));
        }
        // The first two share a center and an edge, so they merge
        assert!(!footprint.to_geo().0.is_empty());
        assert!(footprint.to_geo().0.len() <= 2);
    }

    #[test]
    fn disjoint_sectors_stay_separate() {
        let inputs = vec![polygon(-8.70, 39.20, 0.0), polygon(-8.40, 39.20, 0.0)];
        let footprint = union_footprint(&inputs).unwrap();
        assert_eq!(footprint.to_geo().0.len(), 2);
        assert_eq!(footprint.rings().len(), 2);
        for rings in footprint.rings() {
            let exterior = &rings[0];
            assert_eq!(exterior[0], exterior[exterior.len() - 1]);
        }
    }

    #[test]
    fn clip_drops_outside_lines() {
        let footprint = union_footprint(&[polygon(-8.6807, 39.2369, 0.0)]).unwrap();
        let center_lat = 39.2369 + 0.01;
        let pieces = footprint.clip_lines(&[
            // Crosses the wedge horizontally
            (LonLat::new(-8.75, center_lat), LonLat::new(-8.60, center_lat)),
            // Entirely south of the wedge
            (LonLat::new(-8.75, 39.10), LonLat::new(-8.60, 39.10)),
        ]);
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        for pt in piece {
            assert!((pt.latitude - center_lat).abs() < 1e-7);
            assert!(pt.longitude > -8.75 && pt.longitude < -8.60);
        }
    }
}
