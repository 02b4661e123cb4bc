use anyhow::Result;
use serde::Serialize;

use geom::{Angle, Distance, GPSBounds, LonLat};

use crate::Color;

/// How many points to sample along the arc when the caller doesn't care. 30 to 40 looks smooth.
pub const DEFAULT_POINT_COUNT: usize = 30;
/// More samples than this don't look any smoother, just make huge polygons.
pub const MAX_POINT_COUNT: usize = 10_000;

/// The coverage wedge of one directional antenna. Only constructed through `Sector::new`, so the
/// aperture and range are always valid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sector {
    pub name: String,
    pub center: LonLat,
    azimuth_degrees: f64,
    aperture_degrees: f64,
    range: Distance,
    pub color: Color,
}

impl Sector {
    /// The azimuth is wrapped into [0, 360). The aperture must be in (0, 360] and the range
    /// positive.
    pub fn new(
        name: String,
        center: LonLat,
        azimuth_degrees: f64,
        aperture_degrees: f64,
        range: Distance,
        color: Color,
    ) -> Result<Sector> {
        check_inputs(center, azimuth_degrees, aperture_degrees, range)?;
        Ok(Sector {
            name,
            center,
            azimuth_degrees: azimuth_degrees.rem_euclid(360.0),
            aperture_degrees,
            range,
            color,
        })
    }

    pub fn azimuth(&self) -> Angle {
        Angle::degrees(self.azimuth_degrees)
    }

    pub fn azimuth_degrees(&self) -> f64 {
        self.azimuth_degrees
    }

    pub fn aperture_degrees(&self) -> f64 {
        self.aperture_degrees
    }

    pub fn range(&self) -> Distance {
        self.range
    }

    pub fn polygon(&self, point_count: usize) -> Result<SectorPolygon> {
        let points = generate_sector_polygon(
            self.center,
            self.azimuth_degrees,
            self.range,
            self.aperture_degrees,
            point_count,
        )?;
        Ok(SectorPolygon { points })
    }
}

/// Approximates the coverage wedge: `point_count` samples along the arc from
/// `azimuth - aperture/2` to `azimuth + aperture/2` (both ends included), followed by the center
/// to close the pie slice.
///
/// Uses a flat-earth approximation around `center` (111km per degree of latitude, scaled by
/// `cos(latitude)` for longitude). That's fine for a few kilometers away from the poles, and
/// meaningless near them.
pub fn generate_sector_polygon(
    center: LonLat,
    azimuth_degrees: f64,
    range: Distance,
    aperture_degrees: f64,
    point_count: usize,
) -> Result<Vec<LonLat>> {
    check_inputs(center, azimuth_degrees, aperture_degrees, range)?;
    if point_count < 2 {
        bail!("A sector needs at least 2 points along its arc, not {}", point_count);
    }
    if point_count > MAX_POINT_COUNT {
        bail!(
            "A sector can have at most {} points along its arc, not {}",
            MAX_POINT_COUNT,
            point_count
        );
    }

    let start = azimuth_degrees - aperture_degrees / 2.0;
    let end = azimuth_degrees + aperture_degrees / 2.0;
    let steps = (point_count - 1) as f64;

    let mut points = Vec::with_capacity(point_count + 1);
    for i in 0..point_count {
        // Pin the last sample, so both edges are exactly half the aperture away from the azimuth
        let degrees = if i == point_count - 1 {
            end
        } else {
            start + (end - start) * (i as f64) / steps
        };
        points.push(center.offset_by_bearing(range, Angle::degrees(degrees)));
    }
    points.push(center);
    Ok(points)
}

fn check_inputs(
    center: LonLat,
    azimuth_degrees: f64,
    aperture_degrees: f64,
    range: Distance,
) -> Result<()> {
    if !center.latitude.is_finite() || !center.longitude.is_finite() {
        bail!("Sector center {} isn't finite", center);
    }
    if center.latitude.abs() >= 90.0 {
        bail!("Sector center {} is at or beyond a pole", center);
    }
    if !azimuth_degrees.is_finite() {
        bail!("Azimuth {} isn't finite", azimuth_degrees);
    }
    if !(aperture_degrees > 0.0 && aperture_degrees <= 360.0) {
        bail!("Aperture {} must be in (0, 360] degrees", aperture_degrees);
    }
    if range <= Distance::ZERO {
        bail!("Range {} must be positive", range);
    }
    Ok(())
}

/// The ring of a sector: arc samples, then the center. The closing edge from the center back to
/// the first arc point is implicit. Always has at least 2 arc points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectorPolygon {
    points: Vec<LonLat>,
}

impl SectorPolygon {
    pub fn points(&self) -> &Vec<LonLat> {
        &self.points
    }

    /// Just the samples along the arc
    pub fn arc(&self) -> &[LonLat] {
        &self.points[..self.points.len() - 1]
    }

    pub fn center(&self) -> LonLat {
        self.points[self.points.len() - 1]
    }

    /// The points with the first repeated at the end, for formats that want explicitly closed
    /// rings.
    pub fn closed_ring(&self) -> Vec<LonLat> {
        let mut pts = self.points.clone();
        pts.push(self.points[0]);
        pts
    }

    pub fn get_bounds(&self) -> GPSBounds {
        GPSBounds::from(&self.points)
    }

    pub fn to_geo(&self) -> geo::Polygon {
        let exterior: Vec<geo::Coord> = self.closed_ring().into_iter().map(|pt| pt.into()).collect();
        geo::Polygon::new(geo::LineString::new(exterior), Vec::new())
    }
}
