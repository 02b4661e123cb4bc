use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Angle, Distance};

/// Roughly how many meters one degree of latitude spans anywhere on Earth. One degree of
/// longitude spans this times `cos(latitude)`.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// longitude is x, latitude is y
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// Parses "lat,lon", the order people copy out of most map UIs.
    pub fn parse_lat_lon(raw: &str) -> Result<LonLat> {
        let parts: Vec<&str> = raw.split(',').map(|x| x.trim()).collect();
        if parts.len() != 2 {
            bail!("{} isn't in the form lat,lon", raw);
        }
        let lat = parts[0].parse::<f64>()?;
        let lon = parts[1].parse::<f64>()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            bail!("{} is out of range", raw);
        }
        Ok(LonLat::new(lon, lat))
    }

    /// How many degrees of longitude one meter spans at this latitude. Undefined at the poles.
    pub fn lon_degrees_per_meter(&self) -> f64 {
        1.0 / (METERS_PER_DEGREE_LAT * self.latitude.to_radians().cos())
    }

    /// Moves `dist` away along a compass bearing, treating the neighborhood of this point as a flat
    /// plane. The longitude offset is stretched by the meridian convergence at this point's
    /// latitude.
    pub fn offset_by_bearing(&self, dist: Distance, bearing: Angle) -> LonLat {
        let (sin, cos) = bearing.inner_radians().sin_cos();
        let meters = dist.inner_meters();
        let dlat = (meters / METERS_PER_DEGREE_LAT) * cos;
        let dlon = meters * self.lon_degrees_per_meter() * sin;
        LonLat::new(self.longitude + dlon, self.latitude + dlat)
    }

    /// The compass bearing from this point to another, under the same flat approximation as
    /// `offset_by_bearing`.
    pub fn bearing_to(&self, other: LonLat) -> Angle {
        let dy = other.latitude - self.latitude;
        let dx = (other.longitude - self.longitude) * self.latitude.to_radians().cos();
        Angle::radians(dx.atan2(dy))
    }

    /// Equirectangular distance, the inverse of `offset_by_bearing`.
    pub fn approx_dist(&self, other: LonLat) -> Distance {
        let dy = other.latitude - self.latitude;
        let dx = (other.longitude - self.longitude) * self.latitude.to_radians().cos();
        Distance::meters((dx * dx + dy * dy).sqrt() * METERS_PER_DEGREE_LAT)
    }

    pub fn center(pts: &[LonLat]) -> LonLat {
        let mut lon = 0.0;
        let mut lat = 0.0;
        for pt in pts {
            lon += pt.longitude;
            lat += pt.latitude;
        }
        let len = pts.len() as f64;
        LonLat {
            longitude: lon / len,
            latitude: lat / len,
        }
    }

    /// GeoJSON and KML both want (longitude, latitude)
    pub fn to_geojson_position(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

impl From<LonLat> for geo::Coord {
    fn from(pt: LonLat) -> Self {
        geo::Coord {
            x: pt.longitude,
            y: pt.latitude,
        }
    }
}

impl From<LonLat> for geo::Point {
    fn from(pt: LonLat) -> Self {
        geo::Point::new(pt.longitude, pt.latitude)
    }
}

impl From<geo::Coord> for LonLat {
    fn from(coord: geo::Coord) -> Self {
        LonLat::new(coord.x, coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_back() {
        let origin = LonLat::new(-8.6807, 39.2369);
        for degs in [0.0, 40.0, 90.0, 200.0, 315.0] {
            let pt = origin.offset_by_bearing(Distance::kilometers(3.0), Angle::degrees(degs));
            assert!(origin.bearing_to(pt).approx_eq(Angle::degrees(degs), 1e-6));
            assert!((origin.approx_dist(pt).inner_meters() - 3000.0).abs() < 1e-6);
        }

        let north = origin.offset_by_bearing(Distance::kilometers(1.11), Angle::ZERO);
        assert!((north.latitude - origin.latitude - 0.01).abs() < 1e-12);
        assert_eq!(north.longitude, origin.longitude);
    }

    #[test]
    fn parse_lat_lon() {
        let pt = LonLat::parse_lat_lon("39.2369, -8.6807").unwrap();
        assert_eq!(pt, LonLat::new(-8.6807, 39.2369));
        assert!(LonLat::parse_lat_lon("39.2369").is_err());
        assert!(LonLat::parse_lat_lon("139.0,1.0").is_err());
        assert!(LonLat::parse_lat_lon("abc,1.0").is_err());
    }
}
