use serde::{Deserialize, Serialize};

use crate::LonLat;

/// An axis-aligned bounding box in GPS space. A freshly created one is empty (inverted) until the
/// first point is added.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GPSBounds {
    pub(crate) min_lon: f64,
    pub(crate) min_lat: f64,
    pub(crate) max_lon: f64,
    pub(crate) max_lat: f64,
}

impl GPSBounds {
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: f64::MAX,
            min_lat: f64::MAX,
            max_lon: f64::MIN,
            max_lat: f64::MIN,
        }
    }

    pub fn from(pts: &[LonLat]) -> GPSBounds {
        let mut b = GPSBounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn update(&mut self, pt: LonLat) {
        self.min_lon = self.min_lon.min(pt.longitude);
        self.max_lon = self.max_lon.max(pt.longitude);
        self.min_lat = self.min_lat.min(pt.latitude);
        self.max_lat = self.max_lat.max(pt.latitude);
    }

    pub fn union(&mut self, other: &GPSBounds) {
        if other.is_empty() {
            return;
        }
        self.update(LonLat::new(other.min_lon, other.min_lat));
        self.update(LonLat::new(other.max_lon, other.max_lat));
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn contains(&self, pt: LonLat) -> bool {
        pt.longitude >= self.min_lon
            && pt.longitude <= self.max_lon
            && pt.latitude >= self.min_lat
            && pt.latitude <= self.max_lat
    }

    pub fn contains_bounds(&self, other: &GPSBounds) -> bool {
        self.contains(LonLat::new(other.min_lon, other.min_lat))
            && self.contains(LonLat::new(other.max_lon, other.max_lat))
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Counter-clockwise from the southwest corner, closed back on itself.
    pub fn get_ring(&self) -> Vec<LonLat> {
        vec![
            LonLat::new(self.min_lon, self.min_lat),
            LonLat::new(self.max_lon, self.min_lat),
            LonLat::new(self.max_lon, self.max_lat),
            LonLat::new(self.min_lon, self.max_lat),
            LonLat::new(self.min_lon, self.min_lat),
        ]
    }
}

impl Default for GPSBounds {
    fn default() -> Self {
        GPSBounds::new()
    }
}
