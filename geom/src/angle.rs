use std::fmt;

use serde::{Deserialize, Serialize};

/// A compass bearing: 0 is north, increasing clockwise. Stored in radians and not normalized, so
/// sweeping past 360 degrees (or below 0) keeps producing the same trigonometry.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    pub fn radians(rads: f64) -> Angle {
        Angle(rads)
    }

    /// Not normalized; may be negative or exceed 2*pi.
    pub fn inner_radians(self) -> f64 {
        self.0
    }

    /// In [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        self.0.to_degrees().rem_euclid(360.0)
    }

    /// The smallest rotation in degrees, always in [0, 180], between two bearings.
    pub fn degrees_between(self, other: Angle) -> f64 {
        let diff = (self.normalized_degrees() - other.normalized_degrees()).abs();
        if diff > 180.0 {
            360.0 - diff
        } else {
            diff
        }
    }

    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        self.degrees_between(other) <= within_degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_around_north() {
        assert_eq!(Angle::degrees(-20.0).normalized_degrees().round(), 340.0);
        assert_eq!(Angle::degrees(400.0).normalized_degrees().round(), 40.0);
        assert!(Angle::degrees(350.0).approx_eq(Angle::degrees(10.0), 20.0 + 1e-9));
        assert!(!Angle::degrees(350.0).approx_eq(Angle::degrees(10.0), 19.0));
        assert!((Angle::degrees(90.0).degrees_between(Angle::degrees(270.0)) - 180.0).abs() < 1e-9);
    }
}
