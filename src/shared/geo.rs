use std::{
    cmp,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

pub(crate) const EARTH_RADIUS: Distance = Distance::from_meters(6_371_000.0);

/// Road or great-circle length in meters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, value| acc + value)
    }
}

impl From<u32> for Distance {
    fn from(value: u32) -> Self {
        Self(value as f64)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Great-circle distance over a spherical earth (law of cosines).
    pub fn great_circle_distance(&self, coord: &Self) -> Distance {
        if self == coord {
            return Distance::default();
        }
        let lat_a = self.latitude.to_radians();
        let lat_b = coord.latitude.to_radians();
        let delta_lon = (self.longitude - coord.longitude).abs().to_radians();
        let arc =
            (lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lon.cos()).acos();
        Distance::from_meters(arc * EARTH_RADIUS.as_meters())
    }
}

#[test]
fn distance_sum_test() {
    let total: Distance = [100.0, 400.0, 500.0]
        .into_iter()
        .map(Distance::from_meters)
        .sum();
    assert_eq!(total, Distance::from_kilometers(1.0));
}

#[test]
fn great_circle_same_point_test() {
    let coord = Coordinate {
        latitude: 55.611087,
        longitude: 37.20829,
    };
    assert_eq!(coord.great_circle_distance(&coord), Distance::default());
}

#[test]
fn great_circle_distance_test() {
    let coord_a = Coordinate {
        latitude: 55.611087,
        longitude: 37.20829,
    };
    let coord_b = Coordinate {
        latitude: 55.595884,
        longitude: 37.209755,
    };
    let d = coord_a.great_circle_distance(&coord_b);
    assert!((d.as_meters() - 1693.0).abs() < 10.0);
}
