use std::{
    cmp,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use serde::{Deserialize, Serialize};

/// Travel or wait duration in minutes.
///
/// Fractional values are expected: ride times come from dividing road
/// distance by velocity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Minutes(f64);

impl PartialEq for Minutes {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Minutes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sub for Minutes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Minutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, value| acc + value)
    }
}

impl From<u32> for Minutes {
    fn from(value: u32) -> Self {
        Self(value as f64)
    }
}

impl Minutes {
    pub const fn from_minutes(minutes: f64) -> Self {
        Self(minutes)
    }

    pub const fn as_minutes(&self) -> f64 {
        self.0
    }

    /// Total order on the scalar, NaN-free inputs assumed for weights.
    pub fn total_cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[test]
fn minutes_add_test() {
    let total = Minutes::from_minutes(6.0) + Minutes::from_minutes(5.85);
    assert_eq!(total, Minutes::from_minutes(11.85));
}

#[test]
fn minutes_from_wait_test() {
    let wait: Minutes = 6u32.into();
    assert_eq!(wait.as_minutes(), 6.0);
}

#[test]
fn minutes_sum_test() {
    let total: Minutes = [1.0, 2.0, 3.5].into_iter().map(Minutes::from_minutes).sum();
    assert_eq!(total, Minutes::from_minutes(6.5));
}
