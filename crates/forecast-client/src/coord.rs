// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Clicked map coordinates.
//!
//! Coordinates are rounded to a fixed number of decimal places as soon as they
//! are captured. The rounded text is what gets displayed and what gets sent to
//! the forecast API, so the stored value is always the parse of that text.

use std::fmt;

/// Number of decimal places kept for clicked coordinates.
pub const COORDINATE_PRECISION: usize = 4;

/// A latitude/longitude pair rounded to [`COORDINATE_PRECISION`] decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Round a raw click position to display precision.
    #[must_use]
    pub fn rounded(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_fixed(latitude),
            longitude: round_fixed(longitude),
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude as fixed-point text, e.g. `51.5074`.
    #[must_use]
    pub fn latitude_text(&self) -> String {
        fixed(self.latitude)
    }

    /// Longitude as fixed-point text, e.g. `-0.1278`.
    #[must_use]
    pub fn longitude_text(&self) -> String {
        fixed(self.longitude)
    }

    /// Query parameters for the forecast endpoint (`lat` and `long`).
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("lat", self.latitude_text()), ("long", self.longitude_text())]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude_text(), self.longitude_text())
    }
}

/// Fixed-point text with ties rounded away from zero (`0.03125` becomes
/// `0.0313`), which plain `{:.4}` would round to even.
fn fixed(value: f64) -> String {
    let value = if is_exact_tie(value) {
        // next representable value, one step further from zero
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{:.*}", COORDINATE_PRECISION, value)
}

/// True when `value` lies exactly halfway between two rounded values.
fn is_exact_tie(value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    // wide enough to show any nonzero remainder for map coordinates
    let wide = format!("{:.40}", value.abs());
    let Some((_, fraction)) = wide.split_once('.') else {
        return false;
    };
    let mut rest = fraction.bytes().skip(COORDINATE_PRECISION);
    rest.next() == Some(b'5') && rest.all(|digit| digit == b'0')
}

fn round_fixed(value: f64) -> f64 {
    fixed(value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_four_decimals() {
        let coord = Coordinate::rounded(51.507_351, -0.127_758);
        assert_eq!(coord.latitude_text(), "51.5074");
        assert_eq!(coord.longitude_text(), "-0.1278");
        assert!((coord.latitude() - 51.5074).abs() < f64::EPSILON);
        assert!((coord.longitude() + 0.1278).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pads_short_values() {
        let coord = Coordinate::rounded(54.5, -3.0);
        assert_eq!(coord.to_string(), "54.5000, -3.0000");
    }

    #[test]
    fn test_rounding_is_stable() {
        let once = Coordinate::rounded(12.345_678_9, 98.765_432_1);
        let twice = Coordinate::rounded(once.latitude(), once.longitude());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        let coord = Coordinate::rounded(0.031_25, -0.031_25);
        assert_eq!(coord.latitude_text(), "0.0313");
        assert_eq!(coord.longitude_text(), "-0.0313");

        let coord = Coordinate::rounded(0.156_25, -10.968_75);
        assert_eq!(coord.to_string(), "0.1563, -10.9688");
    }

    #[test]
    fn test_near_ties_round_normally() {
        let coord = Coordinate::rounded(0.031_249, 0.031_251);
        assert_eq!(coord.to_string(), "0.0312, 0.0313");
    }

    #[test]
    fn test_query_pairs() {
        let coord = Coordinate::rounded(55.953_252, -3.188_267);
        let [lat, long] = coord.query_pairs();
        assert_eq!(lat, ("lat", "55.9533".to_string()));
        assert_eq!(long, ("long", "-3.1883".to_string()));
    }
}
