use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use std::str::FromStr;

/// Which side of its marker a point's label sits on.
///
/// The assignment is curated per row in the input file; nothing here
/// derives it from the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side '{0}'")]
pub struct UnknownSide(pub String);

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "right" => Ok(Side::Right),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            _ => Err(UnknownSide(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub year: String,
    pub miles: f64,
    pub gas: f64,
    pub side: Side,
}

impl DataPoint {
    pub fn new(year: impl Into<String>, miles: f64, gas: f64, side: Side) -> Self {
        Self {
            year: year.into(),
            miles,
            gas,
            side,
        }
    }
}

/// Rows in file order. The order is the drawing order of the curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub points: Vec<DataPoint>,
}

impl Dataset {
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn miles_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.miles))
    }

    pub fn gas_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.gas))
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sides_case_insensitively() {
        assert_eq!("Top".parse::<Side>(), Ok(Side::Top));
        assert_eq!(" left ".parse::<Side>(), Ok(Side::Left));
        let err = "middle".parse::<Side>().unwrap_err();
        assert_eq!(err, UnknownSide("middle".to_string()));
        assert_eq!(err.to_string(), "unknown side 'middle'");
    }

    #[test]
    fn extents_follow_data() {
        let data = Dataset::new(vec![
            DataPoint::new("1", 3.0, 2.0, Side::Top),
            DataPoint::new("2", 1.0, 5.0, Side::Left),
        ]);
        assert_eq!(data.miles_extent(), Some((1.0, 3.0)));
        assert_eq!(data.gas_extent(), Some((2.0, 5.0)));
        assert_eq!(Dataset::default().miles_extent(), None);
    }
}
