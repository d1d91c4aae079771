//! Unit conversion utilities
//!
//! The label model stores every length in points. Preferences choose the
//! unit lengths are displayed and entered in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// PostScript points (1/72 inch)
    Point,
    /// Inches
    #[default]
    Inch,
    /// Millimeters
    Mm,
    /// Centimeters
    Cm,
    /// Picas (12 points)
    Pica,
}

impl Units {
    /// Number of points in one of these units.
    pub fn points_per_unit(self) -> f64 {
        match self {
            Self::Point => 1.0,
            Self::Inch => 72.0,
            Self::Mm => 72.0 / 25.4,
            Self::Cm => 72.0 / 2.54,
            Self::Pica => 12.0,
        }
    }

    /// Digits shown after the decimal point when formatting.
    pub fn precision(self) -> usize {
        match self {
            Self::Point => 1,
            Self::Inch => 3,
            Self::Mm => 1,
            Self::Cm => 2,
            Self::Pica => 1,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Point => "pt",
            Self::Inch => "in",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::Pica => "pc",
        }
    }

    pub fn to_points(self, value: f64) -> f64 {
        value * self.points_per_unit()
    }

    pub fn from_points(self, points: f64) -> f64 {
        points / self.points_per_unit()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "point" | "points" => Ok(Self::Point),
            "in" | "inch" | "inches" => Ok(Self::Inch),
            "mm" => Ok(Self::Mm),
            "cm" => Ok(Self::Cm),
            "pc" | "pica" | "picas" => Ok(Self::Pica),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}

/// Format a length given in points for display in `units`.
pub fn format_length(points: f64, units: Units) -> String {
    format!(
        "{:.*} {}",
        units.precision(),
        units.from_points(points),
        units.abbreviation()
    )
}
