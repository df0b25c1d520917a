//! Unit handling for takeoff values
//!
//! Measurements carry the unit their calibration was entered in. Conversion
//! between units goes through meters; area and volume values convert with the
//! square and cube of the linear factor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Real-world length unit a calibration is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
    Yards,
}

impl Unit {
    /// Length of one of this unit, in meters.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            Unit::Millimeters => 0.001,
            Unit::Centimeters => 0.01,
            Unit::Meters => 1.0,
            Unit::Inches => 0.0254,
            Unit::Feet => 0.3048,
            Unit::Yards => 0.9144,
        }
    }

    /// Short label for display ("mm", "ft", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Meters => "m",
            Unit::Inches => "in",
            Unit::Feet => "ft",
            Unit::Yards => "yd",
        }
    }

    /// Convert a linear value from one unit to another.
    pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
        if from == to {
            return value;
        }
        value * from.meters_per_unit() / to.meters_per_unit()
    }

    /// Convert an area value (square units scale with the square of the
    /// linear factor).
    pub fn convert_area(value: f64, from: Unit, to: Unit) -> f64 {
        if from == to {
            return value;
        }
        let factor = from.meters_per_unit() / to.meters_per_unit();
        value * factor * factor
    }

    /// Convert a volume value (cubic units scale with the cube of the
    /// linear factor).
    pub fn convert_volume(value: f64, from: Unit, to: Unit) -> f64 {
        if from == to {
            return value;
        }
        let factor = from.meters_per_unit() / to.meters_per_unit();
        value * factor * factor * factor
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Feet
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Unit::Millimeters),
            "cm" | "centimeter" | "centimeters" => Ok(Unit::Centimeters),
            "m" | "meter" | "meters" => Ok(Unit::Meters),
            "in" | "inch" | "inches" => Ok(Unit::Inches),
            "ft" | "foot" | "feet" => Ok(Unit::Feet),
            "yd" | "yard" | "yards" => Ok(Unit::Yards),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}
