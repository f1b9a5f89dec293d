//! AQI color scales for visualization
//!
//! Two palettes are in circulation for the same six AQI bands and neither is
//! authoritative, so callers pick one explicitly:
//!
//! ```rust
//! use aqi_client::{Palette, Rgb};
//!
//! assert_eq!(Palette::Legend.rgb(42), Rgb::new(0, 153, 102));
//! assert_eq!(Palette::Saturated.rgb(42), Rgb::new(0, 152, 0));
//! assert_eq!(Palette::Legend.rgb(-1), Rgb::BLACK);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Color for values outside every band
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS-style hex notation, e.g. `#009966`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

/// AQI category band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// 0 to 50
    Good,
    /// 51 to 100
    Moderate,
    /// 101 to 150
    UnhealthyForSensitiveGroups,
    /// 151 to 200
    Unhealthy,
    /// 201 to 300
    VeryUnhealthy,
    /// Above 300
    Hazardous,
}

impl Level {
    /// Band containing `aqi`; negative values belong to no band
    pub fn from_aqi(aqi: i64) -> Option<Self> {
        match aqi {
            i64::MIN..=-1 => None,
            0..=50 => Some(Level::Good),
            51..=100 => Some(Level::Moderate),
            101..=150 => Some(Level::UnhealthyForSensitiveGroups),
            151..=200 => Some(Level::Unhealthy),
            201..=300 => Some(Level::VeryUnhealthy),
            301..=i64::MAX => Some(Level::Hazardous),
        }
    }

    /// Human-readable band name
    pub fn label(&self) -> &'static str {
        match self {
            Level::Good => "Good",
            Level::Moderate => "Moderate",
            Level::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Level::Unhealthy => "Unhealthy",
            Level::VeryUnhealthy => "Very Unhealthy",
            Level::Hazardous => "Hazardous",
        }
    }
}

/// A named AQI color scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Fully saturated green/orange/red/magenta scale
    Saturated,
    /// Teal-to-maroon scale used by the public aqicn.org legend
    Legend,
}

impl Palette {
    /// Color for a band
    pub fn color(&self, level: Level) -> Rgb {
        match (self, level) {
            (Palette::Saturated, Level::Good) => Rgb::new(0, 152, 0),
            (Palette::Saturated, Level::Moderate) => Rgb::new(255, 152, 0),
            (Palette::Saturated, Level::UnhealthyForSensitiveGroups) => Rgb::new(255, 50, 0),
            (Palette::Saturated, Level::Unhealthy) => Rgb::new(255, 0, 0),
            (Palette::Saturated, Level::VeryUnhealthy) => Rgb::new(255, 0, 152),
            (Palette::Saturated, Level::Hazardous) => Rgb::new(255, 0, 35),

            (Palette::Legend, Level::Good) => Rgb::new(0, 153, 102),
            (Palette::Legend, Level::Moderate) => Rgb::new(255, 222, 51),
            (Palette::Legend, Level::UnhealthyForSensitiveGroups) => Rgb::new(255, 153, 51),
            (Palette::Legend, Level::Unhealthy) => Rgb::new(204, 0, 51),
            (Palette::Legend, Level::VeryUnhealthy) => Rgb::new(102, 0, 153),
            (Palette::Legend, Level::Hazardous) => Rgb::new(126, 0, 35),
        }
    }

    /// Color for an AQI value
    ///
    /// Defined for every input; negative values map to [`Rgb::BLACK`].
    pub fn rgb(&self, aqi: i64) -> Rgb {
        Level::from_aqi(aqi)
            .map(|level| self.color(level))
            .unwrap_or(Rgb::BLACK)
    }
}

/// Color for an AQI value on `palette`
pub fn rgb(palette: Palette, aqi: i64) -> Rgb {
    palette.rgb(aqi)
}
