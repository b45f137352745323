//! Wind bearing to compass arrow.

use std::fmt;

/// One of the eight 45° compass sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    const CLOCKWISE: [CompassPoint; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Classify a bearing in degrees (0 = north, clockwise).
    ///
    /// The bearing is normalised modulo 360 first, so 360 and -360 are north
    /// and -90 is west. Each sector is centred on its point and a boundary
    /// belongs to the clockwise neighbour: 22.5 is north-east, 337.5 is north.
    /// NaN and infinities classify as north.
    pub fn from_bearing(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self::North;
        }
        let normalized = degrees.rem_euclid(360.0);
        // `rem_euclid` may round up to exactly 360.0 for tiny negative inputs;
        // the `% 8` folds that back onto north.
        let sector = ((normalized + 22.5) / 45.0).floor() as usize % 8;
        Self::CLOCKWISE[sector]
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::North => "↑",
            Self::NorthEast => "↗",
            Self::East => "→",
            Self::SouthEast => "↘",
            Self::South => "↓",
            Self::SouthWest => "↙",
            Self::West => "←",
            Self::NorthWest => "↖",
        }
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Arrow glyph for a wind bearing in degrees.
pub fn arrow_for(degrees: f64) -> &'static str {
    CompassPoint::from_bearing(degrees).arrow()
}
