//! # Position Geometry
//!
//! Maps each of the eight named aim positions onto the fixed (x, y) screen
//! coordinate of its target. Coordinates never depend on speed, swing or spin.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of aim positions.
pub const NUM_POSITIONS: usize = 8;

/// Coordinate returned for an identifier which isn't one of the known positions.
pub const DEFAULT_COORDINATE: PositionCoordinate = PositionCoordinate { x: 150, y: 40 };

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Target coordinate of an aim position, in screen units.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionCoordinate {
    pub x: i32,
    pub y: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The named aim positions of the machine.
///
/// Serialised using the identifiers found in the calibration sheets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    #[serde(rename = "centre - 0")]
    Centre,
    #[serde(rename = "top- 1")]
    Top,
    #[serde(rename = "left - 2")]
    Left,
    #[serde(rename = "right - 3")]
    Right,
    #[serde(rename = "bottom - 4")]
    Bottom,
    #[serde(rename = "top-mid-centre-5")]
    TopMidCentre,
    #[serde(rename = "top-mid-left-6")]
    TopMidLeft,
    #[serde(rename = "top-mid-right-7")]
    TopMidRight,
}

/// An identifier that doesn't name any known position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown aim position identifier {0:?}")]
pub struct UnknownPosition(pub String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Position {
    /// All positions in enumeration order.
    pub const ALL: [Position; NUM_POSITIONS] = [
        Position::Centre,
        Position::Top,
        Position::Left,
        Position::Right,
        Position::Bottom,
        Position::TopMidCentre,
        Position::TopMidLeft,
        Position::TopMidRight,
    ];

    /// The identifier used for this position in calibration sheets and datasets.
    pub fn id(&self) -> &'static str {
        match self {
            Position::Centre => "centre - 0",
            Position::Top => "top- 1",
            Position::Left => "left - 2",
            Position::Right => "right - 3",
            Position::Bottom => "bottom - 4",
            Position::TopMidCentre => "top-mid-centre-5",
            Position::TopMidLeft => "top-mid-left-6",
            Position::TopMidRight => "top-mid-right-7",
        }
    }

    /// The fixed target coordinate of this position.
    pub fn coordinate(&self) -> PositionCoordinate {
        let (x, y) = match self {
            Position::Centre => (150, 40),
            Position::Top => (150, 5),
            Position::Left => (0, 40),
            Position::Right => (300, 40),
            Position::Bottom => (150, 80),
            Position::TopMidCentre => (150, 25),
            Position::TopMidLeft => (0, 25),
            Position::TopMidRight => (300, 25),
        };

        PositionCoordinate { x, y }
    }

    /// True for the three positions on the top-mid row.
    pub fn is_top_mid(&self) -> bool {
        matches!(
            self,
            Position::TopMidCentre | Position::TopMidLeft | Position::TopMidRight
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Position::ALL
            .iter()
            .find(|p| p.id() == s)
            .copied()
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the target coordinate for a raw position identifier.
///
/// Identifiers are validated upstream, so an unknown identifier yields
/// [`DEFAULT_COORDINATE`] instead of an error.
pub fn coordinate_of(position_id: &str) -> PositionCoordinate {
    position_id
        .parse::<Position>()
        .map(|p| p.coordinate())
        .unwrap_or(DEFAULT_COORDINATE)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_coordinate_table() {
        let expected = [
            ("centre - 0", 150, 40),
            ("top- 1", 150, 5),
            ("left - 2", 0, 40),
            ("right - 3", 300, 40),
            ("bottom - 4", 150, 80),
            ("top-mid-centre-5", 150, 25),
            ("top-mid-left-6", 0, 25),
            ("top-mid-right-7", 300, 25),
        ];

        for (id, x, y) in expected.iter() {
            assert_eq!(coordinate_of(id), PositionCoordinate { x: *x, y: *y });
        }
    }

    #[test]
    fn test_unknown_position_uses_default() {
        assert_eq!(coordinate_of("middle - 9"), DEFAULT_COORDINATE);
        assert_eq!(coordinate_of(""), PositionCoordinate { x: 150, y: 40 });
        assert_eq!(
            "middle - 9".parse::<Position>(),
            Err(UnknownPosition("middle - 9".into()))
        );
    }

    #[test]
    fn test_ids_parse_back() {
        for p in Position::ALL.iter() {
            assert_eq!(p.id().parse::<Position>(), Ok(*p));
            assert_eq!(format!("{}", p), p.id());
        }

        // Sheets sometimes carry stray whitespace around the identifier
        assert_eq!(" top- 1 ".parse::<Position>(), Ok(Position::Top));
    }

    #[test]
    fn test_serde_uses_sheet_ids() {
        let json = serde_json::to_string(&Position::TopMidLeft).unwrap();
        assert_eq!(json, "\"top-mid-left-6\"");

        let p: Position = serde_json::from_str("\"bottom - 4\"").unwrap();
        assert_eq!(p, Position::Bottom);
    }
}
