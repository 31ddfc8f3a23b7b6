//! Named sides of a box and world axes.

use crate::util::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Center or one of the six faces of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Center,
    Left,
    Right,
    Bottom,
    Top,
    Back,
    Front,
}

impl Side {
    pub const ALL: [Side; 7] = [
        Side::Center,
        Side::Left,
        Side::Right,
        Side::Bottom,
        Side::Top,
        Side::Back,
        Side::Front,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Side::Center => "center",
            Side::Left => "left",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Top => "top",
            Side::Back => "back",
            Side::Front => "front",
        }
    }

    /// The side on the other end of the same axis. Center maps to itself.
    pub fn opposite(self) -> Side {
        match self {
            Side::Center => Side::Center,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
            Side::Back => Side::Front,
            Side::Front => Side::Back,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Side::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidSide(s.to_string()))
    }
}

/// A world or local axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two other axes, in ascending order.
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(Error::other(format!("Invalid axis: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_names_round_trip() {
        for side in Side::ALL {
            assert_eq!(side.name().parse::<Side>().unwrap(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
        assert!("middle".parse::<Side>().is_err());
    }

    #[test]
    fn test_axis_others() {
        assert_eq!(Axis::Y.others(), (Axis::X, Axis::Z));
        assert_eq!("Z".parse::<Axis>().unwrap().index(), 2);
    }
}
