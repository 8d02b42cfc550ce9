//! Polar hemisphere selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TbError;

/// North or south polar coverage area.
///
/// Determines grid shape and the hemisphere tokens used in product
/// filenames and variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Full lowercase name ("north" or "south").
    pub fn name(&self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }

    /// Upper-case initial used in filenames ("N" or "S").
    pub fn initial(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }

    /// Lower-case initial ("n" or "s").
    pub fn initial_lower(&self) -> char {
        self.initial().to_ascii_lowercase()
    }

    /// Short name used in variable names ("NH" or "SH").
    pub fn short_name(&self) -> &'static str {
        match self {
            Hemisphere::North => "NH",
            Hemisphere::South => "SH",
        }
    }

    /// Shape `(rows, cols)` of the legacy 25km polar stereographic binary grids.
    pub fn binary_grid_shape(&self) -> (usize, usize) {
        match self {
            Hemisphere::North => (448, 304),
            Hemisphere::South => (332, 316),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hemisphere {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "nh" => Ok(Hemisphere::North),
            "south" | "s" | "sh" => Ok(Hemisphere::South),
            other => Err(TbError::UnsupportedProductVariant(format!(
                "unknown hemisphere `{}`",
                other
            ))),
        }
    }
}
