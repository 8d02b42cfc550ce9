//! Canonical channel identifiers (`h19`, `v37`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TbError;

/// Radiometer polarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Polarization {
    Horizontal,
    Vertical,
}

impl Polarization {
    /// Parse a single polarization character, case-insensitive (`H`, `v`, ...).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(Polarization::Horizontal),
            'v' => Some(Polarization::Vertical),
            _ => None,
        }
    }

    /// Lower-case code used in channel keys.
    pub fn code(&self) -> char {
        match self {
            Polarization::Horizontal => 'h',
            Polarization::Vertical => 'v',
        }
    }
}

/// Canonical `{polarization}{frequency}` key, e.g. `h19`.
///
/// Frequency codes keep their leading zeros (`h06`), so the key round-trips
/// through its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKey {
    // Field order gives lexicographic ordering of the rendered key.
    polarization: Polarization,
    frequency: String,
}

impl ChannelKey {
    /// Build a key from a frequency code (digits only) and a polarization.
    pub fn new(frequency: &str, polarization: Polarization) -> Result<Self, TbError> {
        if frequency.len() < 2 || !frequency.chars().all(|c| c.is_ascii_digit()) {
            return Err(TbError::InvalidField {
                name: frequency.to_string(),
                reason: "channel frequency must be two or more digits".to_string(),
            });
        }
        Ok(Self {
            polarization,
            frequency: frequency.to_string(),
        })
    }

    /// Build a key from the `channel` and `polarization` captures of a
    /// product-specific pattern (`"19"`, `"H"`).
    pub fn from_parts(channel: &str, polarization: &str) -> Result<Self, TbError> {
        let mut chars = polarization.chars();
        let pol = match (chars.next(), chars.next()) {
            (Some(c), None) => Polarization::from_char(c),
            _ => None,
        }
        .ok_or_else(|| TbError::InvalidField {
            name: format!("{}{}", channel, polarization),
            reason: format!("unknown polarization `{}`", polarization),
        })?;
        Self::new(channel, pol)
    }

    pub fn polarization(&self) -> Polarization {
        self.polarization
    }

    /// Frequency code as it appears in the key (e.g. "06", "19", "89").
    pub fn frequency(&self) -> &str {
        &self.frequency
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.polarization.code(), self.frequency)
    }
}

impl FromStr for ChannelKey {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let pol = chars
            .next()
            .filter(|c| c.is_ascii_lowercase())
            .and_then(Polarization::from_char)
            .ok_or_else(|| TbError::InvalidField {
                name: s.to_string(),
                reason: "channel key must start with `h` or `v`".to_string(),
            })?;
        Self::new(chars.as_str(), pol)
    }
}

impl Serialize for ChannelKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChannelKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let key = ChannelKey::from_parts("19", "H").unwrap();
        assert_eq!(key.to_string(), "h19");
        assert_eq!(key.polarization(), Polarization::Horizontal);

        let key = ChannelKey::from_parts("89", "v").unwrap();
        assert_eq!(key.to_string(), "v89");
    }

    #[test]
    fn test_leading_zero_preserved() {
        let key = ChannelKey::from_parts("06", "H").unwrap();
        assert_eq!(key.to_string(), "h06");
        assert_eq!(key.frequency(), "06");
    }

    #[test]
    fn test_parse_roundtrip() {
        for s in ["h19", "v37", "h06", "v89", "h183"] {
            let key: ChannelKey = s.parse().unwrap();
            assert_eq!(key.to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        for s in ["x19", "h", "h1", "h1a", "H19", "", "19h"] {
            assert!(s.parse::<ChannelKey>().is_err(), "{} should not parse", s);
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut keys: Vec<ChannelKey> = ["v37", "h19", "v19", "h37"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["h19", "h37", "v19", "v37"]);
    }
}
