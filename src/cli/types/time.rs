//! Season type for NHL stats requests.

use crate::error::{Result, StatsError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An NHL season, identified by the year it starts in.
///
/// The API names a season by concatenating its start and end years: the
/// season that starts in 2019 and ends in 2020 is `20192020`. `Display`
/// renders that token and serde uses it as the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season {
    start_year: u16,
}

impl Season {
    pub fn new(start_year: u16) -> Self {
        Self { start_year }
    }

    pub fn start_year(&self) -> u16 {
        self.start_year
    }

    pub fn end_year(&self) -> u16 {
        self.start_year + 1
    }

    /// The API token, e.g. `20152016`.
    pub fn token(&self) -> String {
        format!("{}{}", self.start_year, self.end_year())
    }
}

impl Default for Season {
    fn default() -> Self {
        Self::new(2019)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start_year, self.end_year())
    }
}

impl FromStr for Season {
    type Err = StatsError;

    /// Accepts either the eight-digit token (`20152016`) or a bare start year (`2015`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || StatsError::InvalidSeason {
            input: s.to_string(),
        };

        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        match s.len() {
            4 => Ok(Self::new(s.parse()?)),
            8 => {
                let start: u16 = s[..4].parse()?;
                let end: u16 = s[4..].parse()?;
                if end != start + 1 {
                    return Err(invalid());
                }
                Ok(Self::new(start))
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for Season {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_token() {
        let season = Season::new(2015);
        assert_eq!(season.token(), "20152016");
        assert_eq!(season.to_string(), "20152016");
        assert_eq!(season.end_year(), 2016);
    }

    #[test]
    fn test_season_from_token() {
        assert_eq!("20192020".parse::<Season>().unwrap(), Season::new(2019));
    }

    #[test]
    fn test_season_from_start_year() {
        assert_eq!("2009".parse::<Season>().unwrap(), Season::new(2009));
    }

    #[test]
    fn test_season_rejects_non_consecutive_years() {
        assert!(matches!(
            "20152017".parse::<Season>(),
            Err(StatsError::InvalidSeason { .. })
        ));
    }

    #[test]
    fn test_season_rejects_garbage() {
        assert!("".parse::<Season>().is_err());
        assert!("2015-16".parse::<Season>().is_err());
        assert!("201520".parse::<Season>().is_err());
        assert!("abcd".parse::<Season>().is_err());
    }

    #[test]
    fn test_season_serde_uses_token() {
        let json = serde_json::to_value(Season::new(2016)).unwrap();
        assert_eq!(json, serde_json::json!("20162017"));

        let back: Season = serde_json::from_value(json).unwrap();
        assert_eq!(back, Season::new(2016));
    }
}
