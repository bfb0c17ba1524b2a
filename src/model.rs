//! Match results of a 1-X-2 football pool

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected match data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("home team name is empty")]
    EmptyHomeTeam,
    #[error("away team name is empty")]
    EmptyAwayTeam,
    #[error("unknown result token {0:?}, expected 1, X or 2")]
    UnknownOutcome(String),
}

/// Outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// Home win, token `1`
    #[serde(rename = "1")]
    Home1,
    /// Draw, token `X`
    #[serde(rename = "X")]
    Draw,
    /// Away win, token `2`
    #[serde(rename = "2")]
    Away2,
}

impl Outcome {
    /// Canonical token stored in the database
    pub fn token(&self) -> &'static str {
        match self {
            Outcome::Home1 => "1",
            Outcome::Draw => "X",
            Outcome::Away2 => "2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Outcome::Home1),
            "X" | "x" => Ok(Outcome::Draw),
            "2" => Ok(Outcome::Away2),
            other => Err(ValidationError::UnknownOutcome(other.to_string())),
        }
    }
}

/// A single match with its result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    home_team: String,
    away_team: String,
    result: Outcome,
}

impl MatchResult {
    /// Create a match result. Team names are trimmed and must not be empty.
    pub fn new(
        home_team: impl AsRef<str>,
        away_team: impl AsRef<str>,
        result: Outcome,
    ) -> Result<Self, ValidationError> {
        let home_team = home_team.as_ref().trim();
        let away_team = away_team.as_ref().trim();

        if home_team.is_empty() {
            return Err(ValidationError::EmptyHomeTeam);
        }
        if away_team.is_empty() {
            return Err(ValidationError::EmptyAwayTeam);
        }

        Ok(Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            result,
        })
    }

    /// Rebuild a match result from its stored text columns
    pub fn from_strings(home: &str, away: &str, token: &str) -> Result<Self, ValidationError> {
        let result = token.parse()?;
        Self::new(home, away, result)
    }

    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    pub fn outcome(&self) -> Outcome {
        self.result
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.home_team, self.away_team, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tokens() {
        assert_eq!(Outcome::Home1.token(), "1");
        assert_eq!(Outcome::Draw.token(), "X");
        assert_eq!(Outcome::Away2.token(), "2");
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("1".parse::<Outcome>().unwrap(), Outcome::Home1);
        assert_eq!(" x ".parse::<Outcome>().unwrap(), Outcome::Draw);
        assert_eq!("2".parse::<Outcome>().unwrap(), Outcome::Away2);
        assert!("3".parse::<Outcome>().is_err());
        assert!("".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_from_strings() {
        let m = MatchResult::from_strings("Sevilla FC", "Real Betis", "X").unwrap();
        assert_eq!(m.home_team(), "Sevilla FC");
        assert_eq!(m.away_team(), "Real Betis");
        assert_eq!(m.outcome(), Outcome::Draw);
        assert_eq!(m.to_string(), "Sevilla FC - Real Betis: X");
    }

    #[test]
    fn test_rejects_empty_names() {
        assert_eq!(
            MatchResult::new("  ", "Elche CF", Outcome::Home1),
            Err(ValidationError::EmptyHomeTeam)
        );
        assert_eq!(
            MatchResult::new("Elche CF", "", Outcome::Home1),
            Err(ValidationError::EmptyAwayTeam)
        );
    }

    #[test]
    fn test_rejects_unknown_token() {
        let err = MatchResult::from_strings("Getafe CF", "Levante UD", "1X").unwrap_err();
        assert_eq!(err, ValidationError::UnknownOutcome("1X".to_string()));
    }

    #[test]
    fn test_serialize_json() {
        let m = MatchResult::new("RC Celta", "CA Osasuna", Outcome::Away2).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(
            json,
            r#"{"home_team":"RC Celta","away_team":"CA Osasuna","result":"2"}"#
        );
    }
}
