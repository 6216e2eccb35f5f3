use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::ParseIntError,
    ops::Deref,
    str::FromStr,
};

/// Custom error type for building credit values
#[derive(Debug, Clone, PartialEq)]
pub enum CreditsError {
    NotPositive(i32),
    Parse(ParseIntError),
}

impl Display for CreditsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotPositive(value) => write!(f, "credits must be positive, got {value}"),
            Self::Parse(err) => write!(f, "invalid credits: {err}"),
        }
    }
}

impl std::error::Error for CreditsError {}

/// The number of credits a course is worth, always greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Credits(i32);

impl Credits {
    pub fn new(value: i32) -> Result<Self, CreditsError> {
        if value > 0 {
            Ok(Credits(value))
        } else {
            Err(CreditsError::NotPositive(value))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Credits {
    type Error = CreditsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Credits> for i32 {
    fn from(credits: Credits) -> Self {
        credits.0
    }
}

impl Deref for Credits {
    type Target = i32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Credits {
    type Err = CreditsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse().map_err(CreditsError::Parse)?;
        Self::new(value)
    }
}

impl Display for Credits {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_must_be_positive() {
        assert_eq!(Credits::new(0), Err(CreditsError::NotPositive(0)));
        assert_eq!(Credits::new(-3), Err(CreditsError::NotPositive(-3)));
        assert_eq!(Credits::new(1).map(Credits::get), Ok(1));
    }

    #[test]
    fn test_credits_from_str() {
        assert_eq!(" 4 ".parse::<Credits>().map(Credits::get), Ok(4));
        assert!("four".parse::<Credits>().is_err());
        assert!("0".parse::<Credits>().is_err());
    }

    #[test]
    fn test_credits_deserialize_rejects_zero() {
        let credits: Credits = serde_json::from_str("3").unwrap();
        assert_eq!(*credits, 3);
        assert!(serde_json::from_str::<Credits>("0").is_err());
    }
}
