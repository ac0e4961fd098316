use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::ValidationError;

/// A customer's national identity number.
///
/// This is the natural key for customers: it is unique across every
/// customer, active or not. Surrounding whitespace is stripped and the
/// remaining value must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dni(NonEmptyString);

impl Dni {
    /// Creates a new `Dni` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] if the string is empty or only
    /// whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        let value = if trimmed.len() == s.len() {
            s
        } else {
            trimmed.to_string()
        };
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| ValidationError::Required { field: "dni" })
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Dni {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Dni {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Dni> for String {
    fn from(dni: Dni) -> Self {
        dni.0.as_str().to_owned()
    }
}

impl FromStr for Dni {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Dni {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Dni {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Dni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let dni = Dni::new("  0101 ").unwrap();
        assert_eq!(dni.as_str(), "0101");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(
            Dni::new("   ").unwrap_err(),
            ValidationError::Required { field: "dni" }
        );
        assert!("".parse::<Dni>().is_err());
    }

    #[test]
    fn deserialization_validates() {
        let dni: Dni = serde_json::from_str(r#""0102""#).unwrap();
        assert_eq!(dni.to_string(), "0102");
        assert!(serde_json::from_str::<Dni>(r#""""#).is_err());
    }
}
