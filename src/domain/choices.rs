//! Choice fields stored as single-character codes.
//!
//! In memory these are ordinary enums. The one-character codes (`C`, `I`,
//! `A` and `P`, `I`, `C`) only appear at the serialization boundary, so
//! existing records keep their on-disk values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The service a customer is subscribed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Membership {
    /// Cable television only.
    #[default]
    #[serde(rename = "C")]
    Cable,
    /// Internet only.
    #[serde(rename = "I")]
    Internet,
    /// Cable television and internet bundle.
    #[serde(rename = "A")]
    CableInternet,
}

impl Membership {
    /// Every membership, in declaration order.
    pub const ALL: [Self; 3] = [Self::Cable, Self::Internet, Self::CableInternet];

    /// The persisted single-character code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Cable => 'C',
            Self::Internet => 'I',
            Self::CableInternet => 'A',
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cable => "Cable",
            Self::Internet => "Internet",
            Self::CableInternet => "Cable + Internet",
        }
    }
}

impl TryFrom<char> for Membership {
    type Error = UnknownChoiceError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code.to_ascii_uppercase())
            .ok_or_else(|| UnknownChoiceError::new("membership", code.to_string()))
    }
}

/// Accepts either the single-character code or the variant name
/// (`cable`, `internet`, `cable+internet`), ignoring case and punctuation.
impl FromStr for Membership {
    type Err = UnknownChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: String = s
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match letters.as_str() {
            "cable" => Ok(Self::Cable),
            "internet" => Ok(Self::Internet),
            "cableinternet" => Ok(Self::CableInternet),
            _ => single_char(s)
                .ok_or_else(|| UnknownChoiceError::new("membership", s))
                .and_then(Self::try_from),
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a customer's installation stands.
///
/// Transitions are not constrained: any status may be set from any other.
/// The usual path is Pending, then Installed, then possibly Cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallationStatus {
    /// Awaiting installation.
    #[default]
    #[serde(rename = "P")]
    Pending,
    /// Service has been installed.
    #[serde(rename = "I")]
    Installed,
    /// The installation was cancelled.
    #[serde(rename = "C")]
    Cancelled,
}

impl InstallationStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Installed, Self::Cancelled];

    /// The persisted single-character code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Pending => 'P',
            Self::Installed => 'I',
            Self::Cancelled => 'C',
        }
    }

    /// Label shown to office staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Installed => "Instalado",
            Self::Cancelled => "Cancelado",
        }
    }
}

impl TryFrom<char> for InstallationStatus {
    type Error = UnknownChoiceError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code.to_ascii_uppercase())
            .ok_or_else(|| UnknownChoiceError::new("installation status", code.to_string()))
    }
}

/// Accepts either the single-character code or the English variant name,
/// case-insensitively.
impl FromStr for InstallationStatus {
    type Err = UnknownChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "installed" => Ok(Self::Installed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => single_char(s)
                .ok_or_else(|| UnknownChoiceError::new("installation status", s))
                .and_then(Self::try_from),
        }
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Error returned when a string or code does not name a known choice.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownChoiceError {
    kind: &'static str,
    value: String,
}

impl UnknownChoiceError {
    fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn defaults_match_declared_choices() {
        assert_eq!(Membership::default(), Membership::Cable);
        assert_eq!(InstallationStatus::default(), InstallationStatus::Pending);
    }

    #[test_case("C", Membership::Cable; "cable code")]
    #[test_case("i", Membership::Internet; "lowercase internet code")]
    #[test_case("A", Membership::CableInternet; "bundle code")]
    #[test_case("cable+internet", Membership::CableInternet; "bundle label")]
    #[test_case("Internet", Membership::Internet; "name")]
    fn parses_membership(input: &str, expected: Membership) {
        assert_eq!(input.parse::<Membership>().unwrap(), expected);
    }

    #[test_case("P", InstallationStatus::Pending; "pending code")]
    #[test_case("installed", InstallationStatus::Installed; "installed name")]
    #[test_case("c", InstallationStatus::Cancelled; "lowercase cancelled code")]
    fn parses_status(input: &str, expected: InstallationStatus) {
        assert_eq!(input.parse::<InstallationStatus>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_codes() {
        let error = "X".parse::<Membership>().unwrap_err();
        assert_eq!(error.to_string(), "unknown membership 'X'");
        assert!(InstallationStatus::try_from('Z').is_err());
    }

    #[test]
    fn serializes_as_single_character_codes() {
        let json = serde_json::to_string(&[
            Membership::Cable,
            Membership::Internet,
            Membership::CableInternet,
        ])
        .unwrap();
        assert_eq!(json, r#"["C","I","A"]"#);

        let status: Vec<InstallationStatus> = serde_json::from_str(r#"["P","I","C"]"#).unwrap();
        assert_eq!(status, InstallationStatus::ALL);
    }

    #[test]
    fn labels_follow_office_wording() {
        assert_eq!(Membership::CableInternet.to_string(), "Cable + Internet");
        assert_eq!(InstallationStatus::Installed.to_string(), "Instalado");
    }
}
