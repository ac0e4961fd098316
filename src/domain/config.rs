use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a billing records directory.
///
/// These settings bound the values the store will accept. The defaults match
/// the column sizes of the existing customer database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Maximum number of characters in a bounded text field such as a name,
    /// phone number or invoice number.
    ///
    /// Free-text descriptions are not bounded.
    max_text_length: usize,

    /// Total number of digits allowed in a monetary amount.
    max_digits: u32,

    /// Number of those digits that may follow the decimal point.
    decimal_places: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            max_digits: default_max_digits(),
            decimal_places: default_decimal_places(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the maximum length of bounded text fields, in characters.
    #[must_use]
    pub const fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    /// Returns the total number of digits allowed in a monetary amount.
    #[must_use]
    pub const fn max_digits(&self) -> u32 {
        self.max_digits
    }

    /// Returns the number of fractional digits allowed in a monetary amount.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }
}

const fn default_max_text_length() -> usize {
    255
}

const fn default_max_digits() -> u32 {
    5
}

const fn default_decimal_places() -> u32 {
    2
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_max_text_length")]
        max_text_length: usize,

        #[serde(default = "default_max_digits")]
        max_digits: u32,

        #[serde(default = "default_decimal_places")]
        decimal_places: u32,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                max_text_length,
                max_digits,
                decimal_places,
            } => Self {
                max_text_length,
                max_digits,
                // more places than digits would make every amount invalid
                decimal_places: decimal_places.min(max_digits),
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            max_text_length: config.max_text_length,
            max_digits: config.max_digits,
            decimal_places: config.decimal_places,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_text_length = 120\nmax_digits = 7\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.max_text_length(), 120);
        assert_eq!(config.max_digits(), 7);
        assert_eq!(config.decimal_places(), 2);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_digits = \"five\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config: Config =
            toml::from_str("_version = \"1\"\nmax_text_length = 80\n").unwrap();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
