//! A filesystem backed store of billing records
//!
//! The [`Directory`] keeps a [`Store`] in a `.billing` folder under a root
//! directory:
//!
//! - `.billing/config.toml` holds the [`Config`]
//! - `.billing/records.yaml` holds a [`Snapshot`] of every record
//!
//! Changes made through [`Directory::store_mut`] stay in memory until
//! [`Directory::flush`] is called.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{Config, Error},
    storage::{Snapshot, Store},
};

const STATE_DIR: &str = ".billing";
const CONFIG_FILE: &str = "config.toml";
const RECORDS_FILE: &str = "records.yaml";

/// A filesystem backed store of billing records.
#[derive(Debug)]
pub struct Directory {
    /// The directory holding the `.billing` folder.
    root: PathBuf,
    store: Store,
}

impl Directory {
    /// Creates the `.billing` folder under `root` and opens it.
    ///
    /// An existing configuration or record file is left as it is.
    ///
    /// # Errors
    ///
    /// Fails if the folder or configuration file cannot be written, or if
    /// existing files cannot be loaded.
    pub fn init(root: PathBuf) -> Result<Self, LoadError> {
        let state_dir = root.join(STATE_DIR);
        fs::create_dir_all(&state_dir).map_err(|source| LoadError::Io {
            path: state_dir.clone(),
            source,
        })?;

        let config_path = state_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            Config::default()
                .save(&config_path)
                .map_err(LoadError::Config)?;
            tracing::info!(path = %config_path.display(), "wrote default configuration");
        }

        let directory = Self::open(root)?;
        if !directory.records_path().exists() {
            directory.flush().map_err(|source| LoadError::Io {
                path: directory.records_path(),
                source,
            })?;
        }
        Ok(directory)
    }

    /// Opens the records kept under `root`.
    ///
    /// A missing configuration file means the default configuration, and a
    /// missing record file means an empty store.
    ///
    /// # Errors
    ///
    /// Fails if a file exists but cannot be read or parsed, or if the records
    /// break a relationship rule (for example two customers sharing a DNI).
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn open(root: PathBuf) -> Result<Self, LoadError> {
        let config = load_config(&root)?;
        let records_path = root.join(STATE_DIR).join(RECORDS_FILE);

        let snapshot = if records_path.exists() {
            let content = fs::read_to_string(&records_path).map_err(|source| LoadError::Io {
                path: records_path.clone(),
                source,
            })?;
            serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
                path: records_path.clone(),
                source,
            })?
        } else {
            tracing::debug!(path = %records_path.display(), "no record file, starting empty");
            Snapshot::default()
        };

        let store = Store::restore(config, snapshot)?;
        Ok(Self { root, store })
    }

    /// The directory holding the `.billing` folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The records.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable access to the records. Call [`Directory::flush`] to persist
    /// changes.
    pub const fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Writes every record to `.billing/records.yaml`.
    ///
    /// # Errors
    ///
    /// Fails if the records cannot be serialized or the file cannot be
    /// written.
    #[instrument(skip(self))]
    pub fn flush(&self) -> io::Result<()> {
        let path = self.records_path();
        let content = serde_yaml::to_string(&self.store.snapshot()).map_err(io::Error::other)?;
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "wrote records");
        Ok(())
    }

    fn records_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(RECORDS_FILE)
    }
}

fn load_config(root: &Path) -> Result<Config, LoadError> {
    let path = root.join(STATE_DIR).join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(Config::default());
    }
    Config::load(&path).map_err(LoadError::Config)
}

/// Errors raised while opening a [`Directory`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file or folder could not be read or created.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("{0}")]
    Config(String),

    /// The record file is not a valid snapshot.
    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        /// The record file.
        path: PathBuf,
        /// The underlying error.
        source: serde_yaml::Error,
    },

    /// The records break a relationship rule.
    #[error("inconsistent records: {0}")]
    Integrity(#[from] Error),
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{
        CustomerData, Dni, Entity, InstallationStatus, Membership, MonthlyPaymentData,
    };

    fn setup_temp_directory() -> (TempDir, Directory) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().to_path_buf();
        (tmp, Directory::init(path).unwrap())
    }

    fn customer(dni: &str, membership: Membership) -> CustomerData {
        CustomerData::new(Dni::new(dni).unwrap(), "Ana", "Lopez", Decimal::new(5000, 2))
            .with_membership(membership)
    }

    #[test]
    fn init_writes_config_and_empty_records() {
        let (tmp, dir) = setup_temp_directory();

        assert!(tmp.path().join(".billing/config.toml").exists());
        assert!(tmp.path().join(".billing/records.yaml").exists());
        assert_eq!(dir.store().customers().count(), 0);
    }

    #[test]
    fn open_without_state_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let dir = Directory::open(tmp.path().to_path_buf()).unwrap();

        assert_eq!(dir.store().config(), &Config::default());
        assert_eq!(dir.store().customers().count(), 0);
    }

    #[test]
    fn choice_codes_survive_a_reload() {
        let (tmp, mut dir) = setup_temp_directory();
        let installed_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        let store = dir.store_mut();
        let cable = store
            .create_customer(customer("01", Membership::Cable))
            .unwrap();
        store
            .create_customer(customer("02", Membership::Internet))
            .unwrap();
        let both = store
            .create_customer(customer("03", Membership::CableInternet))
            .unwrap();
        store.install_customer(both, installed_at).unwrap();
        store
            .update_customer(cable, |data| {
                data.status_installation = InstallationStatus::Cancelled;
            })
            .unwrap();
        let payment = store
            .create_payment(MonthlyPaymentData::new(
                Some(both),
                "F-100",
                Decimal::new(3000, 2),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            ))
            .unwrap();
        dir.flush().unwrap();

        let yaml = fs::read_to_string(tmp.path().join(".billing/records.yaml")).unwrap();
        assert!(yaml.contains("membership: A"));
        assert!(yaml.contains("status_installation: C"));

        let reloaded = Directory::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.store().snapshot(), dir.store().snapshot());

        let codes: Vec<(char, char)> = reloaded
            .store()
            .customers()
            .map(|c| (c.membership.code(), c.status_installation.code()))
            .collect();
        assert_eq!(codes, vec![('C', 'C'), ('I', 'P'), ('A', 'I')]);
        assert_eq!(
            reloaded
                .store()
                .payment_view(payment)
                .unwrap()
                .initial_payment_at(),
            Some(installed_at)
        );
    }

    #[test]
    fn duplicate_dni_on_disk_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".billing")).unwrap();
        fs::write(
            tmp.path().join(".billing/records.yaml"),
            r"
_version: '1'
customers:
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d001
    created_at: 2024-01-05T10:00:00Z
    updated_at: 2024-01-05T10:00:00Z
    names: Ana
    last_names: Lopez
    dni: '0101'
    price_contract: '50.00'
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d002
    created_at: 2024-01-06T10:00:00Z
    updated_at: 2024-01-06T10:00:00Z
    names: Ana Maria
    last_names: Lopez
    dni: '0101'
    price_contract: '40.00'
",
        )
        .unwrap();

        let err = Directory::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Integrity(Error::DuplicateKey { .. })
        ));
    }

    #[test]
    fn duplicate_id_on_disk_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".billing")).unwrap();
        fs::write(
            tmp.path().join(".billing/records.yaml"),
            r"
_version: '1'
customers:
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d001
    created_at: 2024-01-05T10:00:00Z
    updated_at: 2024-01-05T10:00:00Z
    names: Ana
    last_names: Lopez
    dni: '0101'
    price_contract: '50.00'
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d001
    created_at: 2024-01-06T10:00:00Z
    updated_at: 2024-01-06T10:00:00Z
    names: Luis
    last_names: Vera
    dni: '0202'
    price_contract: '40.00'
",
        )
        .unwrap();

        let err = Directory::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Integrity(Error::DuplicateId {
                entity: Entity::Customer,
                ..
            })
        ));
    }

    #[test]
    fn malformed_records_are_reported() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".billing")).unwrap();
        fs::write(tmp.path().join(".billing/records.yaml"), "customers: [").unwrap();

        assert!(matches!(
            Directory::open(tmp.path().to_path_buf()),
            Err(LoadError::Yaml { .. })
        ));
    }

    #[test]
    fn init_keeps_existing_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".billing")).unwrap();
        fs::write(
            tmp.path().join(".billing/config.toml"),
            "_version = \"1\"\nmax_text_length = 10\n",
        )
        .unwrap();

        let dir = Directory::init(tmp.path().to_path_buf()).unwrap();
        assert_eq!(dir.store().config().max_text_length(), 10);
    }
}
