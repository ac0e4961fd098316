use std::{fmt, ops::Deref};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{validation, Config, Dni, InstallationStatus, Membership, ValidationError};

/// The editable fields of a customer.
///
/// Fields left out when deserializing fall back to the declared defaults:
/// a cable membership, a pending installation and an active account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    /// Given names.
    pub names: String,
    /// Family names.
    pub last_names: String,
    /// National identity number. Unique across all customers.
    pub dni: Dni,
    /// Contact e-mail address. May be empty.
    #[serde(default)]
    pub email: String,
    /// Contact phone number. May be empty.
    #[serde(default)]
    pub phone: String,
    /// Installation fee agreed in the contract.
    pub price_contract: Decimal,
    /// The subscribed service.
    #[serde(default)]
    pub membership: Membership,
    /// Installation progress.
    #[serde(default)]
    pub status_installation: InstallationStatus,
    /// When the service was installed.
    ///
    /// Only meaningful once `status_installation` is
    /// [`InstallationStatus::Installed`].
    #[serde(default)]
    pub date_installation: Option<DateTime<Utc>>,
    /// Soft-delete flag. Inactive customers keep their records and their DNI.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl CustomerData {
    /// Creates customer fields with every optional field at its default.
    #[must_use]
    pub fn new(
        dni: Dni,
        names: impl Into<String>,
        last_names: impl Into<String>,
        price_contract: Decimal,
    ) -> Self {
        Self {
            names: names.into(),
            last_names: last_names.into(),
            dni,
            email: String::new(),
            phone: String::new(),
            price_contract,
            membership: Membership::default(),
            status_installation: InstallationStatus::default(),
            date_installation: None,
            active: default_active(),
        }
    }

    /// Sets the contact e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the subscribed service.
    #[must_use]
    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = membership;
        self
    }

    /// The customer's full name, as shown in listings.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.names, self.last_names)
    }

    /// Whether the service has been installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.status_installation == InstallationStatus::Installed
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("names", &self.names, config)?;
        validation::required("last_names", &self.last_names, config)?;
        validation::required("dni", &self.dni, config)?;
        validation::email(&self.email, config)?;
        validation::bounded("phone", &self.phone, config)?;
        validation::decimal("price_contract", self.price_contract, config)
    }
}

/// A customer record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    data: CustomerData,
}

impl Customer {
    pub(crate) const fn new(id: Uuid, data: CustomerData, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            data,
        }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the customer was created. Never changes.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the customer was last modified.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &CustomerData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: CustomerData, now: DateTime<Utc>) {
        self.data = data;
        self.updated_at = now;
    }
}

impl Deref for Customer {
    type Target = CustomerData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.names, self.last_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> CustomerData {
        CustomerData::new(Dni::new("0101").unwrap(), "Ana", "Lopez", Decimal::new(5000, 2))
    }

    #[test]
    fn new_applies_declared_defaults() {
        let data = ana();
        assert_eq!(data.membership, Membership::Cable);
        assert_eq!(data.status_installation, InstallationStatus::Pending);
        assert!(data.active);
        assert!(data.date_installation.is_none());
        assert!(data.email.is_empty());
    }

    #[test]
    fn deserializing_fills_omitted_defaults() {
        let data: CustomerData = serde_json::from_str(
            r#"{"names":"Ana","last_names":"Lopez","dni":"0101","price_contract":"50.00"}"#,
        )
        .unwrap();
        assert_eq!(data, ana());
    }

    #[test]
    fn display_is_full_name() {
        let customer = Customer::new(Uuid::new_v4(), ana(), Utc::now());
        assert_eq!(customer.to_string(), "Ana Lopez");
        assert_eq!(customer.full_name(), "Ana Lopez");
    }

    #[test]
    fn validate_rejects_bad_email() {
        let data = ana().with_email("not-an-address");
        assert_eq!(
            data.validate(&Config::default()),
            Err(ValidationError::Email("not-an-address".to_string()))
        );
    }
}
