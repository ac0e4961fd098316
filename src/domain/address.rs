use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{validation, Config, ValidationError};

/// The editable fields of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    /// The owning customer. Deleting the customer deletes the address.
    pub customer: Uuid,
    /// Neighbourhood or sector.
    pub sector: String,
    /// Main street.
    pub principal_street: String,
    /// Cross street.
    pub secondary_street: String,
}

impl AddressData {
    /// Creates address fields for the given customer.
    #[must_use]
    pub fn new(
        customer: Uuid,
        sector: impl Into<String>,
        principal_street: impl Into<String>,
        secondary_street: impl Into<String>,
    ) -> Self {
        Self {
            customer,
            sector: sector.into(),
            principal_street: principal_street.into(),
            secondary_street: secondary_street.into(),
        }
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("sector", &self.sector, config)?;
        validation::required("principal_street", &self.principal_street, config)?;
        validation::required("secondary_street", &self.secondary_street, config)
    }
}

/// An address owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    id: Uuid,
    #[serde(flatten)]
    data: AddressData,
}

impl Address {
    pub(crate) const fn new(id: Uuid, data: AddressData) -> Self {
        Self { id, data }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &AddressData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: AddressData) {
        self.data = data;
    }
}

impl Deref for Address {
    type Target = AddressData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Written the way the office writes street corners: "Main y Cross".
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} y {}", self.principal_street, self.secondary_street)
    }
}
