use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Dni;

/// The kinds of record held by a [`Store`](crate::Store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A [`Customer`](crate::Customer).
    Customer,
    /// An [`Address`](crate::Address).
    Address,
    /// A [`MonthlyPayment`](crate::MonthlyPayment).
    MonthlyPayment,
    /// A [`WorkOrder`](crate::WorkOrder).
    WorkOrder,
    /// An [`InstallationMaterials`](crate::InstallationMaterials) line.
    InstallationMaterials,
    /// A [`Category`](crate::Category).
    Category,
    /// A [`Product`](crate::Product).
    Product,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Customer => "customer",
            Self::Address => "address",
            Self::MonthlyPayment => "monthly payment",
            Self::WorkOrder => "work order",
            Self::InstallationMaterials => "installation materials",
            Self::Category => "category",
            Self::Product => "product",
        })
    }
}

/// Errors returned by store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Another customer already holds this DNI.
    #[error("a customer with DNI {dni} already exists ({existing})")]
    DuplicateKey {
        /// The colliding DNI.
        dni: Dni,
        /// The customer that already holds it.
        existing: Uuid,
    },

    /// The category is still referenced by products and cannot be deleted.
    #[error("category {category} is still referenced by {} product(s)", products.len())]
    ReferentialIntegrity {
        /// The category whose deletion was refused.
        category: Uuid,
        /// Products that reference it.
        products: Vec<Uuid>,
    },

    /// No record of this kind has the given identifier.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record that was looked up.
        entity: Entity,
        /// The identifier that was not found.
        id: Uuid,
    },

    /// Two records of the same kind share an identifier.
    ///
    /// Only raised when loading records that were not written by a store.
    #[error("duplicate {entity} id {id}")]
    DuplicateId {
        /// The kind of record.
        entity: Entity,
        /// The repeated identifier.
        id: Uuid,
    },

    /// A stored timestamp is too close to the end of the representable range
    /// for later changes to be stamped after it.
    #[error("timestamp {at} is out of range")]
    TimestampOutOfRange {
        /// The rejected timestamp.
        at: DateTime<Utc>,
    },

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    pub(crate) const fn not_found(entity: Entity, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

/// A field value that cannot be stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{field} is required")]
    Required {
        /// Name of the field.
        field: &'static str,
    },

    /// A bounded text field is longer than allowed.
    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        /// Name of the field.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
        /// Number of characters supplied.
        len: usize,
    },

    /// A decimal field exceeds its declared precision.
    #[error(
        "{field} value {value} does not fit {max_digits} digits with {decimal_places} decimal places"
    )]
    Precision {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
        /// Total number of digits allowed.
        max_digits: u32,
        /// Number of fractional digits allowed.
        decimal_places: u32,
    },

    /// The e-mail address is malformed.
    #[error("'{0}' is not a valid e-mail address")]
    Email(String),
}
