//! Domain models for customer billing records.
//!
//! This module contains the record types, their choice fields, field
//! validation, and configuration. Relationship rules between records are
//! enforced by the [`Store`](crate::Store).

mod address;
pub use address::{Address, AddressData};

mod billing;
pub use billing::{
    InstallationMaterials, InstallationMaterialsData, MonthlyPayment, MonthlyPaymentData,
    WorkOrder, WorkOrderData,
};

mod catalog;
pub use catalog::{Category, CategoryData, Product, ProductData};

/// Single-character choice fields.
pub mod choices;
pub use choices::{InstallationStatus, Membership, UnknownChoiceError};

mod config;
pub use config::Config;

mod customer;
pub use customer::{Customer, CustomerData};

mod dni;
pub use dni::Dni;

mod error;
pub use error::{Entity, Error, ValidationError};

mod payment_view;
pub use payment_view::PaymentView;

mod validation;
