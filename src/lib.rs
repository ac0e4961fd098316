//! Customer and Billing Records
//!
//! Customers, their addresses and service installations, monthly payments,
//! work orders, installation materials, and a product catalogue for a small
//! cable and internet provider. Records live in a [`Store`], optionally
//! persisted to a directory with [`Directory`].

pub mod domain;
pub use domain::{
    Address, AddressData, Category, CategoryData, Config, Customer, CustomerData, Dni, Entity,
    Error, InstallationMaterials, InstallationMaterialsData, InstallationStatus, Membership,
    MonthlyPayment, MonthlyPaymentData, PaymentView, Product, ProductData, UnknownChoiceError,
    ValidationError, WorkOrder, WorkOrderData,
};

/// In-memory and filesystem storage for billing records.
pub mod storage;
pub use storage::{CustomerRemoval, Directory, LoadError, Snapshot, Store};
