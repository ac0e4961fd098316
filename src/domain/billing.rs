//! Records that point at a customer without belonging to it.
//!
//! Payments, work orders and installation materials keep a nullable link to
//! their customer. When the customer is deleted the link is cleared and the
//! record itself is kept.

use std::ops::Deref;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{validation, Config, ValidationError};

/// The editable fields of a monthly payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPaymentData {
    /// The paying customer, if still on record.
    #[serde(default)]
    pub customer: Option<Uuid>,
    /// Invoice number.
    pub invoice: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Date of payment.
    pub date: NaiveDate,
}

impl MonthlyPaymentData {
    /// Creates payment fields.
    #[must_use]
    pub fn new(
        customer: Option<Uuid>,
        invoice: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            customer,
            invoice: invoice.into(),
            amount,
            date,
        }
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("invoice", &self.invoice, config)?;
        validation::decimal("amount", self.amount, config)
    }
}

/// The editable fields of a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderData {
    /// The customer the work is for, if still on record.
    #[serde(default)]
    pub customer: Option<Uuid>,
    /// Order number.
    pub number_of_order: String,
    /// Scheduled date.
    pub date: NaiveDate,
    /// Free-text description of the work.
    #[serde(default)]
    pub description: String,
}

impl WorkOrderData {
    /// Creates work order fields.
    #[must_use]
    pub fn new(
        customer: Option<Uuid>,
        number_of_order: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            customer,
            number_of_order: number_of_order.into(),
            date,
            description: description.into(),
        }
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("number_of_order", &self.number_of_order, config)
    }
}

/// The editable fields of an installation materials line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationMaterialsData {
    /// The customer the material was installed for, if still on record.
    #[serde(default)]
    pub customer: Option<Uuid>,
    /// Material description.
    pub material: String,
    /// Quantity used.
    pub quantity: i32,
    /// Unit price.
    pub price: Decimal,
}

impl InstallationMaterialsData {
    /// Creates installation materials fields.
    #[must_use]
    pub fn new(
        customer: Option<Uuid>,
        material: impl Into<String>,
        quantity: i32,
        price: Decimal,
    ) -> Self {
        Self {
            customer,
            material: material.into(),
            quantity,
            price,
        }
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("material", &self.material, config)?;
        validation::decimal("price", self.price, config)
    }
}

/// A monthly payment.
///
/// Use [`Store::payment_view`](crate::Store::payment_view) to read the
/// derived `initial_payment_at` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPayment {
    id: Uuid,
    #[serde(flatten)]
    data: MonthlyPaymentData,
}

/// A work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    id: Uuid,
    #[serde(flatten)]
    data: WorkOrderData,
}

/// Materials used for a customer's installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationMaterials {
    id: Uuid,
    #[serde(flatten)]
    data: InstallationMaterialsData,
}

impl MonthlyPayment {
    pub(crate) const fn new(id: Uuid, data: MonthlyPaymentData) -> Self {
        Self { id, data }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &MonthlyPaymentData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: MonthlyPaymentData) {
        self.data = data;
    }

    pub(crate) fn detach_customer(&mut self, customer: Uuid) -> bool {
        clear_if(&mut self.data.customer, customer)
    }
}

impl WorkOrder {
    pub(crate) const fn new(id: Uuid, data: WorkOrderData) -> Self {
        Self { id, data }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &WorkOrderData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: WorkOrderData) {
        self.data = data;
    }

    pub(crate) fn detach_customer(&mut self, customer: Uuid) -> bool {
        clear_if(&mut self.data.customer, customer)
    }
}

impl InstallationMaterials {
    pub(crate) const fn new(id: Uuid, data: InstallationMaterialsData) -> Self {
        Self { id, data }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &InstallationMaterialsData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: InstallationMaterialsData) {
        self.data = data;
    }

    pub(crate) fn detach_customer(&mut self, customer: Uuid) -> bool {
        clear_if(&mut self.data.customer, customer)
    }
}

impl Deref for MonthlyPayment {
    type Target = MonthlyPaymentData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl Deref for WorkOrder {
    type Target = WorkOrderData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl Deref for InstallationMaterials {
    type Target = InstallationMaterialsData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Clears `link` if it points at `customer`. Returns whether it did.
fn clear_if(link: &mut Option<Uuid>, customer: Uuid) -> bool {
    if *link == Some(customer) {
        *link = None;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detach_only_clears_matching_customer() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut order = WorkOrder::new(
            Uuid::new_v4(),
            WorkOrderData::new(Some(owner), "OT-1", date, "Install decoder"),
        );

        assert!(!order.detach_customer(other));
        assert_eq!(order.customer, Some(owner));

        assert!(order.detach_customer(owner));
        assert_eq!(order.customer, None);
        assert!(!order.detach_customer(owner));
    }

    #[test]
    fn materials_require_a_description() {
        let line = InstallationMaterialsData::new(None, " ", 3, Decimal::new(150, 2));
        assert_eq!(
            line.validate(&Config::default()),
            Err(ValidationError::Required { field: "material" })
        );
    }
}
