// Serialized form of a store.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Address, Category, Customer, InstallationMaterials, MonthlyPayment, Product, WorkOrder,
};

/// Every record in a [`Store`](crate::Store), one list per record type.
///
/// This is the shape written to disk. Choice fields are written as their
/// single-character codes, amounts as strings and timestamps as RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Snapshot {
    /// Customers.
    pub customers: Vec<Customer>,
    /// Addresses.
    pub addresses: Vec<Address>,
    /// Monthly payments.
    pub payments: Vec<MonthlyPayment>,
    /// Work orders.
    pub work_orders: Vec<WorkOrder>,
    /// Installation materials.
    pub materials: Vec<InstallationMaterials>,
    /// Product categories.
    pub categories: Vec<Category>,
    /// Products.
    pub products: Vec<Product>,
}

/// The serialized versions of the snapshot.
/// New versions can be added without breaking existing record files.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        customers: Vec<Customer>,
        #[serde(default)]
        addresses: Vec<Address>,
        #[serde(default)]
        payments: Vec<MonthlyPayment>,
        #[serde(default)]
        work_orders: Vec<WorkOrder>,
        #[serde(default)]
        materials: Vec<InstallationMaterials>,
        #[serde(default)]
        categories: Vec<Category>,
        #[serde(default)]
        products: Vec<Product>,
    },
}

impl From<Versions> for Snapshot {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                customers,
                addresses,
                payments,
                work_orders,
                materials,
                categories,
                products,
            } => Self {
                customers,
                addresses,
                payments,
                work_orders,
                materials,
                categories,
                products,
            },
        }
    }
}

impl From<Snapshot> for Versions {
    fn from(snapshot: Snapshot) -> Self {
        Self::V1 {
            customers: snapshot.customers,
            addresses: snapshot.addresses,
            payments: snapshot.payments,
            work_orders: snapshot.work_orders,
            materials: snapshot.materials,
            categories: snapshot.categories,
            products: snapshot.products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_empty_snapshot() {
        let snapshot: Snapshot = serde_yaml::from_str("_version: '1'\n").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn reads_records_with_omitted_defaults() {
        let yaml = r"
_version: '1'
customers:
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d001
    created_at: 2024-01-05T10:00:00Z
    updated_at: 2024-01-05T10:00:00Z
    names: Ana
    last_names: Lopez
    dni: '0101'
    price_contract: '50.00'
payments:
  - id: 7f8c2a5e-3b0e-4a43-9d0c-52d4b4a7d002
    customer: null
    invoice: F-001
    amount: '25.00'
    date: 2024-02-01
";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();

        let customer = &snapshot.customers[0];
        assert_eq!(customer.dni.as_str(), "0101");
        assert_eq!(customer.membership.code(), 'C');
        assert_eq!(customer.status_installation.code(), 'P');
        assert!(customer.active);

        assert_eq!(snapshot.payments[0].customer, None);
        assert_eq!(snapshot.payments[0].invoice, "F-001");
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!(serde_yaml::from_str::<Snapshot>("_version: '2'\n").is_err());
    }
}
