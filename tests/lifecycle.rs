//! End-to-end behaviour of billing records kept in a directory.

use billing::{
    AddressData, CategoryData, CustomerData, Directory, Dni, Error, InstallationMaterialsData,
    InstallationStatus, Membership, MonthlyPaymentData, ProductData, Store, ValidationError,
    WorkOrderData,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;
use test_case::test_case;

fn ana() -> CustomerData {
    CustomerData::new(Dni::new("0101").unwrap(), "Ana", "Lopez", Decimal::new(5000, 2))
}

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[test]
fn new_customer_defaults_and_duplicate_dni() {
    let mut store = Store::default();

    let id = store.create_customer(ana()).unwrap();
    let customer = store.customer(id).unwrap();
    assert_eq!(customer.membership, Membership::Cable);
    assert_eq!(customer.status_installation, InstallationStatus::Pending);
    assert!(customer.active);
    assert_eq!(customer.to_string(), "Ana Lopez");

    let err = store.create_customer(ana()).unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { existing, .. } if existing == id));
}

#[test_case(Decimal::new(100_000, 2) ; "too many whole digits")]
#[test_case(Decimal::new(1234, 3) ; "too many decimal places")]
fn out_of_range_price_is_rejected(price: Decimal) {
    let mut store = Store::default();
    let data = CustomerData::new(Dni::new("0101").unwrap(), "Ana", "Lopez", price);

    assert!(matches!(
        store.create_customer(data),
        Err(Error::Validation(ValidationError::Precision { .. }))
    ));
}

#[test_case("", "Lopez" ; "blank names")]
#[test_case("Ana", "   " ; "blank last names")]
fn blank_required_field_is_rejected(names: &str, last_names: &str) {
    let mut store = Store::default();
    let data = CustomerData::new(
        Dni::new("0101").unwrap(),
        names,
        last_names,
        Decimal::new(5000, 2),
    );

    assert!(matches!(
        store.create_customer(data),
        Err(Error::Validation(ValidationError::Required { .. }))
    ));
}

#[test]
fn overlong_name_is_rejected() {
    let mut store = Store::default();
    let data = CustomerData::new(
        Dni::new("0101").unwrap(),
        "a".repeat(256),
        "Lopez",
        Decimal::new(5000, 2),
    );

    assert!(matches!(
        store.create_customer(data),
        Err(Error::Validation(ValidationError::TooLong { max: 255, len: 256, .. }))
    ));
}

#[test]
fn customer_lifecycle_survives_reloads() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let mut dir = Directory::init(root.clone()).unwrap();
    let store = dir.store_mut();
    let ana = store.create_customer(ana()).unwrap();
    store
        .create_address(AddressData::new(ana, "Centro", "Bolivar", "Sucre"))
        .unwrap();
    let payment = store
        .create_payment(MonthlyPaymentData::new(
            Some(ana),
            "F-001",
            Decimal::new(5000, 2),
            day(2, 1),
        ))
        .unwrap();
    let order = store
        .create_work_order(WorkOrderData::new(Some(ana), "OT-7", day(1, 20), "Install"))
        .unwrap();
    let line = store
        .create_material(InstallationMaterialsData::new(
            Some(ana),
            "Coaxial cable",
            30,
            Decimal::new(45, 2),
        ))
        .unwrap();
    dir.flush().unwrap();

    // install after a reload; the payment sees the new installation date
    let installed_at = Utc.with_ymd_and_hms(2024, 1, 22, 14, 0, 0).unwrap();
    let mut dir = Directory::open(root.clone()).unwrap();
    assert_eq!(
        dir.store().payment_view(payment).unwrap().initial_payment_at(),
        None
    );
    dir.store_mut().install_customer(ana, installed_at).unwrap();
    dir.flush().unwrap();

    let mut dir = Directory::open(root.clone()).unwrap();
    assert_eq!(
        dir.store().payment_view(payment).unwrap().initial_payment_at(),
        Some(installed_at)
    );

    let removal = dir.store_mut().delete_customer(ana).unwrap();
    assert_eq!(removal.addresses_removed.len(), 1);
    dir.flush().unwrap();

    let dir = Directory::open(root).unwrap();
    let store = dir.store();
    assert_eq!(store.customers().count(), 0);
    assert_eq!(store.addresses_of(ana).count(), 0);
    assert_eq!(store.payment(payment).unwrap().customer, None);
    assert_eq!(store.work_order(order).unwrap().customer, None);
    assert_eq!(store.material(line).unwrap().customer, None);
    assert_eq!(
        store.payment_view(payment).unwrap().initial_payment_at(),
        None
    );

    // the DNI is free again
    let mut store = Store::restore(store.config().clone(), store.snapshot()).unwrap();
    store.create_customer(self::ana()).unwrap();
}

#[test]
fn category_is_protected_while_products_refer_to_it() {
    let tmp = TempDir::new().unwrap();
    let mut dir = Directory::init(tmp.path().to_path_buf()).unwrap();
    let store = dir.store_mut();

    let cables = store.create_category(CategoryData::new("Cables")).unwrap();
    let rg6 = store
        .create_product(
            ProductData::new("RG6", Decimal::new(45, 2), 500)
                .with_description("Coaxial cable, per metre")
                .in_category(cables),
        )
        .unwrap();

    assert!(matches!(
        store.delete_category(cables),
        Err(Error::ReferentialIntegrity { ref products, .. }) if products == &[rg6]
    ));

    let created = store.product(rg6).unwrap().created_at();
    let updated = store.update_product(rg6, |data| data.inventory = 480).unwrap();
    assert_eq!(updated.created_at(), created);
    assert!(updated.last_update() > created);

    store.delete_product(rg6).unwrap();
    store.delete_category(cables).unwrap();
    dir.flush().unwrap();

    let dir = Directory::open(tmp.path().to_path_buf()).unwrap();
    assert_eq!(dir.store().categories().count(), 0);
    assert_eq!(dir.store().products().count(), 0);
}
