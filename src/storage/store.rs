//! In-memory store of billing records.
//!
//! The [`Store`] knows nothing about the filesystem. It owns every record,
//! assigns identifiers and timestamps, and enforces the relationship rules
//! between record types:
//!
//! - a customer owns its addresses, which are deleted with it
//! - payments, work orders and installation materials keep a nullable link to
//!   their customer, which is cleared when the customer is deleted
//! - a category cannot be deleted while any product refers to it
//!
//! Every mutating operation checks everything it needs before changing
//! anything, so a failed operation leaves the store untouched.

use std::collections::{hash_map::Entry, BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    domain::{
        Address, AddressData, Category, CategoryData, Config, Customer, CustomerData, Dni,
        Entity, Error, InstallationMaterials, InstallationMaterialsData, InstallationStatus,
        MonthlyPayment, MonthlyPaymentData, PaymentView, Product, ProductData, WorkOrder,
        WorkOrderData,
    },
    storage::{clock::Clock, Snapshot},
};

/// An in-memory set of billing records.
///
/// Records are stored in one table per type, keyed by UUID. Customers are
/// additionally indexed by DNI.
#[derive(Debug, Default)]
pub struct Store {
    config: Config,
    clock: Clock,

    customers: HashMap<Uuid, Customer>,

    /// Lookup from DNI to customer UUID.
    /// Holds exactly one entry per customer.
    dni_index: BTreeMap<Dni, Uuid>,

    addresses: HashMap<Uuid, Address>,
    payments: HashMap<Uuid, MonthlyPayment>,
    work_orders: HashMap<Uuid, WorkOrder>,
    materials: HashMap<Uuid, InstallationMaterials>,
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
}

/// The outcome of deleting a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRemoval {
    /// The deleted customer.
    pub customer: Customer,
    /// Addresses deleted along with the customer.
    pub addresses_removed: Vec<Uuid>,
    /// Payments whose customer link was cleared.
    pub payments_detached: Vec<Uuid>,
    /// Work orders whose customer link was cleared.
    pub work_orders_detached: Vec<Uuid>,
    /// Installation materials whose customer link was cleared.
    pub materials_detached: Vec<Uuid>,
}

impl Store {
    /// Creates an empty store that validates records against `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration records are validated against.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    // ---- customers ----

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a field is invalid, or
    /// [`Error::DuplicateKey`] if another customer already has this DNI.
    #[instrument(skip(self, data), fields(dni = %data.dni))]
    pub fn create_customer(&mut self, data: CustomerData) -> Result<Uuid, Error> {
        data.validate(&self.config)?;
        self.ensure_dni_free(&data.dni, None)?;

        let id = Uuid::new_v4();
        let now = self.clock.now();
        self.dni_index.insert(data.dni.clone(), id);
        self.customers.insert(id, Customer::new(id, data, now));

        tracing::debug!(%id, "created customer");
        Ok(id)
    }

    /// Retrieves a customer by UUID.
    #[must_use]
    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.get(&id)
    }

    /// Finds a customer by DNI.
    #[must_use]
    pub fn find_by_dni(&self, dni: &Dni) -> Option<&Customer> {
        let id = self.dni_index.get(dni)?;
        self.customers.get(id)
    }

    /// Returns an iterator over all customers, in DNI order.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> + '_ {
        let customers = &self.customers;
        self.dni_index.values().filter_map(|id| customers.get(id))
    }

    /// Modifies a customer's fields and refreshes `updated_at`.
    ///
    /// The closure receives a copy of the current fields. The changes are
    /// only stored if the result is valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such customer,
    /// [`Error::Validation`] if the modified fields are invalid, or
    /// [`Error::DuplicateKey`] if the DNI was changed to one held by another
    /// customer.
    #[instrument(skip(self, edit))]
    pub fn update_customer(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut CustomerData),
    ) -> Result<&Customer, Error> {
        let current = self
            .customers
            .get(&id)
            .ok_or(Error::not_found(Entity::Customer, id))?;
        let old_dni = current.dni.clone();
        let mut data = current.data().clone();

        edit(&mut data);
        data.validate(&self.config)?;
        self.ensure_dni_free(&data.dni, Some(id))?;

        if data.dni != old_dni {
            tracing::debug!(old = %old_dni, new = %data.dni, "customer DNI changed");
            self.dni_index.remove(&old_dni);
            self.dni_index.insert(data.dni.clone(), id);
        }

        let now = self.clock.now();
        let customer = self
            .customers
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::Customer, id))?;
        customer.apply(data, now);
        Ok(customer)
    }

    /// Marks a customer's service as installed at the given time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such customer.
    pub fn install_customer(&mut self, id: Uuid, at: DateTime<Utc>) -> Result<&Customer, Error> {
        self.update_customer(id, |data| {
            data.status_installation = InstallationStatus::Installed;
            data.date_installation = Some(at);
        })
    }

    /// Soft-deletes a customer by clearing its `active` flag.
    ///
    /// The customer and everything linked to it are kept, and its DNI stays
    /// taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such customer.
    pub fn deactivate_customer(&mut self, id: Uuid) -> Result<&Customer, Error> {
        self.update_customer(id, |data| data.active = false)
    }

    /// Deletes a customer.
    ///
    /// The customer's addresses are deleted with it. Payments, work orders and
    /// installation materials that referred to it are kept with their
    /// customer link cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such customer.
    #[instrument(skip(self))]
    pub fn delete_customer(&mut self, id: Uuid) -> Result<CustomerRemoval, Error> {
        let customer = self
            .customers
            .remove(&id)
            .ok_or(Error::not_found(Entity::Customer, id))?;
        self.dni_index.remove(&customer.dni);

        let mut addresses_removed = Vec::new();
        self.addresses.retain(|&address_id, address| {
            let owned = address.customer == id;
            if owned {
                addresses_removed.push(address_id);
            }
            !owned
        });

        let mut payments_detached: Vec<Uuid> = self
            .payments
            .values_mut()
            .filter_map(|payment| payment.detach_customer(id).then_some(payment.id()))
            .collect();
        let mut work_orders_detached: Vec<Uuid> = self
            .work_orders
            .values_mut()
            .filter_map(|order| order.detach_customer(id).then_some(order.id()))
            .collect();
        let mut materials_detached: Vec<Uuid> = self
            .materials
            .values_mut()
            .filter_map(|line| line.detach_customer(id).then_some(line.id()))
            .collect();

        addresses_removed.sort_unstable();
        payments_detached.sort_unstable();
        work_orders_detached.sort_unstable();
        materials_detached.sort_unstable();

        tracing::debug!(
            addresses = addresses_removed.len(),
            payments = payments_detached.len(),
            work_orders = work_orders_detached.len(),
            materials = materials_detached.len(),
            "deleted customer"
        );

        Ok(CustomerRemoval {
            customer,
            addresses_removed,
            payments_detached,
            work_orders_detached,
            materials_detached,
        })
    }

    // ---- addresses ----

    /// Creates an address for an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the customer does not exist, or
    /// [`Error::Validation`] if a field is invalid.
    pub fn create_address(&mut self, data: AddressData) -> Result<Uuid, Error> {
        self.ensure_customer(Some(data.customer))?;
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        self.addresses.insert(id, Address::new(id, data));
        Ok(id)
    }

    /// Retrieves an address by UUID.
    #[must_use]
    pub fn address(&self, id: Uuid) -> Option<&Address> {
        self.addresses.get(&id)
    }

    /// Returns the addresses owned by a customer.
    pub fn addresses_of(&self, customer: Uuid) -> impl Iterator<Item = &Address> + '_ {
        self.addresses
            .values()
            .filter(move |address| address.customer == customer)
    }

    /// Modifies an address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the address or its (new) owner does not
    /// exist, or [`Error::Validation`] if a field is invalid.
    pub fn update_address(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut AddressData),
    ) -> Result<&Address, Error> {
        let mut data = self
            .addresses
            .get(&id)
            .ok_or(Error::not_found(Entity::Address, id))?
            .data()
            .clone();
        edit(&mut data);
        self.ensure_customer(Some(data.customer))?;
        data.validate(&self.config)?;

        let address = self
            .addresses
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::Address, id))?;
        address.apply(data);
        Ok(address)
    }

    /// Deletes an address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such address.
    pub fn delete_address(&mut self, id: Uuid) -> Result<Address, Error> {
        self.addresses
            .remove(&id)
            .ok_or(Error::not_found(Entity::Address, id))
    }

    // ---- monthly payments ----

    /// Records a monthly payment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a customer is given but does not exist,
    /// or [`Error::Validation`] if a field is invalid.
    pub fn create_payment(&mut self, data: MonthlyPaymentData) -> Result<Uuid, Error> {
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        self.payments.insert(id, MonthlyPayment::new(id, data));
        Ok(id)
    }

    /// Retrieves a payment by UUID.
    #[must_use]
    pub fn payment(&self, id: Uuid) -> Option<&MonthlyPayment> {
        self.payments.get(&id)
    }

    /// Reads a payment together with its customer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such payment.
    pub fn payment_view(&self, id: Uuid) -> Result<PaymentView<'_>, Error> {
        let payment = self
            .payments
            .get(&id)
            .ok_or(Error::not_found(Entity::MonthlyPayment, id))?;
        Ok(self.view(payment))
    }

    /// Returns every payment together with its customer, oldest first.
    pub fn payment_views(&self) -> impl Iterator<Item = PaymentView<'_>> + '_ {
        let mut payments: Vec<_> = self.payments.values().collect();
        payments.sort_by_key(|payment| (payment.date, payment.id()));
        payments.into_iter().map(|payment| self.view(payment))
    }

    /// Returns the payments made by a customer.
    pub fn payments_of(&self, customer: Uuid) -> impl Iterator<Item = &MonthlyPayment> + '_ {
        self.payments
            .values()
            .filter(move |payment| payment.customer == Some(customer))
    }

    /// Modifies a payment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the payment or its (new) customer does
    /// not exist, or [`Error::Validation`] if a field is invalid.
    pub fn update_payment(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut MonthlyPaymentData),
    ) -> Result<&MonthlyPayment, Error> {
        let mut data = self
            .payments
            .get(&id)
            .ok_or(Error::not_found(Entity::MonthlyPayment, id))?
            .data()
            .clone();
        edit(&mut data);
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let payment = self
            .payments
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::MonthlyPayment, id))?;
        payment.apply(data);
        Ok(payment)
    }

    /// Deletes a payment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such payment.
    pub fn delete_payment(&mut self, id: Uuid) -> Result<MonthlyPayment, Error> {
        self.payments
            .remove(&id)
            .ok_or(Error::not_found(Entity::MonthlyPayment, id))
    }

    // ---- work orders ----

    /// Creates a work order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a customer is given but does not exist,
    /// or [`Error::Validation`] if a field is invalid.
    pub fn create_work_order(&mut self, data: WorkOrderData) -> Result<Uuid, Error> {
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        self.work_orders.insert(id, WorkOrder::new(id, data));
        Ok(id)
    }

    /// Retrieves a work order by UUID.
    #[must_use]
    pub fn work_order(&self, id: Uuid) -> Option<&WorkOrder> {
        self.work_orders.get(&id)
    }

    /// Returns every work order.
    pub fn work_orders(&self) -> impl Iterator<Item = &WorkOrder> + '_ {
        self.work_orders.values()
    }

    /// Returns the work orders for a customer.
    pub fn work_orders_of(&self, customer: Uuid) -> impl Iterator<Item = &WorkOrder> + '_ {
        self.work_orders
            .values()
            .filter(move |order| order.customer == Some(customer))
    }

    /// Modifies a work order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the work order or its (new) customer
    /// does not exist, or [`Error::Validation`] if a field is invalid.
    pub fn update_work_order(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut WorkOrderData),
    ) -> Result<&WorkOrder, Error> {
        let mut data = self
            .work_orders
            .get(&id)
            .ok_or(Error::not_found(Entity::WorkOrder, id))?
            .data()
            .clone();
        edit(&mut data);
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let order = self
            .work_orders
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::WorkOrder, id))?;
        order.apply(data);
        Ok(order)
    }

    /// Deletes a work order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such work order.
    pub fn delete_work_order(&mut self, id: Uuid) -> Result<WorkOrder, Error> {
        self.work_orders
            .remove(&id)
            .ok_or(Error::not_found(Entity::WorkOrder, id))
    }

    // ---- installation materials ----

    /// Records materials used for an installation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a customer is given but does not exist,
    /// or [`Error::Validation`] if a field is invalid.
    pub fn create_material(&mut self, data: InstallationMaterialsData) -> Result<Uuid, Error> {
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        let line = InstallationMaterials::new(id, data);
        self.materials.insert(id, line);
        Ok(id)
    }

    /// Retrieves an installation materials line by UUID.
    #[must_use]
    pub fn material(&self, id: Uuid) -> Option<&InstallationMaterials> {
        self.materials.get(&id)
    }

    /// Returns every installation materials line.
    pub fn materials(&self) -> impl Iterator<Item = &InstallationMaterials> + '_ {
        self.materials.values()
    }

    /// Returns the materials used for a customer.
    pub fn materials_of(
        &self,
        customer: Uuid,
    ) -> impl Iterator<Item = &InstallationMaterials> + '_ {
        self.materials
            .values()
            .filter(move |line| line.customer == Some(customer))
    }

    /// Modifies an installation materials line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the line or its (new) customer does not
    /// exist, or [`Error::Validation`] if a field is invalid.
    pub fn update_material(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut InstallationMaterialsData),
    ) -> Result<&InstallationMaterials, Error> {
        let mut data = self
            .materials
            .get(&id)
            .ok_or(Error::not_found(Entity::InstallationMaterials, id))?
            .data()
            .clone();
        edit(&mut data);
        self.ensure_customer(data.customer)?;
        data.validate(&self.config)?;

        let line = self
            .materials
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::InstallationMaterials, id))?;
        line.apply(data);
        Ok(line)
    }

    /// Deletes an installation materials line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such line.
    pub fn delete_material(&mut self, id: Uuid) -> Result<InstallationMaterials, Error> {
        self.materials
            .remove(&id)
            .ok_or(Error::not_found(Entity::InstallationMaterials, id))
    }

    // ---- categories ----

    /// Creates a product category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is invalid.
    pub fn create_category(&mut self, data: CategoryData) -> Result<Uuid, Error> {
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        self.categories.insert(id, Category::new(id, data));
        Ok(id)
    }

    /// Retrieves a category by UUID.
    #[must_use]
    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Returns every category.
    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.values()
    }

    /// Renames or otherwise modifies a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such category, or
    /// [`Error::Validation`] if the modified fields are invalid.
    pub fn update_category(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut CategoryData),
    ) -> Result<&Category, Error> {
        let mut data = self
            .categories
            .get(&id)
            .ok_or(Error::not_found(Entity::Category, id))?
            .data()
            .clone();
        edit(&mut data);
        data.validate(&self.config)?;

        let category = self
            .categories
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::Category, id))?;
        category.apply(data);
        Ok(category)
    }

    /// Deletes a category that no product refers to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such category, or
    /// [`Error::ReferentialIntegrity`] listing the products that still refer
    /// to it.
    #[instrument(skip(self))]
    pub fn delete_category(&mut self, id: Uuid) -> Result<Category, Error> {
        if !self.categories.contains_key(&id) {
            return Err(Error::not_found(Entity::Category, id));
        }

        let mut products: Vec<Uuid> = self.products_in(id).map(Product::id).collect();
        if !products.is_empty() {
            products.sort_unstable();
            tracing::debug!(products = products.len(), "category deletion refused");
            return Err(Error::ReferentialIntegrity {
                category: id,
                products,
            });
        }

        self.categories
            .remove(&id)
            .ok_or(Error::not_found(Entity::Category, id))
    }

    // ---- products ----

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a category is given but does not exist,
    /// or [`Error::Validation`] if a field is invalid.
    pub fn create_product(&mut self, data: ProductData) -> Result<Uuid, Error> {
        self.ensure_category(data.category)?;
        data.validate(&self.config)?;

        let id = Uuid::new_v4();
        let now = self.clock.now();
        self.products.insert(id, Product::new(id, data, now));
        Ok(id)
    }

    /// Retrieves a product by UUID.
    #[must_use]
    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Returns every product.
    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.values()
    }

    /// Returns the products in a category.
    pub fn products_in(&self, category: Uuid) -> impl Iterator<Item = &Product> + '_ {
        self.products
            .values()
            .filter(move |product| product.category == Some(category))
    }

    /// Modifies a product and refreshes `last_update`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product or its (new) category does
    /// not exist, or [`Error::Validation`] if a field is invalid.
    pub fn update_product(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut ProductData),
    ) -> Result<&Product, Error> {
        let mut data = self
            .products
            .get(&id)
            .ok_or(Error::not_found(Entity::Product, id))?
            .data()
            .clone();
        edit(&mut data);
        self.ensure_category(data.category)?;
        data.validate(&self.config)?;

        let now = self.clock.now();
        let product = self
            .products
            .get_mut(&id)
            .ok_or(Error::not_found(Entity::Product, id))?;
        product.apply(data, now);
        Ok(product)
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such product.
    pub fn delete_product(&mut self, id: Uuid) -> Result<Product, Error> {
        self.products
            .remove(&id)
            .ok_or(Error::not_found(Entity::Product, id))
    }

    // ---- snapshots ----

    /// Copies every record into a [`Snapshot`].
    ///
    /// Customers and products are ordered by creation time, everything else
    /// by UUID, so that unchanged stores produce identical snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            customers: self.customers.values().cloned().collect(),
            addresses: self.addresses.values().cloned().collect(),
            payments: self.payments.values().cloned().collect(),
            work_orders: self.work_orders.values().cloned().collect(),
            materials: self.materials.values().cloned().collect(),
            categories: self.categories.values().cloned().collect(),
            products: self.products.values().cloned().collect(),
        };

        snapshot
            .customers
            .sort_by_key(|customer| (customer.created_at(), customer.id()));
        snapshot.addresses.sort_by_key(Address::id);
        snapshot.payments.sort_by_key(MonthlyPayment::id);
        snapshot.work_orders.sort_by_key(WorkOrder::id);
        snapshot.materials.sort_by_key(InstallationMaterials::id);
        snapshot.categories.sort_by_key(Category::id);
        snapshot
            .products
            .sort_by_key(|product| (product.created_at(), product.id()));
        snapshot
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// The relationship rules are checked again while loading: DNIs must be
    /// unique and every customer or category link must resolve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two customers share a DNI,
    /// [`Error::DuplicateId`] if two records of one kind share a UUID,
    /// [`Error::TimestampOutOfRange`] for an unusable timestamp, or
    /// [`Error::NotFound`] for the first link that does not resolve.
    #[instrument(skip_all)]
    pub fn restore(config: Config, snapshot: Snapshot) -> Result<Self, Error> {
        let mut store = Self::new(config);

        for customer in snapshot.customers {
            let id = customer.id();
            store.ensure_dni_free(&customer.dni, None)?;
            store.clock.observe(customer.created_at())?;
            store.clock.observe(customer.updated_at())?;
            let dni = customer.dni.clone();
            insert_unique(&mut store.customers, Entity::Customer, id, customer)?;
            store.dni_index.insert(dni, id);
        }

        for address in snapshot.addresses {
            store.ensure_customer(Some(address.customer))?;
            insert_unique(&mut store.addresses, Entity::Address, address.id(), address)?;
        }
        for payment in snapshot.payments {
            store.ensure_customer(payment.customer)?;
            insert_unique(&mut store.payments, Entity::MonthlyPayment, payment.id(), payment)?;
        }
        for order in snapshot.work_orders {
            store.ensure_customer(order.customer)?;
            insert_unique(&mut store.work_orders, Entity::WorkOrder, order.id(), order)?;
        }
        for line in snapshot.materials {
            store.ensure_customer(line.customer)?;
            let entity = Entity::InstallationMaterials;
            insert_unique(&mut store.materials, entity, line.id(), line)?;
        }

        for category in snapshot.categories {
            insert_unique(&mut store.categories, Entity::Category, category.id(), category)?;
        }
        for product in snapshot.products {
            store.ensure_category(product.category)?;
            store.clock.observe(product.created_at())?;
            store.clock.observe(product.last_update())?;
            insert_unique(&mut store.products, Entity::Product, product.id(), product)?;
        }

        tracing::debug!(
            customers = store.customers.len(),
            products = store.products.len(),
            "restored store"
        );
        Ok(store)
    }
}

impl Store {
    fn view<'a>(&'a self, payment: &'a MonthlyPayment) -> PaymentView<'a> {
        PaymentView {
            payment,
            customer: payment.customer.and_then(|id| self.customers.get(&id)),
        }
    }

    /// Fails if `dni` belongs to a customer other than `owner`.
    fn ensure_dni_free(&self, dni: &Dni, owner: Option<Uuid>) -> Result<(), Error> {
        match self.dni_index.get(dni) {
            Some(&existing) if Some(existing) != owner => Err(Error::DuplicateKey {
                dni: dni.clone(),
                existing,
            }),
            _ => Ok(()),
        }
    }

    fn ensure_customer(&self, link: Option<Uuid>) -> Result<(), Error> {
        match link {
            Some(id) if !self.customers.contains_key(&id) => {
                Err(Error::not_found(Entity::Customer, id))
            }
            _ => Ok(()),
        }
    }

    fn ensure_category(&self, link: Option<Uuid>) -> Result<(), Error> {
        match link {
            Some(id) if !self.categories.contains_key(&id) => {
                Err(Error::not_found(Entity::Category, id))
            }
            _ => Ok(()),
        }
    }
}

/// Inserts a restored record, refusing to replace one with the same UUID.
fn insert_unique<T>(
    table: &mut HashMap<Uuid, T>,
    entity: Entity,
    id: Uuid,
    record: T,
) -> Result<(), Error> {
    match table.entry(id) {
        Entry::Occupied(_) => Err(Error::DuplicateId { entity, id }),
        Entry::Vacant(slot) => {
            slot.insert(record);
            Ok(())
        }
    }
}
