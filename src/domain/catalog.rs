//! The product catalog.
//!
//! A [`Category`] cannot be deleted while any [`Product`] still refers to
//! it; products must be moved or deleted first.

use std::{fmt, ops::Deref};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{validation, Config, ValidationError};

/// The editable fields of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    /// Category name.
    pub name: String,
}

impl CategoryData {
    /// Creates category fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("name", &self.name, config)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: Uuid,
    #[serde(flatten)]
    data: CategoryData,
}

impl Category {
    pub(crate) const fn new(id: Uuid, data: CategoryData) -> Self {
        Self { id, data }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &CategoryData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: CategoryData) {
        self.data = data;
    }
}

impl Deref for Category {
    type Target = CategoryData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The editable fields of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    /// Product name.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// The product's category, if any.
    #[serde(default)]
    pub category: Option<Uuid>,
    /// Unit price.
    pub price: Decimal,
    /// Units in stock.
    ///
    /// Nothing keeps this non-negative; stock movements are recorded by
    /// whoever sets it.
    pub inventory: i32,
}

impl ProductData {
    /// Creates product fields with an empty description and no category.
    #[must_use]
    pub fn new(title: impl Into<String>, price: Decimal, inventory: i32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: None,
            price,
            inventory,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Places the product in a category.
    #[must_use]
    pub fn in_category(mut self, category: Uuid) -> Self {
        self.category = Some(category);
        self
    }

    pub(crate) fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validation::required("title", &self.title, config)?;
        validation::decimal("price", self.price, config)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_update: DateTime<Utc>,
    #[serde(flatten)]
    data: ProductData,
}

impl Product {
    pub(crate) const fn new(id: Uuid, data: ProductData, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            last_update: now,
            data,
        }
    }

    /// The record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the product was created. Never changes.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the product was last modified.
    #[must_use]
    pub const fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// The editable fields.
    #[must_use]
    pub const fn data(&self) -> &ProductData {
        &self.data
    }

    pub(crate) fn apply(&mut self, data: ProductData, now: DateTime<Utc>) {
        self.data = data;
        self.last_update = now;
    }
}

impl Deref for Product {
    type Target = ProductData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
