//! Product record - the single entity held by the inventory store.
//!
//! A [`Product`] can only be built through [`Product::new`], which validates every
//! field. Raw, loosely-typed input (CLI arguments, spreadsheet rows, database rows)
//! arrives as a [`NewProduct`] or a [`ProductUpdate`] and is checked before anything
//! is stored, so a `Product` in hand always satisfies the inventory invariants.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Longest product name accepted.
pub const MAX_NAME_LEN: usize = 50;
/// Longest warehouse location accepted.
pub const MAX_LOCATION_LEN: usize = 20;
/// Longest product id accepted.
pub const MAX_ID_LEN: usize = 32;
/// Highest unit price accepted. With quantities capped at `u32::MAX`, line values
/// and inventory totals stay far inside `Decimal`'s range.
pub const MAX_UNIT_PRICE: u32 = 1_000_000_000;

/// A validated inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    name: String,
    quantity: u32,
    unit_price: Decimal,
    category: Option<String>,
    location: Option<String>,
}

/// Unvalidated input for a new product.
///
/// `quantity` is signed so that negative input is representable and can be
/// rejected with a proper validation error instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProduct {
    /// Requested id; `None` lets the store generate one
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Units in stock
    pub quantity: i64,
    /// Price per unit
    pub unit_price: Decimal,
    /// Optional category label
    pub category: Option<String>,
    /// Optional warehouse location
    pub location: Option<String>,
}

/// Partial update of an existing product. `None` leaves a field untouched.
///
/// For the optional text fields, `Some(None)` (or `Some(Some(""))`) clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New stock level
    pub quantity: Option<i64>,
    /// New unit price
    pub unit_price: Option<Decimal>,
    /// New category
    pub category: Option<Option<String>>,
    /// New location
    pub location: Option<Option<String>>,
}

impl NewProduct {
    /// Convenience constructor for the required fields.
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    /// Sets the requested id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the warehouse location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl ProductUpdate {
    /// True when the update would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.category.is_none()
            && self.location.is_none()
    }
}

impl Product {
    /// Validating constructor. Trims text fields and rejects anything that breaks
    /// an invariant.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if:
    /// - The id is empty, contains whitespace or is too long
    /// - The name is empty or too long
    /// - The quantity is negative or does not fit in a `u32`
    /// - The unit price is negative or above [`MAX_UNIT_PRICE`]
    /// - The location is too long
    pub fn new(id: &str, input: NewProduct) -> Result<Self> {
        Ok(Self {
            id: validate_id(id)?,
            name: validate_name(&input.name)?,
            quantity: validate_quantity(input.quantity)?,
            unit_price: validate_unit_price(input.unit_price)?,
            category: normalize_optional(input.category),
            location: validate_location(input.location)?,
        })
    }

    /// Returns a copy of this product with `update` applied, leaving `self` untouched.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if any updated field is invalid.
    pub fn with_update(&self, update: ProductUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = validate_name(&name)?;
        }
        if let Some(quantity) = update.quantity {
            next.quantity = validate_quantity(quantity)?;
        }
        if let Some(unit_price) = update.unit_price {
            next.unit_price = validate_unit_price(unit_price)?;
        }
        if let Some(category) = update.category {
            next.category = normalize_optional(category);
        }
        if let Some(location) = update.location {
            next.location = validate_location(location)?;
        }
        Ok(next)
    }

    /// Unique identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units in stock
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price per unit
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Category label, if any
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Warehouse location, if any
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// `quantity * unit_price`
    #[must_use]
    pub fn line_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

fn validate_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::validation("id", "Product id cannot be empty"));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(Error::validation(
            "id",
            format!("Product id '{id}' cannot contain whitespace"),
        ));
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err(Error::validation(
            "id",
            format!("Product id cannot be longer than {MAX_ID_LEN} characters"),
        ));
    }
    Ok(id.to_string())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Product name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("Product name cannot be longer than {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

fn validate_quantity(quantity: i64) -> Result<u32> {
    if quantity < 0 {
        return Err(Error::validation(
            "quantity",
            format!("Quantity cannot be negative (got {quantity})"),
        ));
    }
    u32::try_from(quantity)
        .map_err(|_| Error::validation("quantity", format!("Quantity {quantity} is too large")))
}

fn validate_unit_price(unit_price: Decimal) -> Result<Decimal> {
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(Error::validation(
            "unit_price",
            format!("Unit price cannot be negative (got {unit_price})"),
        ));
    }
    if unit_price > Decimal::from(MAX_UNIT_PRICE) {
        return Err(Error::validation(
            "unit_price",
            format!("Unit price cannot be greater than {MAX_UNIT_PRICE} (got {unit_price})"),
        ));
    }
    Ok(unit_price)
}

fn validate_location(location: Option<String>) -> Result<Option<String>> {
    let location = normalize_optional(location);
    if let Some(loc) = &location
        && loc.chars().count() > MAX_LOCATION_LEN
    {
        return Err(Error::validation(
            "location",
            format!("Location cannot be longer than {MAX_LOCATION_LEN} characters"),
        ));
    }
    Ok(location)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
