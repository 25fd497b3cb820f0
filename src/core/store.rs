//! Record store - the authoritative in-memory product table for one session.
//!
//! The store is an ordinary owned value: callers pass it by `&` for reads and
//! `&mut` for mutations, and there is no process-wide instance. Every mutation
//! validates first and commits second, so a failed call leaves the store exactly
//! as it was.

use crate::{
    core::product::{NewProduct, Product, ProductUpdate},
    errors::{Error, Result},
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Prefix used for generated ids when none is configured.
pub const DEFAULT_ID_PREFIX: &str = "PROD";

/// Ordered, id-indexed collection of products.
#[derive(Debug, Clone)]
pub struct RecordStore {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    id_prefix: String,
}

/// Immutable point-in-time copy of the store, used by export, reports and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    products: Vec<Product>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates an empty store generating ids as `PROD-0001`, `PROD-0002`, ...
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_prefix(DEFAULT_ID_PREFIX)
    }

    /// Creates an empty store with a custom prefix for generated ids.
    #[must_use]
    pub fn with_id_prefix(prefix: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            index: HashMap::new(),
            id_prefix: prefix.into(),
        }
    }

    /// Rebuilds a store from already-validated products, keeping their order.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if two products share an id.
    pub fn from_products(
        prefix: impl Into<String>,
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self> {
        let mut store = Self::with_id_prefix(prefix);
        for product in products {
            store.insert(product)?;
        }
        Ok(store)
    }

    /// Prefix used for generated ids
    #[must_use]
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// Validates and stores a new product, returning its id.
    ///
    /// If `input.id` is `None` an id is generated from the store's prefix.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a field is invalid or the id is already taken.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add(&mut self, input: NewProduct) -> Result<String> {
        let id = match input.id.as_deref() {
            Some(requested) => requested.to_string(),
            None => self.next_id(),
        };
        let product = Product::new(&id, input)?;
        let id = product.id().to_string();
        self.insert(product)?;
        info!(id = %id, "Product added");
        Ok(id)
    }

    /// Applies a partial update to the product with the given id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id, or [`Error::Validation`] if the
    /// updated record would be invalid. The stored record is unchanged on error.
    #[instrument(skip(self, update))]
    pub fn update(&mut self, id: &str, update: ProductUpdate) -> Result<&Product> {
        let position = self.position(id)?;
        let updated = self.products[position].with_update(update)?;
        self.products[position] = updated;
        info!("Product updated");
        Ok(&self.products[position])
    }

    /// Removes the product with the given id and returns it.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Product> {
        let position = self.position(id)?;
        let removed = self.products.remove(position);
        self.reindex();
        info!("Product deleted");
        Ok(removed)
    }

    /// Looks up a product by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn get(&self, id: &str) -> Result<&Product> {
        self.position(id).map(|position| &self.products[position])
    }

    /// All products in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// True if a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id.trim())
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the store holds no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Removes every product, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.products.len();
        self.products.clear();
        self.index.clear();
        info!(removed, "Store cleared");
        removed
    }

    /// Takes an immutable copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.products.clone(),
        }
    }

    fn insert(&mut self, product: Product) -> Result<()> {
        if self.index.contains_key(product.id()) {
            return Err(Error::validation(
                "id",
                format!("Product id '{}' already exists", product.id()),
            ));
        }
        self.index
            .insert(product.id().to_string(), self.products.len());
        self.products.push(product);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id.trim())
            .copied()
            .ok_or_else(|| Error::not_found(id.trim()))
    }

    fn reindex(&mut self) {
        self.index = self
            .products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id().to_string(), position))
            .collect();
    }

    /// Next free `<prefix>-<NNNN>` id, starting after the current record count.
    fn next_id(&self) -> String {
        let mut sequence = self.products.len() + 1;
        loop {
            let candidate = format!("{}-{sequence:04}", self.id_prefix);
            if !self.index.contains_key(&candidate) {
                debug!(id = %candidate, "Generated product id");
                return candidate;
            }
            sequence += 1;
        }
    }
}

impl Snapshot {
    /// Builds a snapshot directly from products, mainly for tests and previews.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Products in store order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterates products in store order
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{price, widget_and_gadget};
    use rust_decimal::Decimal;

    #[test]
    fn test_add_then_get_returns_equal_record() {
        let mut store = RecordStore::new();
        let input = NewProduct::new("Widget", 10, price("2.50"))
            .with_category("Tools")
            .with_location("ALM-01");
        let id = store.add(input.clone()).unwrap();

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.name(), input.name);
        assert_eq!(i64::from(stored.quantity()), input.quantity);
        assert_eq!(stored.unit_price(), input.unit_price);
        assert_eq!(stored.category(), input.category.as_deref());
        assert_eq!(stored.location(), input.location.as_deref());
    }

    #[test]
    fn test_generated_ids_are_sequential() {
        let mut store = RecordStore::new();
        let first = store.add(NewProduct::new("A", 1, Decimal::ONE)).unwrap();
        let second = store.add(NewProduct::new("B", 1, Decimal::ONE)).unwrap();
        assert_eq!(first, "PROD-0001");
        assert_eq!(second, "PROD-0002");
    }

    #[test]
    fn test_generated_id_skips_taken_ids() {
        let mut store = RecordStore::with_id_prefix("SKU");
        store
            .add(NewProduct::new("A", 1, Decimal::ONE).with_id("SKU-0002"))
            .unwrap();
        // len + 1 == 2 is taken, so the generator moves on
        let id = store.add(NewProduct::new("B", 1, Decimal::ONE)).unwrap();
        assert_eq!(id, "SKU-0003");
    }

    #[test]
    fn test_duplicate_id_is_rejected_without_change() {
        let mut store = RecordStore::new();
        store
            .add(NewProduct::new("A", 1, Decimal::ONE).with_id("X-1"))
            .unwrap();
        let result = store.add(NewProduct::new("B", 2, Decimal::ONE).with_id("X-1"));
        assert!(matches!(result, Err(Error::Validation { field: "id", .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("X-1").unwrap().name(), "A");
    }

    #[test]
    fn test_invalid_add_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        let result = store.add(NewProduct::new("Widget", -5, Decimal::ONE));
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_then_get_fails_with_not_found() {
        let mut store = widget_and_gadget();
        let removed = store.delete("PROD-0001").unwrap();
        assert_eq!(removed.name(), "Widget");

        assert!(matches!(
            store.get("PROD-0001"),
            Err(Error::NotFound { id }) if id == "PROD-0001"
        ));
        // Remaining record is still reachable after the index rebuild
        assert_eq!(store.get("PROD-0002").unwrap().name(), "Gadget");
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.delete("nope"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_rejects_negative_values_atomically() {
        let mut store = widget_and_gadget();
        let before = store.snapshot();

        let result = store.update(
            "PROD-0001",
            ProductUpdate {
                name: Some("Renamed".to_string()),
                quantity: Some(-1),
                ..ProductUpdate::default()
            },
        );
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "quantity",
                ..
            })
        ));

        let result = store.update(
            "PROD-0001",
            ProductUpdate {
                unit_price: Some(price("-2.00")),
                ..ProductUpdate::default()
            },
        );
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "unit_price",
                ..
            })
        ));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = RecordStore::new();
        let result = store.update("missing", ProductUpdate::default());
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_update_applies_fields() {
        let mut store = widget_and_gadget();
        let updated = store
            .update(
                "PROD-0002",
                ProductUpdate {
                    quantity: Some(7),
                    location: Some(Some("B-12".to_string())),
                    ..ProductUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.quantity(), 7);
        assert_eq!(updated.location(), Some("B-12"));
        assert_eq!(updated.name(), "Gadget");
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = RecordStore::new();
        for name in ["Zeta", "Alpha", "Mu"] {
            store.add(NewProduct::new(name, 1, Decimal::ONE)).unwrap();
        }
        let names: Vec<&str> = store.list().iter().map(Product::name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_mutations() {
        let mut store = widget_and_gadget();
        let snapshot = store.snapshot();
        store.clear();
        assert_eq!(snapshot.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let a = Product::new("A", NewProduct::new("One", 1, Decimal::ONE)).unwrap();
        let b = Product::new("A", NewProduct::new("Two", 1, Decimal::ONE)).unwrap();
        let result = RecordStore::from_products("PROD", vec![a, b]);
        assert!(matches!(result, Err(Error::Validation { field: "id", .. })));
    }

    #[test]
    fn test_lookup_trims_id() {
        let store = widget_and_gadget();
        assert!(store.contains(" PROD-0001 "));
        assert!(store.get("PROD-0002 ").is_ok());
    }
}
