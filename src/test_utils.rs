//! Shared test utilities for `stockroom`.
//!
//! This module provides common helpers for building stores with known contents
//! and for setting up in-memory databases.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        product::NewProduct,
        store::{RecordStore, Snapshot},
    },
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

/// Parses a decimal literal, panicking on typos in test code.
pub fn price(literal: &str) -> Decimal {
    Decimal::from_str(literal).unwrap()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for persistence tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Store holding `Widget` (10 @ 2.50, Tools) and `Gadget` (0 @ 9.99, uncategorized)
/// as `PROD-0001` and `PROD-0002`.
pub fn widget_and_gadget() -> RecordStore {
    let mut store = RecordStore::new();
    store
        .add(NewProduct::new("Widget", 10, price("2.50")).with_category("Tools"))
        .unwrap();
    store
        .add(NewProduct::new("Gadget", 0, price("9.99")))
        .unwrap();
    store
}

/// Snapshot of three products: (2, 5.00), (1, 10.00), (0, 3.00).
///
/// # Defaults
/// * categories: `Food`, `Food`, `Hardware`
/// * locations: `ALM-01`, none, `ALM-02`
pub fn three_item_snapshot() -> Snapshot {
    let mut store = RecordStore::new();
    store
        .add(
            NewProduct::new("Apples", 2, price("5.00"))
                .with_category("Food")
                .with_location("ALM-01"),
        )
        .unwrap();
    store
        .add(NewProduct::new("Bread", 1, price("10.00")).with_category("Food"))
        .unwrap();
    store
        .add(
            NewProduct::new("Hammer", 0, price("3.00"))
                .with_category("Hardware")
                .with_location("ALM-02"),
        )
        .unwrap();
    store.snapshot()
}

/// Store with `count` products named `Item N`, quantity `N`, price `1.00`.
pub fn numbered_store(count: u32) -> RecordStore {
    let mut store = RecordStore::new();
    for n in 1..=count {
        store
            .add(NewProduct::new(format!("Item {n}"), i64::from(n), Decimal::ONE))
            .unwrap();
    }
    store
}
