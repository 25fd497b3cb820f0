//! Persistence - loads and saves the record store through `SeaORM`.
//!
//! A save replaces the whole table inside one transaction, so the database always
//! holds a complete snapshot. Loading runs every row back through the validating
//! product constructor; a row that no longer validates is a database error.

use crate::{
    core::{
        product::{NewProduct, Product},
        store::{RecordStore, Snapshot},
    },
    entities::{InventoryItem, inventory_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DbErr, QueryOrder, Set, TransactionTrait, prelude::*};
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Rows per `INSERT`. Each row binds 7 values, so a batch stays under even the
/// 999 bound-variable limit of older `SQLite` builds.
const SAVE_BATCH_SIZE: usize = 100;

/// Reads every persisted product, in stored order, into a fresh store.
///
/// # Errors
/// Returns an error if the query fails or a stored row is not a valid product.
#[instrument(skip(db))]
pub async fn load_store(db: &DatabaseConnection, id_prefix: &str) -> Result<RecordStore> {
    let rows = InventoryItem::find()
        .order_by_asc(inventory_item::Column::Position)
        .all(db)
        .await?;

    let products = rows
        .into_iter()
        .map(model_to_product)
        .collect::<Result<Vec<_>>>()?;
    let store = RecordStore::from_products(id_prefix, products)?;
    info!(products = store.len(), "Loaded inventory");
    Ok(store)
}

/// Replaces the persisted inventory with `snapshot`.
///
/// # Errors
/// Returns an error if any statement fails; the transaction is rolled back and the
/// previous contents remain.
#[instrument(skip(db, snapshot), fields(products = snapshot.len()))]
pub async fn save_store(db: &DatabaseConnection, snapshot: &Snapshot) -> Result<()> {
    let models = snapshot
        .iter()
        .enumerate()
        .map(|(position, product)| product_to_active_model(position, product))
        .collect::<Result<Vec<_>>>()?;

    let txn = db.begin().await?;
    InventoryItem::delete_many().exec(&txn).await?;
    let mut rows = models.into_iter().peekable();
    while rows.peek().is_some() {
        let batch: Vec<_> = rows.by_ref().take(SAVE_BATCH_SIZE).collect();
        debug!(rows = batch.len(), "Inserting batch");
        InventoryItem::insert_many(batch).exec(&txn).await?;
    }
    txn.commit().await?;

    info!("Saved inventory");
    Ok(())
}

fn product_to_active_model(position: usize, product: &Product) -> Result<inventory_item::ActiveModel> {
    let position = i64::try_from(position)
        .map_err(|e| Error::Database(DbErr::Custom(format!("position out of range: {e}"))))?;
    Ok(inventory_item::ActiveModel {
        id: Set(product.id().to_string()),
        position: Set(position),
        name: Set(product.name().to_string()),
        quantity: Set(i64::from(product.quantity())),
        unit_price: Set(product.unit_price().to_string()),
        category: Set(product.category().map(str::to_string)),
        location: Set(product.location().map(str::to_string)),
    })
}

fn model_to_product(model: inventory_item::Model) -> Result<Product> {
    let unit_price = Decimal::from_str(&model.unit_price).map_err(|e| {
        Error::Database(DbErr::Custom(format!(
            "stored unit_price '{}' for '{}' is not a decimal: {e}",
            model.unit_price, model.id
        )))
    })?;
    let input = NewProduct {
        id: None,
        name: model.name,
        quantity: model.quantity,
        unit_price,
        category: model.category,
        location: model.location,
    };
    Product::new(&model.id, input).map_err(|e| {
        Error::Database(DbErr::Custom(format!(
            "stored product '{}' is invalid: {e}",
            model.id
        )))
    })
}
