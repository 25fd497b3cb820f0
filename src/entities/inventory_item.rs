//! Inventory item entity - One persisted product row.
//!
//! Rows are rewritten wholesale on every save, so `position` carries the store's
//! insertion order across restarts. `unit_price` is kept as decimal text because
//! `SQLite` has no exact decimal column type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    /// Product id (e.g., "PROD-0001")
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Zero-based position in the store
    pub position: i64,
    /// Product name
    pub name: String,
    /// Units in stock
    pub quantity: i64,
    /// Price per unit, as decimal text (e.g., "2.50")
    pub unit_price: String,
    /// Optional category label
    pub category: Option<String>,
    /// Optional warehouse location
    pub location: Option<String>,
}

/// Inventory items have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
