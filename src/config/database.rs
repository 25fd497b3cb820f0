//! Database configuration module for `stockroom`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.

use crate::entities::InventoryItem;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/inventory.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to `configured` when it is unset.
#[must_use]
pub fn get_database_url(configured: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| configured.to_string())
}

/// Returns the on-disk path of a file-backed `SQLite` URL, or `None` for in-memory
/// databases and other backends.
#[must_use]
pub fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the database at `url` and makes sure the tables exist.
///
/// The parent directory of a file-backed `SQLite` database is created first.
///
/// # Errors
/// Returns an error if the directory cannot be created, the connection fails or
/// table creation fails.
#[instrument]
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(url).and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        debug!(?parent, "Ensuring database directory exists");
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::connect(url).await?;
    create_tables(&db).await?;
    info!("Database connection ready");
    Ok(db)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity
/// definitions. Existing tables are left alone.
///
/// # Errors
/// Returns an error if a statement fails to execute.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut inventory_table = schema.create_table_from_entity(InventoryItem);
    inventory_table.if_not_exists();

    db.execute(builder.build(&inventory_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::inventory_item::Model as InventoryItemModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that the table exists by querying it
        let _: Vec<InventoryItemModel> = InventoryItem::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        let _: Vec<InventoryItemModel> = InventoryItem::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/inventory.sqlite?mode=rwc"),
            Some(Path::new("data/inventory.sqlite"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:./stock.db"),
            Some(Path::new("./stock.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }
}
