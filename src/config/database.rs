//! Database connection and schema setup.
//!
//! The shipments table is generated from the entity definition with
//! `Schema::create_table_from_entity`, so the schema always matches
//! [`crate::entities::shipment::Model`].

use crate::entities::Shipment;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Connects to `url`. For a file-backed `SQLite` URL the parent directory is
/// created first.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    let parent = sqlite_file_path(url)
        .and_then(|path| Path::new(path).parent())
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir)?;
        debug!("Ensured database directory {:?}", dir);
    }

    let db = Database::connect(url).await?;
    info!("Database connection established.");
    Ok(db)
}

/// File path of a `sqlite://` URL, without query parameters. `None` for
/// in-memory databases and other backends.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

/// Creates the shipments table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut shipments = schema.create_table_from_entity(Shipment);
    shipments.if_not_exists();
    db.execute(builder.build(&shipments)).await?;

    Ok(())
}
