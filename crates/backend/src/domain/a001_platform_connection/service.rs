use anyhow::Result;
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

use super::repository;

pub async fn get_by_id(id: Uuid) -> Result<Option<PlatformConnection>> {
    repository::get_by_id(get_connection(), id).await
}

pub async fn list_used() -> Result<Vec<PlatformConnection>> {
    repository::list_used(get_connection()).await
}

pub async fn save(connection: &PlatformConnection) -> Result<Uuid> {
    connection
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    repository::save(get_connection(), connection).await
}
