use anyhow::Result;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Модель для хранения сырых JSON от площадок (verbatim payload для
/// аудита и повторной обработки)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_raw_storage")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub platform: String,
    pub document_type: String,
    pub document_no: String,
    pub raw_json: String,
    pub fetched_at: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Сохранить сырой JSON ответа площадки. Принимает соединение явно,
/// чтобы запись попала в ту же транзакцию, что и сам заказ.
/// Возвращает ref (id записи) для поля source_meta.raw_ref.
pub async fn save_raw_json<C: ConnectionTrait>(
    db: &C,
    platform: &str,
    document_type: &str,
    document_no: &str,
    raw_json: &str,
    fetched_at: chrono::DateTime<Utc>,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();

    let active = ActiveModel {
        id: Set(id.clone()),
        platform: Set(platform.to_string()),
        document_type: Set(document_type.to_string()),
        document_no: Set(document_no.to_string()),
        raw_json: Set(raw_json.to_string()),
        fetched_at: Set(fetched_at.to_rfc3339()),
        created_at: Set(Utc::now().to_rfc3339()),
    };

    active.insert(db).await?;

    tracing::debug!(
        "Saved raw JSON: platform={}, document_type={}, document_no={}, id={}",
        platform,
        document_type,
        document_no,
        id
    );

    Ok(id)
}

/// Получить сырой JSON по ref
pub async fn get_by_ref<C: ConnectionTrait>(db: &C, ref_id: &str) -> Result<Option<String>> {
    let result = Entity::find_by_id(ref_id.to_string()).one(db).await?;
    Ok(result.map(|m| m.raw_json))
}

/// Удалить старые записи (старше N дней)
pub async fn cleanup_old<C: ConnectionTrait>(db: &C, days: i64) -> Result<u64> {
    let cutoff_date = Utc::now() - chrono::Duration::days(days);
    let cutoff_str = cutoff_date.to_rfc3339();

    let result = Entity::delete_many()
        .filter(Column::CreatedAt.lt(cutoff_str))
        .exec(db)
        .await?;

    tracing::info!(
        "Cleaned up {} old raw JSON records (older than {} days)",
        result.rows_affected,
        days
    );

    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::bootstrap_schema;

    async fn test_db() -> sea_orm::DatabaseConnection {
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_owned());
        options.max_connections(1);
        let conn = sea_orm::Database::connect(options).await.unwrap();
        bootstrap_schema(&conn).await.unwrap();
        conn
    }

    #[tokio::test]
    async fn test_saved_payload_is_returned_verbatim() {
        let db = test_db().await;
        let payload = r#"{"id":"A1","lines":[{"price":10.5}]}"#;

        let ref_id = save_raw_json(&db, "mp-trendyol", "sales_order", "A1", payload, Utc::now())
            .await
            .unwrap();

        let stored = get_by_ref(&db, &ref_id).await.unwrap();
        assert_eq!(stored.as_deref(), Some(payload));
    }

    #[tokio::test]
    async fn test_cleanup_keeps_fresh_records() {
        let db = test_db().await;
        save_raw_json(&db, "mp-n11", "sales_order", "B2", "{}", Utc::now())
            .await
            .unwrap();

        let removed = cleanup_old(&db, 30).await.unwrap();
        assert_eq!(removed, 0);

        let still_there = Entity::find().one(&db).await.unwrap();
        assert!(still_there.is_some());
    }
}
