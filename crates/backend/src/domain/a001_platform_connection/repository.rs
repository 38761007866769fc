use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_platform_connection::aggregate::{
    AuthorizationType, PlatformConnection, PlatformConnectionId,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::PlatformType;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_platform_connection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub platform_type: String,
    pub user_id: String,
    pub api_key: String,
    pub api_secret: Option<String>,
    pub supplier_id: Option<String>,
    pub merchant_id: Option<String>,
    pub is_used: bool,
    pub test_mode: bool,
    pub authorization_type: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PlatformConnection {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        PlatformConnection {
            base: BaseAggregate::with_metadata(
                PlatformConnectionId(uuid),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            platform_type: PlatformType::from_code(&m.platform_type).unwrap_or_default(),
            user_id: m.user_id,
            api_key: m.api_key,
            api_secret: m.api_secret,
            supplier_id: m.supplier_id,
            merchant_id: m.merchant_id,
            is_used: m.is_used,
            test_mode: m.test_mode,
            authorization_type: match m.authorization_type.as_str() {
                "Basic Auth" => AuthorizationType::BasicAuth,
                _ => AuthorizationType::ApiKey,
            },
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<PlatformConnection>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn list_used<C: ConnectionTrait>(db: &C) -> Result<Vec<PlatformConnection>> {
    let items: Vec<PlatformConnection> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsUsed.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn save<C: ConnectionTrait>(db: &C, connection: &PlatformConnection) -> Result<Uuid> {
    let id_str = connection.base.id.0.to_string();
    let existing = Entity::find_by_id(&id_str).one(db).await?;

    let active = ActiveModel {
        id: Set(id_str),
        code: Set(connection.base.code.clone()),
        description: Set(connection.base.description.clone()),
        comment: Set(connection.base.comment.clone()),
        platform_type: Set(connection.platform_type.code().to_string()),
        user_id: Set(connection.user_id.clone()),
        api_key: Set(connection.api_key.clone()),
        api_secret: Set(connection.api_secret.clone()),
        supplier_id: Set(connection.supplier_id.clone()),
        merchant_id: Set(connection.merchant_id.clone()),
        is_used: Set(connection.is_used),
        test_mode: Set(connection.test_mode),
        authorization_type: Set(connection.authorization_type.as_str().to_string()),
        is_deleted: Set(connection.base.metadata.is_deleted),
        is_posted: Set(connection.base.metadata.is_posted),
        created_at: Set(Some(connection.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(connection.base.metadata.version),
    };

    if existing.is_some() {
        active.update(db).await?;
    } else {
        active.insert(db).await?;
    }

    Ok(connection.base.id.0)
}
