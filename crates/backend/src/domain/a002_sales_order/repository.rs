use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::a002_sales_order::aggregate::{
    OrderAddress, OrderCustomer, OrderItem, OrderSourceMeta, OrderStatus, SalesOrder, SalesOrderId,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::PlatformType;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_sales_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub external_order_id: Option<String>,
    pub order_number: Option<String>,
    pub platform_type: String,
    pub user_id: String,
    pub connection_id: String,
    pub order_status: String,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub total_amount: f64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address_json: Option<String>,
    pub billing_address_json: Option<String>,
    pub items_json: String,
    pub source_meta_json: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SalesOrder {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        let items: Vec<OrderItem> = serde_json::from_str(&m.items_json).unwrap_or_default();
        let shipping_address: Option<OrderAddress> = m
            .shipping_address_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());
        let billing_address: Option<OrderAddress> = m
            .billing_address_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());
        let mut source_meta: OrderSourceMeta =
            serde_json::from_str(&m.source_meta_json).unwrap_or_default();
        if source_meta.connection_id.is_empty() {
            source_meta.connection_id = m.connection_id.clone();
        }

        SalesOrder {
            base: BaseAggregate::with_metadata(
                SalesOrderId(uuid),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            external_order_id: m.external_order_id,
            order_number: m.order_number,
            platform_type: PlatformType::from_code(&m.platform_type).unwrap_or_default(),
            user_id: m.user_id,
            order_status: OrderStatus::from_code(&m.order_status).unwrap_or(OrderStatus::Unknown),
            order_date: m.order_date,
            total_amount: m.total_amount,
            currency: m.currency,
            customer: OrderCustomer {
                name: m.customer_name,
                email: m.customer_email,
                phone: m.customer_phone,
            },
            shipping_address,
            billing_address,
            items,
            source_meta,
        }
    }
}

/// Поиск по натуральному ключу дедупликации: запись считается той же самой,
/// если любой из идентификаторов кандидата совпадает с любым из
/// идентификаторов существующей записи той же площадки и пользователя.
/// Принимает соединение явно — проверка обязана выполняться в той же
/// транзакции, что и последующая вставка.
pub async fn find_by_natural_key<C: ConnectionTrait>(
    db: &C,
    platform: PlatformType,
    user_id: &str,
    external_order_id: Option<&str>,
    order_number: Option<&str>,
) -> Result<Option<SalesOrder>, DbErr> {
    let mut identifiers: Vec<String> = Vec::new();
    if let Some(ext) = external_order_id {
        if !ext.is_empty() {
            identifiers.push(ext.to_string());
        }
    }
    if let Some(num) = order_number {
        if !num.is_empty() && !identifiers.contains(&num.to_string()) {
            identifiers.push(num.to_string());
        }
    }
    if identifiers.is_empty() {
        return Ok(None);
    }

    let condition = Condition::any()
        .add(Column::ExternalOrderId.is_in(identifiers.clone()))
        .add(Column::OrderNumber.is_in(identifiers));

    let model = Entity::find()
        .filter(Column::PlatformType.eq(platform.code()))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDeleted.eq(false))
        .filter(condition)
        .one(db)
        .await?;

    Ok(model.map(Into::into))
}

/// Вставить новый заказ. Исполнитель синхронизации только создает записи,
/// обновление существующих — отдельная забота вне этой подсистемы.
pub async fn insert<C: ConnectionTrait>(db: &C, order: &SalesOrder) -> Result<Uuid> {
    let active = ActiveModel {
        id: Set(order.base.id.0.to_string()),
        code: Set(order.base.code.clone()),
        description: Set(order.base.description.clone()),
        comment: Set(order.base.comment.clone()),
        external_order_id: Set(order.external_order_id.clone()),
        order_number: Set(order.order_number.clone()),
        platform_type: Set(order.platform_type.code().to_string()),
        user_id: Set(order.user_id.clone()),
        connection_id: Set(order.source_meta.connection_id.clone()),
        order_status: Set(order.order_status.as_str().to_string()),
        order_date: Set(order.order_date),
        total_amount: Set(order.total_amount),
        currency: Set(order.currency.clone()),
        customer_name: Set(order.customer.name.clone()),
        customer_email: Set(order.customer.email.clone()),
        customer_phone: Set(order.customer.phone.clone()),
        shipping_address_json: Set(order
            .shipping_address
            .as_ref()
            .and_then(|a| serde_json::to_string(a).ok())),
        billing_address_json: Set(order
            .billing_address
            .as_ref()
            .and_then(|a| serde_json::to_string(a).ok())),
        items_json: Set(serde_json::to_string(&order.items)?),
        source_meta_json: Set(serde_json::to_string(&order.source_meta)?),
        is_deleted: Set(order.base.metadata.is_deleted),
        is_posted: Set(order.base.metadata.is_posted),
        created_at: Set(Some(order.base.metadata.created_at)),
        updated_at: Set(Some(order.base.metadata.updated_at)),
        version: Set(order.base.metadata.version),
    };

    active.insert(db).await?;
    Ok(order.base.id.0)
}

/// Самая ранняя дата заказа для пользователя и подключения — отправная
/// точка обратного обхода истории, когда токен продолжения отсутствует
pub async fn earliest_order_date<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    connection_id: &str,
) -> Result<Option<DateTime<Utc>>> {
    let model = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ConnectionId.eq(connection_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::OrderDate)
        .limit(1)
        .one(db)
        .await?;
    Ok(model.map(|m| m.order_date))
}

/// Количество заказов площадки у пользователя (для итогов и тестов)
pub async fn count_for_user<C: ConnectionTrait>(
    db: &C,
    platform: PlatformType,
    user_id: &str,
) -> Result<u64> {
    let count = Entity::find()
        .filter(Column::PlatformType.eq(platform.code()))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDeleted.eq(false))
        .count(db)
        .await?;
    Ok(count)
}
