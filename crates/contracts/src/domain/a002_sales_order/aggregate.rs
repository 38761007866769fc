use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::enums::PlatformType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesOrderId(pub Uuid);

impl SalesOrderId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for SalesOrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SalesOrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Канонический статус заказа.
/// Строки статусов площадок переводятся в этот enum таблицами соответствия;
/// неизвестные строки дают `Unknown`, а не ошибку.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
            OrderStatus::Unknown => "unknown",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "new" => Some(OrderStatus::New),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            "returned" => Some(OrderStatus::Returned),
            "unknown" => Some(OrderStatus::Unknown),
            _ => None,
        }
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// Данные покупателя (поля заполняются по цепочкам фолбэков из сырого заказа)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Адрес (доставки или выставления счета)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderAddress {
    pub full_name: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Строка заказа
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Происхождение записи: ссылка на verbatim payload и контекст загрузки
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderSourceMeta {
    /// Ссылка на запись в document_raw_storage с исходным JSON
    pub raw_ref: String,
    /// Момент получения от площадки
    pub fetched_at: Option<DateTime<Utc>>,
    /// Подключение, через которое получен заказ
    pub connection_id: String,
    /// Задание, создавшее запись
    pub task_id: Option<String>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Канонический заказ, загруженный с торговой площадки.
///
/// Натуральный ключ дедупликации: (`external_order_id` ИЛИ `order_number`)
/// × `platform_type` × `user_id`. Запись создается один раз и исполнителем
/// синхронизации никогда не обновляется.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<SalesOrderId>,

    /// Идентификатор заказа на стороне площадки
    pub external_order_id: Option<String>,

    /// Номер заказа (человекочитаемый)
    pub order_number: Option<String>,

    /// Площадка-источник
    pub platform_type: PlatformType,

    /// Владелец данных
    pub user_id: String,

    /// Канонический статус
    pub order_status: OrderStatus,

    /// Дата заказа
    pub order_date: DateTime<Utc>,

    /// Итоговая сумма
    pub total_amount: f64,

    /// Валюта (ISO 4217)
    pub currency: String,

    pub customer: OrderCustomer,

    pub shipping_address: Option<OrderAddress>,

    pub billing_address: Option<OrderAddress>,

    pub items: Vec<OrderItem>,

    pub source_meta: OrderSourceMeta,
}

impl SalesOrder {
    /// Создать новый заказ для вставки в БД
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        external_order_id: Option<String>,
        order_number: Option<String>,
        platform_type: PlatformType,
        user_id: String,
        order_status: OrderStatus,
        order_date: DateTime<Utc>,
        total_amount: f64,
        currency: String,
        customer: OrderCustomer,
        shipping_address: Option<OrderAddress>,
        billing_address: Option<OrderAddress>,
        items: Vec<OrderItem>,
        source_meta: OrderSourceMeta,
    ) -> Self {
        Self {
            base: BaseAggregate::new(SalesOrderId::new_v4(), code, description),
            external_order_id,
            order_number,
            platform_type,
            user_id,
            order_status,
            order_date,
            total_amount,
            currency,
            customer,
            shipping_address,
            billing_address,
            items,
            source_meta,
        }
    }

    /// Хотя бы один из двух идентификаторов должен быть заполнен
    pub fn validate(&self) -> Result<(), String> {
        if self.external_order_id.is_none() && self.order_number.is_none() {
            return Err("Заказ без external_order_id и order_number не идентифицируем".into());
        }
        Ok(())
    }
}

impl AggregateRoot for SalesOrder {
    type Id = SalesOrderId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "sales_order"
    }

    fn element_name() -> &'static str {
        "Заказ площадки"
    }

    fn list_name() -> &'static str {
        "Заказы площадок"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}
