use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::enums::PlatformType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор подключения к площадке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformConnectionId(pub Uuid);

impl PlatformConnectionId {
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

impl AggregateId for PlatformConnectionId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PlatformConnectionId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Типы авторизации
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AuthorizationType {
    #[serde(rename = "API Key")]
    ApiKey,
    #[serde(rename = "Basic Auth")]
    BasicAuth,
}

impl Default for AuthorizationType {
    fn default() -> Self {
        Self::ApiKey
    }
}

impl AuthorizationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ApiKey => "API Key",
            Self::BasicAuth => "Basic Auth",
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Подключение к торговой площадке: учетные данные + идентичность площадки.
/// Принадлежит пользователю; для исполнителя синхронизации read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConnection {
    #[serde(flatten)]
    pub base: BaseAggregate<PlatformConnectionId>,

    /// Тип площадки
    pub platform_type: PlatformType,

    /// Владелец подключения
    pub user_id: String,

    /// API-ключ
    pub api_key: String,

    /// Секрет API (Hepsiburada, N11)
    pub api_secret: Option<String>,

    /// ID поставщика (Trendyol supplier id)
    pub supplier_id: Option<String>,

    /// ID мерчанта (Hepsiburada merchant id)
    pub merchant_id: Option<String>,

    /// Подключение используется
    pub is_used: bool,

    /// Тестовый режим (sandbox endpoints)
    pub test_mode: bool,

    /// Тип авторизации
    pub authorization_type: AuthorizationType,
}

impl PlatformConnection {
    /// Создать новое подключение для вставки в БД
    pub fn new_for_insert(
        code: String,
        description: String,
        platform_type: PlatformType,
        user_id: String,
        api_key: String,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(PlatformConnectionId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            platform_type,
            user_id,
            api_key,
            api_secret: None,
            supplier_id: None,
            merchant_id: None,
            is_used: false,
            test_mode: false,
            authorization_type: AuthorizationType::default(),
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Наименование не может быть пустым".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Код не может быть пустым".into());
        }
        if self.api_key.trim().is_empty() {
            return Err("API Key не может быть пустым".into());
        }
        if self.user_id.trim().is_empty() {
            return Err("Владелец подключения должен быть указан".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for PlatformConnection {
    type Id = PlatformConnectionId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "platform_connection"
    }

    fn element_name() -> &'static str {
        "Подключение к площадке"
    }

    fn list_name() -> &'static str {
        "Подключения к площадкам"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}
