pub mod hepsiburada;
pub mod n11;
pub mod trendyol;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::enums::PlatformType;
use std::collections::HashMap;
use std::sync::Arc;

/// Запрос одной пачки заказов за окно дат `[start_date, end_date)`
#[derive(Debug, Clone, Copy)]
pub struct OrderFetchQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub size: u32,
}

/// Пачка сырых заказов площадки. Каждый элемент — verbatim JSON так, как
/// его вернул API; разбор делает трансформер.
#[derive(Debug, Clone, Default)]
pub struct FetchedBatch {
    pub orders: Vec<serde_json::Value>,
    pub message: Option<String>,
}

/// Единый контракт адаптера площадки. Одна реализация на каждую площадку;
/// добавление площадки не трогает исполнитель.
#[async_trait]
pub trait PlatformService: Send + Sync {
    fn platform_type(&self) -> PlatformType;

    /// Проверить подключение до загрузки (fail-fast).
    /// Ошибка здесь фатальна для задания.
    async fn connect(&self) -> Result<()>;

    /// Получить одну пачку сырых заказов за окно
    async fn fetch_orders(&self, query: &OrderFetchQuery) -> Result<FetchedBatch>;

    /// Освободить ресурсы подключения. Вызывается ровно один раз
    /// независимо от исхода задания.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Фабрика сервисов площадки: строит сервис из учетных данных подключения
pub trait PlatformServiceFactory: Send + Sync {
    fn create(&self, connection: &PlatformConnection) -> Result<Box<dyn PlatformService>>;
}

/// Реестр фабрик площадок. Заполняется при старте; неизвестный тип
/// площадки — фатальная ошибка конфигурации, не повторяемая.
pub struct PlatformRegistry {
    factories: HashMap<PlatformType, Arc<dyn PlatformServiceFactory>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Зарегистрировать фабрику площадки
    pub fn register(&mut self, platform: PlatformType, factory: Arc<dyn PlatformServiceFactory>) {
        self.factories.insert(platform, factory);
    }

    /// Получить фабрику по типу площадки
    pub fn get(&self, platform: PlatformType) -> Option<Arc<dyn PlatformServiceFactory>> {
        self.factories.get(&platform).cloned()
    }

    /// Реестр с адаптерами всех поддерживаемых площадок
    pub fn with_all_platforms() -> Self {
        let mut registry = Self::new();
        registry.register(
            PlatformType::Trendyol,
            Arc::new(trendyol::TrendyolServiceFactory),
        );
        registry.register(
            PlatformType::Hepsiburada,
            Arc::new(hepsiburada::HepsiburadaServiceFactory),
        );
        registry.register(PlatformType::N11, Arc::new(n11::N11ServiceFactory));
        registry
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
