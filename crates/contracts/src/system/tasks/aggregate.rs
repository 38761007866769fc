use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::SyncConfig;
use super::continuation::ContinuationToken;
use super::progress::TaskRunStatus;

/// Тип задания загрузки заказов
pub const TASK_TYPE_ORDER_FETCHING: &str = "order_fetching";

/// Происхождение задания: создано вручную
pub const SOURCE_MANUAL: &str = "manual";
/// Происхождение задания: посеяно расписанием
pub const SOURCE_SCHEDULED: &str = "scheduled";
/// Происхождение задания: звено цепочки auto-синхронизации
pub const SOURCE_AUTOMATIC_CONTINUATION: &str = "automatic_continuation";

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор задания синхронизации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncTaskId(pub Uuid);

impl SyncTaskId {
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

impl AggregateId for SyncTaskId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SyncTaskId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Задание синхронизации заказов: одна дискретная единица работы.
///
/// Создается очередью (вручную, по расписанию или как продолжение),
/// передается исполнителю ровно один раз и во время запуска неизменно —
/// кроме внешних сигналов отмены/паузы.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTask {
    #[serde(flatten)]
    pub base: BaseAggregate<SyncTaskId>,

    /// Тип задания (ключ реестра менеджеров)
    pub task_type: String,

    /// Владелец задания
    pub user_id: String,

    /// Подключение к площадке, по которому идет загрузка
    pub connection_id: String,

    /// Приоритет выборки из очереди (больше = раньше)
    pub priority: i32,

    /// Статус жизненного цикла
    pub status: TaskRunStatus,

    /// Cron-расписание для повторяющихся посевных заданий
    pub schedule_cron: Option<String>,

    /// Параметры синхронизации в формате JSON (SyncConfig)
    pub config_json: String,

    // --- происхождение (provenance) ---
    /// Откуда взялось задание: manual | scheduled | automatic_continuation
    pub source: String,
    /// Родительское задание в цепочке продолжений
    pub parent_task_id: Option<String>,
    /// Номер звена цепочки (первое задание = 0)
    pub iteration_count: i32,
    /// Самая ранняя дата заказа, достигнутая цепочкой
    pub oldest_order_date: Option<DateTime<Utc>>,

    // --- выполнение ---
    /// Не выполнять раньше этого момента
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Момент старта выполнения (для elapsed в логах)
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Путь к лог-файлу сессии выполнения
    pub log_file: Option<String>,
    /// Итог запуска в формате JSON (TaskResult)
    pub result_json: Option<String>,
}

impl SyncTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        task_type: String,
        user_id: String,
        connection_id: String,
        priority: i32,
        config_json: String,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        let id = SyncTaskId::new_v4();

        Self {
            base: BaseAggregate::new(id, code, description),
            task_type,
            user_id,
            connection_id,
            priority,
            status: TaskRunStatus::Queued,
            schedule_cron: None,
            config_json,
            source: SOURCE_MANUAL.to_string(),
            parent_task_id: None,
            iteration_count: 0,
            oldest_order_date: None,
            scheduled_at,
            started_at: None,
            finished_at: None,
            log_file: None,
            result_json: None,
        }
    }

    /// Разобрать параметры синхронизации
    pub fn config(&self) -> anyhow::Result<SyncConfig> {
        if self.config_json.trim().is_empty() {
            return Ok(SyncConfig::default());
        }
        Ok(serde_json::from_str(&self.config_json)?)
    }

    /// Задание является звеном цепочки продолжений
    pub fn is_continuation(&self) -> bool {
        self.source == SOURCE_AUTOMATIC_CONTINUATION
    }

    /// Токен продолжения, перенесенный из родительского задания
    pub fn continuation_token(&self) -> Option<ContinuationToken> {
        self.oldest_order_date
            .map(|oldest| ContinuationToken::new(oldest, self.iteration_count))
    }
}

impl AggregateRoot for SyncTask {
    type Id = SyncTaskId;

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
        "sys_sync_task"
    }

    fn collection_name() -> &'static str {
        "sys_sync_tasks"
    }

    fn element_name() -> &'static str {
        "Задание синхронизации"
    }

    fn list_name() -> &'static str {
        "Задания синхронизации"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}
