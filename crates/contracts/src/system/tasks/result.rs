use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Итог обработки одного заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOutcomeKind {
    Created,
    Duplicate,
    Failed,
}

/// Запись о судьбе одного заказа в пачке
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderOutcome {
    /// Идентификатор заказа (external id или номер — что нашлось)
    pub identifier: String,
    pub outcome: OrderOutcomeKind,
    pub message: Option<String>,
}

/// Итог одного запуска задания синхронизации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Сколько сырых заказов вернула площадка
    pub total_fetched: i32,
    /// Создано новых записей
    pub created: i32,
    /// Пропущено как дубликаты (не ошибка)
    pub duplicates: i32,
    /// Ошибок уровня отдельного заказа
    pub failed: i32,

    /// Использованное окно дат
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,

    /// Самая ранняя дата заказа, увиденная за запуск
    pub oldest_order_date: Option<DateTime<Utc>>,

    /// Запланировано ли задание-продолжение
    pub continuation_scheduled: bool,
    pub continuation_task_id: Option<String>,

    /// Позаказные итоги для аудита
    pub outcomes: Vec<OrderOutcome>,
}

impl TaskResult {
    pub fn new(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            total_fetched: 0,
            created: 0,
            duplicates: 0,
            failed: 0,
            window_start,
            window_end,
            oldest_order_date: None,
            continuation_scheduled: false,
            continuation_task_id: None,
            outcomes: Vec::new(),
        }
    }

    /// Обработано всего (создано + дубликаты + ошибки)
    pub fn total_processed(&self) -> i32 {
        self.created + self.duplicates + self.failed
    }
}
