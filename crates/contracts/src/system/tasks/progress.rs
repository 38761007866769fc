use serde::{Deserialize, Serialize};

/// Фаза выполнения задания (фиксированный словарь для прогресса и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Connecting,
    Connected,
    Fetching,
    Processing,
    Completed,
}

impl SyncPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Connecting => "connecting",
            SyncPhase::Connected => "connected",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Processing => "processing",
            SyncPhase::Completed => "completed",
        }
    }
}

/// Уровень сообщения для логирующего коллбэка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Структурный контекст каждой строки лога: позволяет оператору сшивать
/// события через всю цепочку заданий-продолжений
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogContext {
    pub task_id: String,
    pub platform: String,
    pub phase: SyncPhase,
    pub elapsed_ms: i64,
}

/// Снимок прогресса, передаваемый в коллбэк после значимых переходов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub current: i32,
    pub total: Option<i32>,
    /// Процент завершения, если известен total
    pub percent: Option<f32>,
    /// Скорость обработки, заказов в секунду
    pub rate_per_sec: Option<f64>,
    /// Оценка оставшегося времени в секундах
    pub eta_seconds: Option<i64>,
    pub message: String,
    pub phase: SyncPhase,
}

/// Статус жизненного цикла задания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRunStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskRunStatus::Queued => "queued",
            TaskRunStatus::Running => "running",
            TaskRunStatus::Completed => "completed",
            TaskRunStatus::Failed => "failed",
            TaskRunStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "queued" => Some(TaskRunStatus::Queued),
            "running" => Some(TaskRunStatus::Running),
            "completed" => Some(TaskRunStatus::Completed),
            "failed" => Some(TaskRunStatus::Failed),
            "cancelled" => Some(TaskRunStatus::Cancelled),
            _ => None,
        }
    }
}
