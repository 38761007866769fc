use thiserror::Error;

/// Ошибки, прерывающие задание целиком.
///
/// Ошибки уровня одного заказа сюда не попадают: они логируются на warn,
/// заказ пропускается, счетчик ошибок отражается в итогах запуска.
/// Дубликат заказа — вообще не ошибка и считается отдельно.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Подключение к площадке не найдено или удалено
    #[error("platform connection {0} not found")]
    MissingConnection(String),

    /// Для типа площадки не зарегистрирован адаптер — ошибка конфигурации,
    /// не повторяемая
    #[error("unsupported platform type: {0}")]
    UnknownPlatform(String),

    /// Площадка не приняла подключение
    #[error("platform connection failed: {0}")]
    ConnectionFailed(String),

    /// Площадка не вернула пачку заказов
    #[error("order fetch failed: {0}")]
    FetchFailed(String),

    /// Задание отменено внешним сигналом; транзакция откачена,
    /// продолжение не ставится
    #[error("task cancelled")]
    Cancelled,

    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// Отмена — не сбой: воркер помечает задание как cancelled, а не failed
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SyncError::Cancelled)
    }
}
