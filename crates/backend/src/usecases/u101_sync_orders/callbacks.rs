use async_trait::async_trait;
use contracts::system::tasks::progress::{LogContext, LogLevel, ProgressUpdate};

/// Набор коллбэков, через которые исполнитель общается с внешним миром.
///
/// Логирование и прогресс инжектируются (а не берутся из глобального
/// состояния), поэтому тесты снимают вывод детерминированно, а воркер
/// направляет его в лог-файл сессии.
#[async_trait]
pub trait SyncCallbacks: Send + Sync {
    /// Вызывается после значимых переходов состояния
    fn on_progress(&self, update: &ProgressUpdate);

    /// Каждая строка лога несет структурный контекст для сшивания событий
    /// через цепочку заданий
    fn on_log(&self, level: LogLevel, message: &str, context: &LogContext);

    /// Проверяется на каждой границе цикла; true — невосстановимый abort
    fn check_cancellation(&self) -> bool;

    /// Точка приостановки перед обработкой каждого заказа: внешняя
    /// пауза/возобновление без потери уже обработанного состояния
    async fn wait_for_resume(&self);
}

/// Коллбэки-заглушка для запусков без внешнего наблюдателя
pub struct NoopCallbacks;

#[async_trait]
impl SyncCallbacks for NoopCallbacks {
    fn on_progress(&self, _update: &ProgressUpdate) {}

    fn on_log(&self, _level: LogLevel, _message: &str, _context: &LogContext) {}

    fn check_cancellation(&self) -> bool {
        false
    }

    async fn wait_for_resume(&self) {}
}
