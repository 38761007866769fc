use anyhow::Result;
use async_trait::async_trait;
use contracts::system::tasks::aggregate::SyncTask;
use contracts::system::tasks::result::TaskResult;
use std::sync::Arc;

use crate::usecases::u101_sync_orders::SyncCallbacks;

/// Трейт для менеджеров заданий.
/// Каждый конкретный тип задания должен иметь свою реализацию этого трейта.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// Возвращает тип задания, который обрабатывает этот менеджер.
    fn task_type(&self) -> &'static str;

    /// Запускает выполнение задания.
    /// `task`: агрегат SyncTask с конфигурацией задания.
    /// `session_id`: уникальный идентификатор текущей сессии выполнения.
    /// `callbacks`: коллбэки прогресса/логов/отмены, собранные воркером.
    async fn run(
        &self,
        task: &SyncTask,
        session_id: &str,
        callbacks: Arc<dyn SyncCallbacks>,
    ) -> Result<TaskResult>;
}
