use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::common::AggregateId;
use contracts::system::tasks::aggregate::{SyncTask, TASK_TYPE_ORDER_FETCHING};
use contracts::system::tasks::result::TaskResult;
use std::sync::Arc;

use crate::system::tasks::manager::TaskManager;
use crate::usecases::u101_sync_orders::{SyncCallbacks, SyncOrdersExecutor};

/// Менеджер для задания загрузки заказов (u101)
pub struct U101SyncOrdersManager {
    executor: Arc<SyncOrdersExecutor>,
}

impl U101SyncOrdersManager {
    pub fn new(executor: Arc<SyncOrdersExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl TaskManager for U101SyncOrdersManager {
    fn task_type(&self) -> &'static str {
        TASK_TYPE_ORDER_FETCHING
    }

    async fn run(
        &self,
        task: &SyncTask,
        session_id: &str,
        callbacks: Arc<dyn SyncCallbacks>,
    ) -> Result<TaskResult> {
        tracing::info!(
            "Starting order fetching task {} session {}",
            task.base.id.as_string(),
            session_id
        );

        let result = self
            .executor
            .execute(task, callbacks.as_ref())
            .await
            .map_err(anyhow::Error::new)?;

        tracing::info!(
            "Order fetching task {} session {} finished: {} created, {} duplicates, {} failed",
            task.base.id.as_string(),
            session_id,
            result.created,
            result.duplicates,
            result.failed
        );
        Ok(result)
    }
}
