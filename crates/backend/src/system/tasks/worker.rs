use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::common::AggregateId;
use contracts::system::tasks::aggregate::SyncTask;
use contracts::system::tasks::progress::{LogContext, LogLevel, ProgressUpdate, TaskRunStatus};
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use crate::shared::data::raw_storage;
use crate::usecases::u101_sync_orders::{SyncCallbacks, SyncError};

use super::{
    control::{TaskControlCenter, TaskControlHandle},
    logger::TaskLogger,
    registry::TaskManagerRegistry,
    service,
};

/// Сырые payload'ы старше этого возраста вычищаются после рабочих тиков
const RAW_RETENTION_DAYS: i64 = 90;

/// Фоновый воркер очереди заданий синхронизации.
///
/// Готовые задания выполняются последовательно, по одному: это дает
/// сериализацию заданий одного подключения, которую предполагает
/// алгоритм обратного обхода.
pub struct SyncTaskWorker {
    registry: Arc<TaskManagerRegistry>,
    logger: Arc<TaskLogger>,
    control: Arc<TaskControlCenter>,
    interval_seconds: u64,
}

impl SyncTaskWorker {
    pub fn new(
        registry: Arc<TaskManagerRegistry>,
        logger: Arc<TaskLogger>,
        control: Arc<TaskControlCenter>,
        interval_seconds: u64,
    ) -> Self {
        Self {
            registry,
            logger,
            control,
            interval_seconds,
        }
    }

    /// Запускает цикл выполнения заданий.
    pub async fn run_loop(&self) {
        info!(
            "Sync task worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.process_due_tasks().await {
                error!("Error processing sync tasks: {:?}", e);
            }
        }
    }

    /// Обрабатывает задания, время выполнения которых наступило.
    async fn process_due_tasks(&self) -> Result<()> {
        let now = Utc::now();
        let tasks = service::list_due(now).await?;
        let had_work = !tasks.is_empty();

        for task in tasks {
            if let Err(e) = self.run_one(task).await {
                error!("Task run failed: {:?}", e);
            }
        }

        if had_work {
            if let Err(e) = raw_storage::cleanup_old(get_connection(), RAW_RETENTION_DAYS).await {
                warn!("Raw payload cleanup failed: {:?}", e);
            }
        }
        Ok(())
    }

    async fn run_one(&self, task: SyncTask) -> Result<()> {
        let task_id = task.base.id;
        let session_id = Uuid::new_v4().to_string();
        let log_file = self.logger.get_log_file_path(&session_id);

        info!(
            "Task '{}' ({}) is due. Running session {}...",
            task.base.description,
            task_id.as_string(),
            session_id
        );
        service::mark_running(&task_id, &log_file).await?;

        let handle = self.control.register(&task_id.as_string());
        let callbacks: Arc<dyn SyncCallbacks> = Arc::new(WorkerCallbacks {
            logger: Arc::clone(&self.logger),
            session_id: session_id.clone(),
            control: handle,
        });

        let outcome = match self.registry.get(&task.task_type) {
            Some(manager) => manager.run(&task, &session_id, callbacks).await,
            None => Err(anyhow::anyhow!(
                "No manager registered for task type '{}'",
                task.task_type
            )),
        };

        self.control.remove(&task_id.as_string());

        match outcome {
            Ok(result) => {
                info!(
                    "Task '{}' ({}) session {} completed successfully",
                    task.base.description,
                    task_id.as_string(),
                    session_id
                );
                service::mark_finished(
                    &task_id,
                    TaskRunStatus::Completed,
                    serde_json::to_string(&result).ok(),
                )
                .await?;
            }
            Err(e) => {
                let cancelled = e
                    .downcast_ref::<SyncError>()
                    .map(SyncError::is_cancellation)
                    .unwrap_or(false);
                let status = if cancelled {
                    info!(
                        "Task '{}' ({}) session {} cancelled",
                        task.base.description,
                        task_id.as_string(),
                        session_id
                    );
                    TaskRunStatus::Cancelled
                } else {
                    error!(
                        "Task '{}' ({}) session {} failed: {:?}",
                        task.base.description,
                        task_id.as_string(),
                        session_id,
                        e
                    );
                    TaskRunStatus::Failed
                };
                service::mark_finished(&task_id, status, None).await?;
            }
        }

        // Повторяющееся посевное задание возвращается в очередь по cron
        if let Some(expr) = task.schedule_cron.as_deref() {
            match cron::Schedule::from_str(expr) {
                Ok(schedule) => {
                    if let Some(next_run) = schedule.upcoming(Utc).next() {
                        service::requeue(&task_id, next_run).await?;
                        info!(
                            "Task '{}' requeued for {}",
                            task.base.description, next_run
                        );
                    }
                }
                Err(e) => warn!(
                    "Task '{}' has invalid cron expression '{}': {}",
                    task.base.description, expr, e
                ),
            }
        }

        Ok(())
    }
}

/// Коллбэки, которые воркер передает исполнителю: лог-файл сессии,
/// tracing и ручка отмены/паузы.
struct WorkerCallbacks {
    logger: Arc<TaskLogger>,
    session_id: String,
    control: TaskControlHandle,
}

#[async_trait]
impl SyncCallbacks for WorkerCallbacks {
    fn on_progress(&self, update: &ProgressUpdate) {
        let line = match (update.percent, update.eta_seconds) {
            (Some(percent), Some(eta)) => format!(
                "[{}] {} ({:.1}%, ETA {}s)",
                update.phase.as_str(),
                update.message,
                percent,
                eta
            ),
            (Some(percent), None) => {
                format!("[{}] {} ({:.1}%)", update.phase.as_str(), update.message, percent)
            }
            _ => format!("[{}] {}", update.phase.as_str(), update.message),
        };
        let _ = self.logger.write_log(&self.session_id, &line);
        tracing::debug!("session {}: {}", self.session_id, line);
    }

    fn on_log(&self, level: LogLevel, message: &str, context: &LogContext) {
        let line = format!(
            "[{}] {} (task={}, platform={}, elapsed={}ms)",
            context.phase.as_str(),
            message,
            context.task_id,
            context.platform,
            context.elapsed_ms
        );
        let _ = self.logger.write_log(&self.session_id, &line);
        match level {
            LogLevel::Debug => tracing::debug!("{}", line),
            LogLevel::Info => tracing::info!("{}", line),
            LogLevel::Warn => tracing::warn!("{}", line),
            LogLevel::Error => tracing::error!("{}", line),
        }
    }

    fn check_cancellation(&self) -> bool {
        self.control.is_cancelled()
    }

    async fn wait_for_resume(&self) {
        self.control.wait_if_paused().await;
    }
}
