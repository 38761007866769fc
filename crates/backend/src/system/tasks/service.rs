use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::common::AggregateId;
use contracts::system::tasks::aggregate::{
    SyncTask, SyncTaskId, SOURCE_SCHEDULED, TASK_TYPE_ORDER_FETCHING,
};
use contracts::system::tasks::config::{SyncConfig, SyncMode};
use contracts::system::tasks::progress::TaskRunStatus;

use crate::shared::data::db::get_connection;

use super::repository;

pub async fn list_all() -> Result<Vec<SyncTask>> {
    repository::list_all(get_connection())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

pub async fn list_due(now: DateTime<Utc>) -> Result<Vec<SyncTask>> {
    repository::list_due(get_connection(), now)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

pub async fn get_by_id(id: &SyncTaskId) -> Result<Option<SyncTask>> {
    repository::get_by_id(get_connection(), id.0)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

pub async fn create(task: &SyncTask) -> Result<SyncTaskId> {
    repository::save(get_connection(), task)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    Ok(task.base.id)
}

/// Гарантирует посевное задание auto-синхронизации для каждого
/// используемого подключения. Посевное задание повторяется по cron и
/// каждым запуском открывает (или продолжает) цепочку обратного обхода.
pub async fn ensure_seed_tasks() -> Result<usize> {
    let connections = crate::domain::a001_platform_connection::service::list_used().await?;
    let existing = list_all().await?;
    let mut created = 0;

    for connection in connections {
        let connection_id = connection.base.id.as_string();
        let already_seeded = existing
            .iter()
            .any(|t| t.connection_id == connection_id && t.schedule_cron.is_some());
        if already_seeded {
            continue;
        }

        let config = SyncConfig {
            mode: SyncMode::Auto,
            ..Default::default()
        };
        let mut task = SyncTask::new_for_insert(
            format!("SYNC-{}", &connection_id[..8]),
            format!("Auto sync: {}", connection.base.description),
            TASK_TYPE_ORDER_FETCHING.to_string(),
            connection.user_id.clone(),
            connection_id,
            0,
            serde_json::to_string(&config)?,
            None,
        );
        task.source = SOURCE_SCHEDULED.to_string();
        // Каждый день в 03:00 UTC
        task.schedule_cron = Some("0 0 3 * * *".to_string());

        create(&task).await?;
        created += 1;
    }

    if created > 0 {
        tracing::info!("Seeded {} scheduled sync tasks", created);
    }
    Ok(created)
}

pub async fn mark_running(id: &SyncTaskId, log_file: &str) -> Result<()> {
    let mut task = get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Sync task not found"))?;

    task.status = TaskRunStatus::Running;
    task.started_at = Some(Utc::now());
    task.log_file = Some(log_file.to_string());
    task.base.metadata.updated_at = Utc::now();

    repository::save(get_connection(), &task)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

pub async fn mark_finished(
    id: &SyncTaskId,
    status: TaskRunStatus,
    result_json: Option<String>,
) -> Result<()> {
    let mut task = get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Sync task not found"))?;

    task.status = status;
    task.finished_at = Some(Utc::now());
    if result_json.is_some() {
        task.result_json = result_json;
    }
    task.base.metadata.updated_at = Utc::now();

    repository::save(get_connection(), &task)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

/// Вернуть повторяющееся посевное задание в очередь на следующий запуск
pub async fn requeue(id: &SyncTaskId, next_run_at: DateTime<Utc>) -> Result<()> {
    let mut task = get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Sync task not found"))?;

    task.status = TaskRunStatus::Queued;
    task.scheduled_at = Some(next_run_at);
    task.base.metadata.updated_at = Utc::now();

    repository::save(get_connection(), &task)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

