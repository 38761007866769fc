use chrono::{DateTime, Duration, Utc};
use contracts::domain::common::AggregateId;
use contracts::system::tasks::aggregate::{SyncTask, SyncTaskId, SOURCE_AUTOMATIC_CONTINUATION};
use contracts::system::tasks::config::{NormalizedConfig, SyncWindow};
use contracts::system::tasks::continuation::compute_backward_window;
use contracts::system::tasks::result::TaskResult;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::a002_sales_order::repository as order_repository;
use crate::system::tasks::repository as task_repository;

use super::error::SyncError;

/// Определить окно загрузки для auto-режима.
///
/// Первое звено цепочки использует сконфигурированное (или дефолтное)
/// окно как есть. Последующие звенья берут самую раннюю дату заказа из
/// токена продолжения, а при его отсутствии — из хранилища; если заказов
/// еще нет вообще, откат к дефолтному окну.
pub async fn resolve_auto_window<C: ConnectionTrait>(
    db: &C,
    task: &SyncTask,
    normalized: &NormalizedConfig,
    now: DateTime<Utc>,
) -> Result<SyncWindow, SyncError> {
    if !task.is_continuation() {
        return Ok(normalized.window);
    }

    let oldest = match task.continuation_token() {
        Some(token) => Some(token.oldest_order_date),
        None => {
            order_repository::earliest_order_date(db, &task.user_id, &task.connection_id).await?
        }
    };

    Ok(match oldest {
        Some(date) => compute_backward_window(date, normalized.period_days),
        None => SyncWindow::default_ending_at(now),
    })
}

/// Политика завершения цепочки: продолжаем, пока окна приносят новые
/// заказы; пустое окно завершает цепочку, когда его начало старше пола
/// (`chain_floor_days`) или задание попросило остановку на первом пустом
/// окне.
pub fn should_continue(
    result: &TaskResult,
    normalized: &NormalizedConfig,
    window: &SyncWindow,
    now: DateTime<Utc>,
    chain_floor_days: i64,
) -> bool {
    if result.created > 0 {
        return true;
    }
    if normalized.stop_on_empty_window {
        return false;
    }
    window.start >= now - Duration::days(chain_floor_days)
}

/// Поставить задание-продолжение: fire-and-forget постановка в очередь с
/// фиксированной задержкой, чтобы не долбить API площадки. Новое задание
/// наследует конфигурацию, ссылается на родителя и несет сдвинутый токен.
pub async fn schedule_continuation<C: ConnectionTrait>(
    db: &C,
    task: &SyncTask,
    result: &TaskResult,
    window: &SyncWindow,
    now: DateTime<Utc>,
    delay_seconds: i64,
) -> anyhow::Result<SyncTaskId> {
    let next_oldest = result.oldest_order_date.unwrap_or(window.start);
    let iteration = task.iteration_count + 1;

    let mut child = SyncTask::new_for_insert(
        format!("SYNC-{}", &Uuid::new_v4().to_string()[..8]),
        format!("{} (continuation #{})", task.base.description, iteration),
        task.task_type.clone(),
        task.user_id.clone(),
        task.connection_id.clone(),
        task.priority,
        task.config_json.clone(),
        Some(now + Duration::seconds(delay_seconds)),
    );
    child.source = SOURCE_AUTOMATIC_CONTINUATION.to_string();
    child.parent_task_id = Some(task.base.id.as_string());
    child.iteration_count = iteration;
    child.oldest_order_date = Some(next_oldest);

    task_repository::save(db, &child).await?;
    Ok(child.base.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::tasks::config::SyncConfig;

    fn normalized(stop_on_empty: bool) -> NormalizedConfig {
        let config = SyncConfig {
            stop_at_first: stop_on_empty,
            ..Default::default()
        };
        config.normalize(Utc::now())
    }

    #[test]
    fn test_continues_while_windows_produce_orders() {
        let now = Utc::now();
        let window = SyncWindow {
            start: now - Duration::days(3000),
            end: now - Duration::days(2970),
        };
        let mut result = TaskResult::new(window.start, window.end);
        result.created = 5;
        // Новые заказы продлевают цепочку даже глубже пола
        assert!(should_continue(&result, &normalized(false), &window, now, 730));
    }

    #[test]
    fn test_empty_window_below_floor_stops_chain() {
        let now = Utc::now();
        let window = SyncWindow {
            start: now - Duration::days(800),
            end: now - Duration::days(770),
        };
        let result = TaskResult::new(window.start, window.end);
        assert!(!should_continue(&result, &normalized(false), &window, now, 730));
    }

    #[test]
    fn test_empty_window_above_floor_continues() {
        let now = Utc::now();
        let window = SyncWindow {
            start: now - Duration::days(60),
            end: now - Duration::days(30),
        };
        let result = TaskResult::new(window.start, window.end);
        assert!(should_continue(&result, &normalized(false), &window, now, 730));
    }

    #[test]
    fn test_stop_at_first_empty_window() {
        let now = Utc::now();
        let window = SyncWindow {
            start: now - Duration::days(60),
            end: now - Duration::days(30),
        };
        let result = TaskResult::new(window.start, window.end);
        assert!(!should_continue(&result, &normalized(true), &window, now, 730));
    }
}
