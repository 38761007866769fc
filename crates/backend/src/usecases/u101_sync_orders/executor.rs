use chrono::Utc;
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::domain::common::AggregateId;
use contracts::system::tasks::aggregate::SyncTask;
use contracts::system::tasks::config::{NormalizedConfig, SyncMode, SyncWindow};
use contracts::system::tasks::progress::{LogContext, LogLevel, ProgressUpdate, SyncPhase};
use contracts::system::tasks::result::{OrderOutcome, OrderOutcomeKind, TaskResult};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::a001_platform_connection::repository as connection_repository;
use crate::domain::a002_sales_order::repository as order_repository;
use crate::shared::config::SyncSettings;
use crate::shared::data::raw_storage;
use crate::shared::platforms::{OrderFetchQuery, PlatformRegistry, PlatformService};

use super::callbacks::SyncCallbacks;
use super::continuation;
use super::dedup;
use super::error::SyncError;
use super::progress::ProgressReporter;
use super::transformer;

/// Исполнитель задания синхронизации заказов: один вызов `execute` —
/// один запуск одного задания.
///
/// Заказы обрабатываются строго по одному (без параллелизма внутри
/// задания): порядок "проверка дубликата → вставка" должен сохраняться
/// внутри одной транзакции, а площадки не любят бурст запросов.
pub struct SyncOrdersExecutor {
    db: DatabaseConnection,
    platforms: Arc<PlatformRegistry>,
    settings: SyncSettings,
}

/// Контекст запуска для структурных логов
struct RunContext {
    task_id: String,
    platform: String,
    started: Instant,
}

impl RunContext {
    fn log(&self, callbacks: &dyn SyncCallbacks, level: LogLevel, message: &str, phase: SyncPhase) {
        callbacks.on_log(
            level,
            message,
            &LogContext {
                task_id: self.task_id.clone(),
                platform: self.platform.clone(),
                phase,
                elapsed_ms: self.started.elapsed().as_millis() as i64,
            },
        );
    }
}

/// Снимок прогресса для фазовых переходов (вне цикла обработки)
fn phase_update(phase: SyncPhase, message: &str) -> ProgressUpdate {
    ProgressUpdate {
        current: 0,
        total: None,
        percent: None,
        rate_per_sec: None,
        eta_seconds: None,
        message: message.to_string(),
        phase,
    }
}

impl SyncOrdersExecutor {
    pub fn new(db: DatabaseConnection, platforms: Arc<PlatformRegistry>, settings: SyncSettings) -> Self {
        Self {
            db,
            platforms,
            settings,
        }
    }

    /// Выполнить задание. Фатальные ошибки прерывают запуск и откатывают
    /// транзакцию; ошибки отдельных заказов только считаются.
    pub async fn execute(
        &self,
        task: &SyncTask,
        callbacks: &dyn SyncCallbacks,
    ) -> Result<TaskResult, SyncError> {
        let now = Utc::now();

        // 1. Подключение должно существовать — иначе fail-fast
        let connection_uuid = Uuid::parse_str(&task.connection_id)
            .map_err(|_| SyncError::MissingConnection(task.connection_id.clone()))?;
        let connection = connection_repository::get_by_id(&self.db, connection_uuid)
            .await?
            .ok_or_else(|| SyncError::MissingConnection(task.connection_id.clone()))?;

        let ctx = RunContext {
            task_id: task.base.id.as_string(),
            platform: connection.platform_type.code().to_string(),
            started: Instant::now(),
        };

        // 2. Нормализация конфигурации (включая устаревшую форму)
        let config = task.config()?;
        let normalized = config.normalize(now);

        // 3. Окно: auto-режим сам вычисляет его обратным обходом
        let window = if normalized.mode == SyncMode::Auto {
            continuation::resolve_auto_window(&self.db, task, &normalized, now).await?
        } else {
            normalized.window
        };

        ctx.log(
            callbacks,
            LogLevel::Info,
            &format!(
                "Sync window: {} .. {} (mode {:?}, iteration {})",
                window.start.format("%Y-%m-%d %H:%M:%S"),
                window.end.format("%Y-%m-%d %H:%M:%S"),
                normalized.mode,
                task.iteration_count
            ),
            SyncPhase::Connecting,
        );

        // 4. Адаптер площадки: незарегистрированный тип — фатальная ошибка
        //    конфигурации, без повторов
        let factory = self.platforms.get(connection.platform_type).ok_or_else(|| {
            SyncError::UnknownPlatform(connection.platform_type.code().to_string())
        })?;
        let service = factory
            .create(&connection)
            .map_err(|e| SyncError::ConnectionFailed(e.to_string()))?;

        // Граница цикла: до загрузки
        if callbacks.check_cancellation() {
            let _ = service.close().await;
            return Err(SyncError::Cancelled);
        }

        let run_outcome = self
            .run_connected(task, &connection, service.as_ref(), &window, &normalized, callbacks, &ctx)
            .await;

        // 9. Гарантированная очистка: close ровно один раз на любом исходе
        if let Err(e) = service.close().await {
            ctx.log(
                callbacks,
                LogLevel::Warn,
                &format!("Failed to close platform service: {}", e),
                SyncPhase::Completed,
            );
        }

        let mut result = run_outcome?;

        // 10. Продолжение цепочки (только auto-режим)
        if normalized.mode == SyncMode::Auto {
            // Граница цикла: перед планированием продолжения
            if callbacks.check_cancellation() {
                ctx.log(
                    callbacks,
                    LogLevel::Info,
                    "Cancellation requested, continuation suppressed",
                    SyncPhase::Completed,
                );
            } else if continuation::should_continue(
                &result,
                &normalized,
                &window,
                now,
                self.settings.chain_floor_days,
            ) {
                match continuation::schedule_continuation(
                    &self.db,
                    task,
                    &result,
                    &window,
                    now,
                    self.settings.continuation_delay_seconds,
                )
                .await
                {
                    Ok(child_id) => {
                        result.continuation_scheduled = true;
                        result.continuation_task_id = Some(child_id.as_string());
                        ctx.log(
                            callbacks,
                            LogLevel::Info,
                            &format!(
                                "Continuation task {} scheduled in {}s",
                                child_id.as_string(),
                                self.settings.continuation_delay_seconds
                            ),
                            SyncPhase::Completed,
                        );
                    }
                    Err(e) => {
                        // Постановка продолжения — fire-and-forget: сбой
                        // не роняет уже зафиксированный запуск
                        ctx.log(
                            callbacks,
                            LogLevel::Error,
                            &format!("Failed to schedule continuation: {}", e),
                            SyncPhase::Completed,
                        );
                    }
                }
            } else {
                ctx.log(
                    callbacks,
                    LogLevel::Info,
                    "Backward walk finished, chain stops here",
                    SyncPhase::Completed,
                );
            }
        }

        let summary = format!(
            "Completed: {} fetched, {} created, {} duplicates, {} failed",
            result.total_fetched, result.created, result.duplicates, result.failed
        );
        callbacks.on_progress(&phase_update(SyncPhase::Completed, &summary));
        ctx.log(callbacks, LogLevel::Info, &summary, SyncPhase::Completed);

        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_connected(
        &self,
        task: &SyncTask,
        connection: &PlatformConnection,
        service: &dyn PlatformService,
        window: &SyncWindow,
        normalized: &NormalizedConfig,
        callbacks: &dyn SyncCallbacks,
        ctx: &RunContext,
    ) -> Result<TaskResult, SyncError> {
        callbacks.on_progress(&phase_update(SyncPhase::Connecting, "Connecting to platform"));
        service
            .connect()
            .await
            .map_err(|e| SyncError::ConnectionFailed(e.to_string()))?;
        ctx.log(
            callbacks,
            LogLevel::Info,
            "Platform connection established",
            SyncPhase::Connected,
        );
        callbacks.on_progress(&phase_update(SyncPhase::Connected, "Connected"));

        // 5. Одна пачка за запуск; сбой загрузки фатален
        callbacks.on_progress(&phase_update(SyncPhase::Fetching, "Fetching orders"));
        let batch_size = normalized
            .batch_size
            .unwrap_or(self.settings.default_batch_size);
        let query = OrderFetchQuery {
            start_date: window.start,
            end_date: window.end,
            size: batch_size,
        };
        let batch = service
            .fetch_orders(&query)
            .await
            .map_err(|e| SyncError::FetchFailed(e.to_string()))?;

        let mut raws = batch.orders;
        if let Some(max_orders) = normalized.max_orders {
            raws.truncate(max_orders as usize);
        }
        ctx.log(
            callbacks,
            LogLevel::Info,
            &format!("Fetched {} raw orders", raws.len()),
            SyncPhase::Fetching,
        );

        self.process_batch(task, connection, &raws, window, callbacks, ctx)
            .await
    }

    /// Шаги 6-8: транзакция на всю пачку, заказы строго по одному.
    /// Отмена и ошибки хранилища откатывают всё; ошибка одного заказа —
    /// warn + пропуск.
    async fn process_batch(
        &self,
        task: &SyncTask,
        connection: &PlatformConnection,
        raws: &[Value],
        window: &SyncWindow,
        callbacks: &dyn SyncCallbacks,
        ctx: &RunContext,
    ) -> Result<TaskResult, SyncError> {
        let total = raws.len() as i32;
        let mut result = TaskResult::new(window.start, window.end);
        result.total_fetched = total;

        let reporter = ProgressReporter::new(Some(total));
        let txn = self.db.begin().await?;
        let mut processed: i32 = 0;

        for raw in raws {
            // Граница цикла: перед каждым заказом
            if callbacks.check_cancellation() {
                txn.rollback().await?;
                ctx.log(
                    callbacks,
                    LogLevel::Info,
                    &format!("Cancelled after {} of {} orders, batch rolled back", processed, total),
                    SyncPhase::Processing,
                );
                return Err(SyncError::Cancelled);
            }

            // Точка приостановки: внешняя пауза не теряет состояние
            callbacks.wait_for_resume().await;
            processed += 1;

            let mut order = match transformer::transform(raw, connection, task) {
                Ok(order) => order,
                Err(e) => {
                    result.failed += 1;
                    result.outcomes.push(OrderOutcome {
                        identifier: format!("#{}", processed),
                        outcome: OrderOutcomeKind::Failed,
                        message: Some(e.to_string()),
                    });
                    ctx.log(
                        callbacks,
                        LogLevel::Warn,
                        &format!("Order {}/{} transform failed: {}", processed, total, e),
                        SyncPhase::Processing,
                    );
                    continue;
                }
            };

            let identifier = order
                .external_order_id
                .clone()
                .or_else(|| order.order_number.clone())
                .unwrap_or_default();

            match dedup::check(&txn, &order).await {
                Ok(Some(duplicate)) => {
                    result.duplicates += 1;
                    result.outcomes.push(OrderOutcome {
                        identifier: identifier.clone(),
                        outcome: OrderOutcomeKind::Duplicate,
                        message: None,
                    });
                    if duplicate.matched_via_primary {
                        ctx.log(
                            callbacks,
                            LogLevel::Debug,
                            &format!("Order {} already exists, skipped", identifier),
                            SyncPhase::Processing,
                        );
                    } else {
                        // Совпадение только по второстепенному идентификатору:
                        // возможное ложное склеивание должно быть видно в логе
                        ctx.log(
                            callbacks,
                            LogLevel::Warn,
                            &format!(
                                "Order matched existing {} via secondary identifier only (external_order_id={:?}, order_number={:?})",
                                duplicate.existing_id, order.external_order_id, order.order_number
                            ),
                            SyncPhase::Processing,
                        );
                    }
                }
                Ok(None) => match self.persist_order(&txn, raw, &mut order).await {
                    Ok(()) => {
                        result.created += 1;
                        result.oldest_order_date = Some(match result.oldest_order_date {
                            Some(date) => date.min(order.order_date),
                            None => order.order_date,
                        });
                        result.outcomes.push(OrderOutcome {
                            identifier,
                            outcome: OrderOutcomeKind::Created,
                            message: None,
                        });
                    }
                    Err(e) => {
                        result.failed += 1;
                        result.outcomes.push(OrderOutcome {
                            identifier: identifier.clone(),
                            outcome: OrderOutcomeKind::Failed,
                            message: Some(e.to_string()),
                        });
                        ctx.log(
                            callbacks,
                            LogLevel::Warn,
                            &format!("Order {} persist failed: {}", identifier, e),
                            SyncPhase::Processing,
                        );
                    }
                },
                Err(e) => {
                    // Ошибка хранилища на проверке дубликата фатальна
                    txn.rollback().await?;
                    return Err(SyncError::Storage(e));
                }
            }

            callbacks.on_progress(&reporter.snapshot(
                processed,
                format!("Processed {} of {} orders", processed, total),
                SyncPhase::Processing,
            ));

            // Дозированная пауза каждые N заказов
            if self.settings.throttle_every > 0
                && processed % self.settings.throttle_every as i32 == 0
                && processed < total
            {
                tokio::time::sleep(std::time::Duration::from_millis(self.settings.throttle_ms))
                    .await;
            }
        }

        // Пачка прошла до конца (возможно, с позаказными ошибками) — фиксируем
        txn.commit().await?;
        Ok(result)
    }

    async fn persist_order(
        &self,
        txn: &DatabaseTransaction,
        raw: &Value,
        order: &mut contracts::domain::a002_sales_order::aggregate::SalesOrder,
    ) -> anyhow::Result<()> {
        let document_no = order
            .external_order_id
            .clone()
            .or_else(|| order.order_number.clone())
            .unwrap_or_default();

        // Verbatim payload сохраняется в той же транзакции, что и заказ
        let raw_ref = raw_storage::save_raw_json(
            txn,
            order.platform_type.code(),
            "sales_order",
            &document_no,
            &serde_json::to_string(raw)?,
            Utc::now(),
        )
        .await?;
        order.source_meta.raw_ref = raw_ref;

        order_repository::insert(txn, order).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::bootstrap_schema;
    use crate::shared::platforms::{FetchedBatch, PlatformServiceFactory};
    use crate::system::tasks::repository as task_repository;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use contracts::enums::PlatformType;
    use contracts::system::tasks::aggregate::{SOURCE_AUTOMATIC_CONTINUATION, TASK_TYPE_ORDER_FETCHING};
    use contracts::system::tasks::config::SyncConfig;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::json;
    use std::sync::atomic::{AtomicI32, Ordering};

    async fn test_db() -> DatabaseConnection {
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_owned());
        options.max_connections(1);
        let conn = sea_orm::Database::connect(options).await.unwrap();
        bootstrap_schema(&conn).await.unwrap();
        conn
    }

    struct MockPlatform {
        orders: Vec<Value>,
    }

    #[async_trait]
    impl PlatformService for MockPlatform {
        fn platform_type(&self) -> PlatformType {
            PlatformType::Trendyol
        }

        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn fetch_orders(&self, _query: &OrderFetchQuery) -> Result<FetchedBatch> {
            Ok(FetchedBatch {
                orders: self.orders.clone(),
                message: None,
            })
        }
    }

    struct MockFactory {
        orders: Vec<Value>,
    }

    impl PlatformServiceFactory for MockFactory {
        fn create(&self, _connection: &PlatformConnection) -> Result<Box<dyn PlatformService>> {
            Ok(Box::new(MockPlatform {
                orders: self.orders.clone(),
            }))
        }
    }

    fn registry_with_orders(orders: Vec<Value>) -> Arc<PlatformRegistry> {
        let mut registry = PlatformRegistry::new();
        registry.register(PlatformType::Trendyol, Arc::new(MockFactory { orders }));
        Arc::new(registry)
    }

    fn test_settings() -> SyncSettings {
        SyncSettings {
            throttle_every: 0,
            continuation_delay_seconds: 0,
            ..Default::default()
        }
    }

    async fn seed_connection(db: &DatabaseConnection) -> PlatformConnection {
        let connection = PlatformConnection::new_for_insert(
            "CON-1".to_string(),
            "Test connection".to_string(),
            PlatformType::Trendyol,
            "user-1".to_string(),
            "key".to_string(),
            None,
        );
        connection_repository::save(db, &connection).await.unwrap();
        connection
    }

    fn make_task(connection: &PlatformConnection, config: &SyncConfig) -> SyncTask {
        SyncTask::new_for_insert(
            "SYNC-T1".to_string(),
            "Test sync".to_string(),
            TASK_TYPE_ORDER_FETCHING.to_string(),
            "user-1".to_string(),
            connection.base.id.as_string(),
            0,
            serde_json::to_string(config).unwrap(),
            None,
        )
    }

    fn raw_order(id: &str, number: &str, date_millis: i64) -> Value {
        json!({
            "id": id,
            "orderNumber": number,
            "status": "Created",
            "orderDate": date_millis,
            "totalPrice": 10.0,
            "currencyCode": "TRY",
        })
    }

    /// Коллбэки с отменой после N обработанных заказов
    struct CancellingCallbacks {
        processed: AtomicI32,
        cancel_after: i32,
    }

    #[async_trait]
    impl SyncCallbacks for CancellingCallbacks {
        fn on_progress(&self, update: &ProgressUpdate) {
            if update.phase == SyncPhase::Processing {
                self.processed.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn on_log(&self, _level: LogLevel, _message: &str, _context: &LogContext) {}

        fn check_cancellation(&self) -> bool {
            self.processed.load(Ordering::SeqCst) >= self.cancel_after
        }

        async fn wait_for_resume(&self) {}
    }

    #[tokio::test]
    async fn test_idempotent_rerun_counts_duplicates() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        let orders = vec![
            raw_order("A1", "N1", 1710000000000),
            raw_order("A2", "N2", 1710100000000),
        ];
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(orders), test_settings());
        let task = make_task(&connection, &SyncConfig::default());

        let first = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(first.duplicates, 0);

        let second = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.duplicates, 2);

        let count = order_repository::count_for_user(&db, PlatformType::Trendyol, "user-1")
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_or_natural_key_matches_across_identifiers() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;

        let first_run = SyncOrdersExecutor::new(
            db.clone(),
            registry_with_orders(vec![raw_order("A1", "N1", 1710000000000)]),
            test_settings(),
        );
        let task = make_task(&connection, &SyncConfig::default());
        first_run.execute(&task, &super::super::NoopCallbacks).await.unwrap();

        // Другой external id, но order_number совпадает с external id
        // существующей записи — по OR-ключу это тот же заказ
        let second_run = SyncOrdersExecutor::new(
            db.clone(),
            registry_with_orders(vec![raw_order("B2", "A1", 1710200000000)]),
            test_settings(),
        );
        let result = second_run.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(result.created, 0);
        assert_eq!(result.duplicates, 1);

        let count = order_repository::count_for_user(&db, PlatformType::Trendyol, "user-1")
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_cancellation_rolls_back_whole_batch() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        let orders: Vec<Value> = (0..10)
            .map(|i| raw_order(&format!("A{}", i), &format!("N{}", i), 1710000000000 + i))
            .collect();
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(orders), test_settings());
        let task = make_task(&connection, &SyncConfig::default());

        let callbacks = CancellingCallbacks {
            processed: AtomicI32::new(0),
            cancel_after: 3,
        };
        let error = executor.execute(&task, &callbacks).await.unwrap_err();
        assert!(error.is_cancellation());

        // Откат: ни одного заказа из пачки, ни одного продолжения
        let count = order_repository::count_for_user(&db, PlatformType::Trendyol, "user-1")
            .await
            .unwrap();
        assert_eq!(count, 0);
        let tasks = task_repository::Entity::find().count(&db).await.unwrap();
        assert_eq!(tasks, 0);
    }

    #[tokio::test]
    async fn test_unknown_platform_fails_fast() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        // Пустой реестр: адаптер площадки не зарегистрирован
        let executor =
            SyncOrdersExecutor::new(db.clone(), Arc::new(PlatformRegistry::new()), test_settings());
        let task = make_task(&connection, &SyncConfig::default());

        let error = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap_err();
        assert!(matches!(error, SyncError::UnknownPlatform(_)));

        let count = order_repository::count_for_user(&db, PlatformType::Trendyol, "user-1")
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_missing_connection_fails_fast() {
        let db = test_db().await;
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(vec![]), test_settings());
        let mut task = make_task(
            &PlatformConnection::new_for_insert(
                "CON-X".to_string(),
                "Ghost".to_string(),
                PlatformType::Trendyol,
                "user-1".to_string(),
                "key".to_string(),
                None,
            ),
            &SyncConfig::default(),
        );
        task.connection_id = Uuid::new_v4().to_string();

        let error = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap_err();
        assert!(matches!(error, SyncError::MissingConnection(_)));
    }

    #[tokio::test]
    async fn test_auto_mode_schedules_continuation() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        let order_date = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let orders = vec![raw_order("A1", "N1", order_date.timestamp_millis())];
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(orders), test_settings());

        let config = SyncConfig {
            mode: SyncMode::Auto,
            ..Default::default()
        };
        let task = make_task(&connection, &config);

        let result = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(result.created, 1);
        assert!(result.continuation_scheduled);

        let children = task_repository::list_all(&db).await.unwrap();
        assert_eq!(children.len(), 1);
        let child = &children[0];
        assert_eq!(child.source, SOURCE_AUTOMATIC_CONTINUATION);
        assert_eq!(child.iteration_count, 1);
        assert_eq!(child.parent_task_id.as_deref(), Some(task.base.id.as_string().as_str()));
        assert_eq!(child.oldest_order_date, Some(order_date));
    }

    #[tokio::test]
    async fn test_auto_mode_stops_on_empty_window_when_requested() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(vec![]), test_settings());

        let config = SyncConfig {
            mode: SyncMode::Auto,
            stop_at_first: true,
            ..Default::default()
        };
        let task = make_task(&connection, &config);

        let result = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(result.created, 0);
        assert!(!result.continuation_scheduled);

        let tasks = task_repository::Entity::find().count(&db).await.unwrap();
        assert_eq!(tasks, 0);
    }

    #[tokio::test]
    async fn test_continuation_task_walks_window_backward() {
        let db = test_db().await;
        let connection = seed_connection(&db).await;
        let executor = SyncOrdersExecutor::new(db.clone(), registry_with_orders(vec![]), test_settings());

        let config = SyncConfig {
            mode: SyncMode::Auto,
            stop_at_first: true,
            ..Default::default()
        };
        let mut task = make_task(&connection, &config);
        task.source = SOURCE_AUTOMATIC_CONTINUATION.to_string();
        task.iteration_count = 1;
        task.oldest_order_date = Some(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap());

        let result = executor.execute(&task, &super::super::NoopCallbacks).await.unwrap();
        assert_eq!(
            result.window_end,
            Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap()
        );
        assert_eq!(
            result.window_start,
            Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0).unwrap()
        );
    }
}
