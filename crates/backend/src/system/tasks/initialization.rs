use anyhow::Result;
use std::sync::Arc;

use crate::shared::config::Config;
use crate::shared::data::db::get_connection;
use crate::shared::platforms::PlatformRegistry;
use crate::usecases::u101_sync_orders::SyncOrdersExecutor;

use super::{
    control::TaskControlCenter,
    logger::TaskLogger,
    managers::U101SyncOrdersManager,
    registry::TaskManagerRegistry,
    worker::SyncTaskWorker,
};

/// Инициализирует реестры и фоновый воркер заданий синхронизации.
pub fn initialize_task_worker(config: &Config) -> Result<SyncTaskWorker> {
    // Реестр адаптеров площадок заполняется один раз при старте;
    // добавление площадки — одна строка здесь плюс адаптер
    let platforms = Arc::new(PlatformRegistry::with_all_platforms());

    let executor = Arc::new(SyncOrdersExecutor::new(
        get_connection().clone(),
        platforms,
        config.sync.clone(),
    ));

    let mut registry = TaskManagerRegistry::new();
    registry.register(U101SyncOrdersManager::new(executor));

    let logger = Arc::new(TaskLogger::new("./task_logs"));
    let control = Arc::new(TaskControlCenter::new());

    Ok(SyncTaskWorker::new(
        Arc::new(registry),
        logger,
        control,
        config.sync.worker_interval_seconds,
    ))
}
