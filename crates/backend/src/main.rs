pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy())).await?;

    system::tasks::service::ensure_seed_tasks().await?;

    let worker = system::tasks::initialization::initialize_task_worker(&config)?;

    tracing::info!("Order synchronization service started");
    worker.run_loop().await;

    Ok(())
}
