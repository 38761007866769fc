pub mod u101_sync_orders;

pub use u101_sync_orders::U101SyncOrdersManager;
