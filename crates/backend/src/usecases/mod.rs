pub mod u101_sync_orders;
