pub mod a001_platform_connection;
pub mod a002_sales_order;
