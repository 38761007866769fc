use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Создает таблицу, если она еще не существует
async fn ensure_table(conn: &DatabaseConnection, name: &str, ddl: &str) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        name
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Минимальный bootstrap схемы. Вынесен отдельно от `initialize_database`,
/// чтобы тесты поднимали in-memory базу через тот же путь, что и продакшен.
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    ensure_table(
        conn,
        "a001_platform_connection",
        r#"
        CREATE TABLE a001_platform_connection (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            platform_type TEXT NOT NULL,
            user_id TEXT NOT NULL,
            api_key TEXT NOT NULL,
            api_secret TEXT,
            supplier_id TEXT,
            merchant_id TEXT,
            is_used INTEGER NOT NULL DEFAULT 0,
            test_mode INTEGER NOT NULL DEFAULT 0,
            authorization_type TEXT NOT NULL DEFAULT 'API Key',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        conn,
        "a002_sales_order",
        r#"
        CREATE TABLE a002_sales_order (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            external_order_id TEXT,
            order_number TEXT,
            platform_type TEXT NOT NULL,
            user_id TEXT NOT NULL,
            connection_id TEXT NOT NULL DEFAULT '',
            order_status TEXT NOT NULL DEFAULT 'unknown',
            order_date TEXT NOT NULL,
            total_amount REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'TRY',
            customer_name TEXT NOT NULL DEFAULT '',
            customer_email TEXT,
            customer_phone TEXT,
            shipping_address_json TEXT,
            billing_address_json TEXT,
            items_json TEXT NOT NULL DEFAULT '[]',
            source_meta_json TEXT NOT NULL DEFAULT '{}',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // Индексы под натуральный ключ дедупликации
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_a002_external ON a002_sales_order (platform_type, user_id, external_order_id);",
        "CREATE INDEX IF NOT EXISTS idx_a002_number ON a002_sales_order (platform_type, user_id, order_number);",
        "CREATE INDEX IF NOT EXISTS idx_a002_order_date ON a002_sales_order (user_id, connection_id, order_date);",
    ] {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }

    ensure_table(
        conn,
        "sys_sync_task",
        r#"
        CREATE TABLE sys_sync_task (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT,
            task_type TEXT NOT NULL,
            user_id TEXT NOT NULL,
            connection_id TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'queued',
            schedule_cron TEXT,
            config_json TEXT,
            source TEXT NOT NULL DEFAULT 'manual',
            parent_task_id TEXT,
            iteration_count INTEGER NOT NULL DEFAULT 0,
            oldest_order_date TEXT,
            scheduled_at TEXT,
            started_at TEXT,
            finished_at TEXT,
            log_file TEXT,
            result_json TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    )
    .await?;

    ensure_table(
        conn,
        "document_raw_storage",
        r#"
        CREATE TABLE document_raw_storage (
            id TEXT PRIMARY KEY NOT NULL,
            platform TEXT NOT NULL,
            document_type TEXT NOT NULL,
            document_no TEXT NOT NULL,
            raw_json TEXT NOT NULL,
            fetched_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
    "#,
    )
    .await?;

    Ok(())
}
