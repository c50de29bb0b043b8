use domain::TodoError;
use shared::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const TODOS_TABLE: &str = "todos";

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// SQLite 接続プール
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// 設定に従って接続し、スキーマを作成する
    pub async fn connect(config: &Config) -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(store_error)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect_with(options)
            .await
            .map_err(store_error)?;

        let database = Self { pool };
        database.migrate().await?;

        info!(
            max_connections = config.database_max_connections,
            "データベース接続完了"
        );
        Ok(database)
    }

    /// テスト用のインメモリデータベース
    ///
    /// インメモリ DB は接続ごとに別物になるため、接続を 1 本に固定して閉じないようにする。
    pub async fn in_memory() -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(store_error)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(store_error)?;

        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    /// スキーマを作成（何度実行してもよい）
    pub async fn migrate(&self) -> Result<(), TodoError> {
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub(crate) fn store_error(e: sqlx::Error) -> TodoError {
    TodoError::Store(e.to_string())
}
