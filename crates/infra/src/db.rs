//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成とマイグレーションの適用を行う。
//!
//! 通知ハンドラはリクエストごとに数回のクエリしか発行しないため、
//! プールは小さめに設定している。
//!
//! ```rust,ignore
//! use sitterpro_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/sitterpro").await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` で埋め込んだマイグレーションを順番に適用する。
/// 適用済みのものはスキップされる。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを共有する。
///
/// - `max_connections(5)`
/// - `acquire_timeout(5秒)`: 超過時はエラー
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
