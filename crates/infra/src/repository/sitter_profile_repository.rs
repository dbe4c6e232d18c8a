//! # SitterProfileRepository
//!
//! `user_profiles` テーブルからシッターの名前・連絡先を取得する。
//! 呼び出し側では名前の解決はベストエフォートとして扱われる。

use async_trait::async_trait;
use sitterpro_domain::sitter::{SitterId, SitterProfile};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait SitterProfileRepository: Send + Sync {
    /// ID でシッタープロフィールを検索する
    async fn find_by_id(&self, id: &SitterId) -> Result<Option<SitterProfile>, InfraError>;
}

/// PostgreSQL 実装の SitterProfileRepository
#[derive(Debug, Clone)]
pub struct PostgresSitterProfileRepository {
    pool: PgPool,
}

impl PostgresSitterProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SitterProfileRow {
    id:        Uuid,
    email:     Option<String>,
    full_name: Option<String>,
}

#[async_trait]
impl SitterProfileRepository for PostgresSitterProfileRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &SitterId) -> Result<Option<SitterProfile>, InfraError> {
        let row = sqlx::query_as::<_, SitterProfileRow>(
            r#"
            SELECT id, email, full_name
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            SitterProfile::from_db(SitterId::from_uuid(row.id), row.email, row.full_name)
        }))
    }
}
