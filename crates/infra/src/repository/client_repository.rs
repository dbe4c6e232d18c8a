//! # ClientRepository
//!
//! 通知の受信者となるクライアントの取得を担当する。読み取り専用。

use async_trait::async_trait;
use sitterpro_domain::client::{Client, ClientId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// ID でクライアントを検索する
    ///
    /// 行が存在しなければ `Ok(None)`。
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, InfraError>;
}

/// PostgreSQL 実装の ClientRepository
#[derive(Debug, Clone)]
pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id:        Uuid,
    email:     Option<String>,
    full_name: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client::from_db(ClientId::from_uuid(row.id), row.email, row.full_name)
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, InfraError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, email, full_name
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Client::from))
    }
}
