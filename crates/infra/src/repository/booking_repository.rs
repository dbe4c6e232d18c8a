//! # BookingRepository
//!
//! リマインダー送信対象の予約取得と、送信済みフラグの一括更新を担当する。
//!
//! ## 設計方針
//!
//! - **連絡先の同時取得**: クライアント・シッターを LEFT JOIN し、1 クエリで
//!   送信に必要な情報をそろえる（行が無ければ連絡先は空）
//! - **一括更新**: 1 回の実行につき UPDATE は最大 1 回
//! - **条件付き更新**: `reminder_sent = false` の行だけを反転させるため、
//!   並行実行された別インスタンスとの二重更新は件数に現れる

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sitterpro_domain::{
    booking::{Booking, BookingId, BookingWithContacts, NewBooking},
    client::ClientId,
    contact::ContactInfo,
    sitter::SitterId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// リマインダー未送信かつ `start_date >= from_date` の予約を連絡先付きで取得する
    ///
    /// 開始日・開始時刻の昇順で返す。
    async fn find_pending_reminders(
        &self,
        from_date: NaiveDate,
    ) -> Result<Vec<BookingWithContacts>, InfraError>;

    /// 指定した予約のリマインダーを送信済みにする
    ///
    /// 実際にフラグが false → true になった行数を返す。
    async fn mark_reminders_sent(&self, ids: &[BookingId]) -> Result<u64, InfraError>;
}

/// PostgreSQL 実装の BookingRepository
#[derive(Debug, Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PendingReminderRow {
    id:               Uuid,
    client_id:        Uuid,
    sitter_id:        Uuid,
    start_date:       NaiveDate,
    start_time:       NaiveTime,
    address:          String,
    reminder_sent:    bool,
    client_email:     Option<String>,
    client_full_name: Option<String>,
    sitter_email:     Option<String>,
    sitter_full_name: Option<String>,
}

impl From<PendingReminderRow> for BookingWithContacts {
    fn from(row: PendingReminderRow) -> Self {
        BookingWithContacts {
            booking: Booking::new(NewBooking {
                id:            BookingId::from_uuid(row.id),
                client_id:     Some(ClientId::from_uuid(row.client_id)),
                sitter_id:     Some(SitterId::from_uuid(row.sitter_id)),
                start_date:    row.start_date,
                start_time:    row.start_time,
                address:       row.address,
                reminder_sent: row.reminder_sent,
            }),
            client:  ContactInfo::new(row.client_email, row.client_full_name),
            sitter:  ContactInfo::new(row.sitter_email, row.sitter_full_name),
        }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%from_date))]
    async fn find_pending_reminders(
        &self,
        from_date: NaiveDate,
    ) -> Result<Vec<BookingWithContacts>, InfraError> {
        let rows = sqlx::query_as::<_, PendingReminderRow>(
            r#"
            SELECT
                b.id,
                b.client_id,
                b.sitter_id,
                b.start_date,
                b.start_time,
                b.address,
                b.reminder_sent,
                c.email AS client_email,
                c.full_name AS client_full_name,
                s.email AS sitter_email,
                s.full_name AS sitter_full_name
            FROM bookings b
            LEFT JOIN clients c ON c.id = b.client_id
            LEFT JOIN user_profiles s ON s.id = b.sitter_id
            WHERE b.reminder_sent = false
              AND b.start_date >= $1
            ORDER BY b.start_date, b.start_time
            "#,
        )
        .bind(from_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookingWithContacts::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(count = ids.len()))]
    async fn mark_reminders_sent(&self, ids: &[BookingId]) -> Result<u64, InfraError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET reminder_sent = true
            WHERE id = ANY($1)
              AND reminder_sent = false
            "#,
        )
        .bind(uuids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
