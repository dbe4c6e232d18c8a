//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用する行の挿入ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use sitterpro_domain::{booking::BookingId, client::ClientId, sitter::SitterId};
use sqlx::PgPool;

pub async fn insert_client(pool: &PgPool, email: Option<&str>, full_name: Option<&str>) -> ClientId {
    let id = ClientId::new();
    sqlx::query("INSERT INTO clients (id, email, full_name) VALUES ($1, $2, $3)")
        .bind(id.as_uuid())
        .bind(email)
        .bind(full_name)
        .execute(pool)
        .await
        .expect("クライアント作成に失敗");
    id
}

pub async fn insert_sitter(pool: &PgPool, email: Option<&str>, full_name: Option<&str>) -> SitterId {
    let id = SitterId::new();
    sqlx::query("INSERT INTO user_profiles (id, email, full_name) VALUES ($1, $2, $3)")
        .bind(id.as_uuid())
        .bind(email)
        .bind(full_name)
        .execute(pool)
        .await
        .expect("シッター作成に失敗");
    id
}

pub struct BookingSeed {
    pub client_id:     ClientId,
    pub sitter_id:     SitterId,
    pub start_date:    NaiveDate,
    pub start_time:    NaiveTime,
    pub reminder_sent: bool,
}

pub async fn insert_booking(pool: &PgPool, seed: BookingSeed) -> BookingId {
    let id = BookingId::new();
    sqlx::query(
        r#"
        INSERT INTO bookings (id, client_id, sitter_id, start_date, start_time, address, reminder_sent)
        VALUES ($1, $2, $3, $4, $5, 'Gulberg III, Lahore', $6)
        "#,
    )
    .bind(id.as_uuid())
    .bind(seed.client_id.as_uuid())
    .bind(seed.sitter_id.as_uuid())
    .bind(seed.start_date)
    .bind(seed.start_time)
    .bind(seed.reminder_sent)
    .execute(pool)
    .await
    .expect("予約作成に失敗");
    id
}

pub async fn reminder_sent(pool: &PgPool, id: &BookingId) -> bool {
    sqlx::query_scalar("SELECT reminder_sent FROM bookings WHERE id = $1")
        .bind(id.as_uuid())
        .fetch_one(pool)
        .await
        .expect("予約の取得に失敗")
}
