//! # DB Webhook ペイロード
//!
//! INSERT トリガーの Webhook は変更行を `record` フィールドに載せて送ってくる。
//! `type`・`table`・`old_record` などの付随フィールドは読まない。
//!
//! クライアント・シッターへの参照は null でも受け付ける。参照が無い場合の扱いは
//! ユースケース側で決める（クライアント無しは送信しない、シッター無しは
//! プレースホルダー名で送信する）。

use axum::body::Bytes;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, de::DeserializeOwned};
use sitterpro_domain::{
    booking::{Booking, BookingId, NewBooking},
    client::ClientId,
    message::{Message, MessageId, NewMessage},
    sitter::SitterId,
};
use uuid::Uuid;

use crate::error::NotifierError;

/// Webhook ペイロード
#[derive(Debug, Deserialize)]
pub struct WebhookPayload<T> {
    pub record: T,
}

/// `bookings` テーブルの行
#[derive(Debug, Deserialize)]
pub struct BookingRecord {
    pub id:            Uuid,
    #[serde(default)]
    pub client_id:     Option<Uuid>,
    #[serde(default)]
    pub sitter_id:     Option<Uuid>,
    pub start_date:    NaiveDate,
    pub start_time:    NaiveTime,
    #[serde(default)]
    pub address:       Option<String>,
    #[serde(default)]
    pub reminder_sent: bool,
}

/// `communications` テーブルの行
#[derive(Debug, Deserialize)]
pub struct MessageRecord {
    pub id:          Uuid,
    #[serde(default)]
    pub sender_id:   Option<Uuid>,
    #[serde(default)]
    pub receiver_id: Option<Uuid>,
    #[serde(default)]
    pub content:     String,
}

impl From<BookingRecord> for Booking {
    fn from(record: BookingRecord) -> Self {
        Booking::new(NewBooking {
            id:            BookingId::from_uuid(record.id),
            client_id:     record.client_id.map(ClientId::from_uuid),
            sitter_id:     record.sitter_id.map(SitterId::from_uuid),
            start_date:    record.start_date,
            start_time:    record.start_time,
            address:       record.address.unwrap_or_default(),
            reminder_sent: record.reminder_sent,
        })
    }
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Message::new(NewMessage {
            id:          MessageId::from_uuid(record.id),
            sender_id:   record.sender_id.map(SitterId::from_uuid),
            receiver_id: record.receiver_id.map(ClientId::from_uuid),
            content:     record.content,
        })
    }
}

/// リクエストボディから `record` を取り出す
pub(crate) fn parse_record<T: DeserializeOwned>(body: &Bytes) -> Result<T, NotifierError> {
    let payload: WebhookPayload<T> = serde_json::from_slice(body)?;
    Ok(payload.record)
}
