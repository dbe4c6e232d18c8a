//! # 予約
//!
//! クライアントとシッターの間で成立した予約を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Booking`] | 予約 | 開始日・開始時刻・住所を持つ |
//! | [`BookingWithContacts`] | 連絡先付き予約 | リマインダー送信用に両者の連絡先を結合したもの |
//!
//! ## 不変条件
//!
//! - このサービスが変更するのは `reminder_sent` フラグのみ
//! - `reminder_sent` は false → true にのみ遷移する（一度だけ）
//!
//! Webhook で届く行はクライアント・シッターの参照が null のことがあるため、
//! 両者の ID は `Option` で持つ。
//!
//! 開始日時はタイムゾーン情報を持たないローカル時刻として保存されている。
//! ローカル時刻への換算は [`crate::reminder::ReminderPolicy`] が担当する。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{client::ClientId, contact::ContactInfo, sitter::SitterId};

define_uuid_id! {
    /// 予約 ID（`bookings.id`）
    pub struct BookingId;
}

/// 予約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    id:            BookingId,
    client_id:     Option<ClientId>,
    sitter_id:     Option<SitterId>,
    start_date:    NaiveDate,
    start_time:    NaiveTime,
    address:       String,
    reminder_sent: bool,
}

/// 予約の生成パラメータ
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id:            BookingId,
    pub client_id:     Option<ClientId>,
    pub sitter_id:     Option<SitterId>,
    pub start_date:    NaiveDate,
    pub start_time:    NaiveTime,
    pub address:       String,
    pub reminder_sent: bool,
}

impl Booking {
    pub fn new(params: NewBooking) -> Self {
        Self {
            id:            params.id,
            client_id:     params.client_id,
            sitter_id:     params.sitter_id,
            start_date:    params.start_date,
            start_time:    params.start_time,
            address:       params.address,
            reminder_sent: params.reminder_sent,
        }
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn sitter_id(&self) -> Option<&SitterId> {
        self.sitter_id.as_ref()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn reminder_sent(&self) -> bool {
        self.reminder_sent
    }

    /// 開始日時（タイムゾーンなしのローカル時刻）
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    /// リマインダー送信済みにした予約を返す
    pub fn with_reminder_sent(self) -> Self {
        Self {
            reminder_sent: true,
            ..self
        }
    }
}

/// 連絡先付き予約
///
/// リマインダー送信対象の取得結果。クライアント・シッターの行が存在しない
/// 場合でも予約自体は返り、連絡先は空になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWithContacts {
    pub booking: Booking,
    pub client:  ContactInfo,
    pub sitter:  ContactInfo,
}
