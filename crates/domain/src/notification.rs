//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`BookingNotification`] | 予約通知イベント | 確認・メッセージ・リマインダーの 3 種類 |
//! | [`NotificationEventType`] | 通知イベント種別 | ログの `event.type` に使う識別子 |
//! | [`EmailMessage`] | メールメッセージ | テンプレートレンダリングの出力 |
//!
//! 名前が解決できなかった場合のプレースホルダーはこのモジュールで一元管理する。

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{booking::BookingId, message::MessageId};

/// 確認メールでシッター名が解決できなかったときの表示名
pub const SITTER_NAME_PLACEHOLDER: &str = "The Sitter";

/// メッセージ通知で送信者名が解決できなかったときの表示名
pub const SENDER_NAME_PLACEHOLDER: &str = "Sitter";

/// クライアント名が解決できなかったときの呼びかけ
pub const CLIENT_NAME_PLACEHOLDER: &str = "there";

/// 確認メール・リマインダーの差出人表示名
pub const APP_SENDER_NAME: &str = "Sitter Pro App";

/// メッセージ通知の差出人表示名
pub const MESSAGE_SENDER_NAME: &str = "Sitter Pro Message";

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知イベント種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    /// 予約確認: 予約確定時 → クライアントに送信
    BookingConfirmation,
    /// メッセージ通知: シッターからのメッセージ → クライアントに送信
    ClientMessage,
    /// リマインダー: 開始約 1 時間前 → クライアントとシッターに送信
    BookingReminder,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 差出人の表示名（アドレスは送信設定側で決まる）
    pub from_name: String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 予約通知イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingNotification {
    /// 予約確認
    Confirmation {
        booking_id:   BookingId,
        client_email: String,
        client_name:  Option<String>,
        sitter_name:  Option<String>,
        start_date:   NaiveDate,
        start_time:   NaiveTime,
        address:      String,
    },
    /// シッターからのメッセージ
    ClientMessage {
        message_id:      MessageId,
        recipient_email: String,
        sender_name:     Option<String>,
        content:         String,
    },
    /// 開始前リマインダー（クライアント・シッターに同じ内容で送る）
    Reminder {
        booking_id:      BookingId,
        recipient_email: String,
        start_date:      NaiveDate,
        start_time:      NaiveTime,
        address:         String,
    },
}

impl BookingNotification {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::Confirmation { .. } => NotificationEventType::BookingConfirmation,
            Self::ClientMessage { .. } => NotificationEventType::ClientMessage,
            Self::Reminder { .. } => NotificationEventType::BookingReminder,
        }
    }

    /// 受信者のメールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::Confirmation { client_email, .. } => client_email,
            Self::ClientMessage {
                recipient_email, ..
            }
            | Self::Reminder {
                recipient_email, ..
            } => recipient_email,
        }
    }

    /// 差出人の表示名を返す
    pub fn from_name(&self) -> &'static str {
        match self {
            Self::ClientMessage { .. } => MESSAGE_SENDER_NAME,
            Self::Confirmation { .. } | Self::Reminder { .. } => APP_SENDER_NAME,
        }
    }

    /// ログ用の対象 ID（予約 ID またはメッセージ ID）
    pub fn subject_id(&self) -> String {
        match self {
            Self::Confirmation { booking_id, .. } | Self::Reminder { booking_id, .. } => {
                booking_id.to_string()
            }
            Self::ClientMessage { message_id, .. } => message_id.to_string(),
        }
    }
}

/// 名前が無ければプレースホルダーを返す
pub fn display_name_or<'a>(name: Option<&'a str>, placeholder: &'a str) -> &'a str {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(placeholder)
}
