//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番の Gmail リレー、開発の Mailpit）、Noop（ログのみ）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
use sitterpro_domain::notification::{EmailMessage, NotificationError};
pub use smtp::{SmtpNotificationSender, SmtpSettings};

/// メール送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを 1 通送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
