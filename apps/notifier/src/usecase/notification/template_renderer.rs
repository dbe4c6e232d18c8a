//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **自動エスケープ**: `.html` テンプレートでは差し込む値が HTML エスケープされる。
//!   メッセージ本文に含まれるタグはそのまま文字として表示される
//! - **プレースホルダー**: 名前が解決できなかった場合の表示名はここで適用する

use sitterpro_domain::notification::{
    BookingNotification,
    CLIENT_NAME_PLACEHOLDER,
    EmailMessage,
    NotificationError,
    SENDER_NAME_PLACEHOLDER,
    SITTER_NAME_PLACEHOLDER,
    display_name_or,
};
use tera::{Context, Tera};

const CONFIRMATION_SUBJECT: &str = "Booking Confirmed! ✅";
const REMINDER_SUBJECT: &str = "⏰ Appointment Reminder: 1 Hour to go!";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "booking_confirmation.html",
                    include_str!("../../../templates/notifications/booking_confirmation.html"),
                ),
                (
                    "booking_confirmation.txt",
                    include_str!("../../../templates/notifications/booking_confirmation.txt"),
                ),
                (
                    "client_message.html",
                    include_str!("../../../templates/notifications/client_message.html"),
                ),
                (
                    "client_message.txt",
                    include_str!("../../../templates/notifications/client_message.txt"),
                ),
                (
                    "booking_reminder.html",
                    include_str!("../../../templates/notifications/booking_reminder.html"),
                ),
                (
                    "booking_reminder.txt",
                    include_str!("../../../templates/notifications/booking_reminder.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    pub fn render(&self, notification: &BookingNotification) -> Result<EmailMessage, NotificationError> {
        let (subject, context) = build_template_params(notification);
        let template_name: &str = notification.event_type().into();

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient_email().to_string(),
            from_name: notification.from_name().to_string(),
            subject,
            html_body,
            text_body,
        })
    }
}

/// 件名とテンプレートコンテキストを構築する
fn build_template_params(notification: &BookingNotification) -> (String, Context) {
    let mut context = Context::new();

    let subject = match notification {
        BookingNotification::Confirmation {
            client_name,
            sitter_name,
            start_date,
            start_time,
            address,
            ..
        } => {
            context.insert(
                "client_name",
                display_name_or(client_name.as_deref(), CLIENT_NAME_PLACEHOLDER),
            );
            context.insert(
                "sitter_name",
                display_name_or(sitter_name.as_deref(), SITTER_NAME_PLACEHOLDER),
            );
            context.insert("start_date", &start_date.to_string());
            context.insert("start_time", &start_time.to_string());
            context.insert("address", address);
            CONFIRMATION_SUBJECT.to_string()
        }
        BookingNotification::ClientMessage {
            sender_name,
            content,
            ..
        } => {
            let sender = display_name_or(sender_name.as_deref(), SENDER_NAME_PLACEHOLDER);
            context.insert("sender_name", sender);
            context.insert("content", content);
            format!("New Message from {sender} 💬")
        }
        BookingNotification::Reminder {
            start_date,
            start_time,
            address,
            ..
        } => {
            context.insert("start_date", &start_date.to_string());
            context.insert("start_time", &start_time.to_string());
            context.insert("address", address);
            REMINDER_SUBJECT.to_string()
        }
    };

    (subject, context)
}
