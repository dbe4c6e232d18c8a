//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信 → ビジネスイベントログを統合するサービス。
//!
//! ## 設計方針
//!
//! - **失敗は呼び出し元へ返す**: Webhook / cron は失敗を 500 で受け取り再試行する
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use sitterpro_domain::notification::{
    BookingNotification,
    NotificationError,
    NotificationEventType,
};
use sitterpro_infra::notification::NotificationSender;
use sitterpro_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;

/// 通知サービス
pub struct NotificationService {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
}

impl NotificationService {
    pub fn new(sender: Arc<dyn NotificationSender>, template_renderer: TemplateRenderer) -> Self {
        Self {
            sender,
            template_renderer,
        }
    }

    /// 通知を 1 通送信する
    ///
    /// レンダリング失敗・送信失敗はどちらも `NotificationError` として返す。
    pub async fn send(&self, notification: BookingNotification) -> Result<(), NotificationError> {
        let event_type = notification.event_type();
        let event_type_str: &str = event_type.into();
        let entity_type = entity_type_of(event_type);
        let entity_id = notification.subject_id();

        let email = self.template_renderer.render(&notification).inspect_err(|e| {
            tracing::error!(
                error = %e,
                event_type = event_type_str,
                "通知テンプレートのレンダリングに失敗"
            );
        })?;

        match self.sender.send_email(&email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = entity_type,
                    event.entity_id = %entity_id,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type_str,
                    notification.recipient = %email.to,
                    "通知メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = entity_type,
                    event.entity_id = %entity_id,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type_str,
                    notification.recipient = %email.to,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }
}

fn entity_type_of(event_type: NotificationEventType) -> &'static str {
    match event_type {
        NotificationEventType::ClientMessage => event::entity_type::MESSAGE,
        NotificationEventType::BookingConfirmation | NotificationEventType::BookingReminder => {
            event::entity_type::BOOKING
        }
    }
}
