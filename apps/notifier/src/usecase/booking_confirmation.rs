//! # 予約確認ユースケース
//!
//! 新規予約の Webhook を受けて、クライアントに確認メールを 1 通送る。

use std::sync::Arc;

use sitterpro_domain::{booking::Booking, notification::BookingNotification};
use sitterpro_infra::repository::{ClientRepository, SitterProfileRepository};
use sitterpro_shared::{event_log::event, log_business_event};

use super::{NotifyOutcome, notification::NotificationService, resolve_sitter_name};
use crate::error::NotifierError;

/// 予約確認ユースケースの実装
pub struct BookingConfirmationUseCaseImpl {
    client_repo:          Arc<dyn ClientRepository>,
    sitter_repo:          Arc<dyn SitterProfileRepository>,
    notification_service: Arc<NotificationService>,
}

impl BookingConfirmationUseCaseImpl {
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        sitter_repo: Arc<dyn SitterProfileRepository>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            client_repo,
            sitter_repo,
            notification_service,
        }
    }

    /// 予約確認メールを送信する
    ///
    /// クライアントの検索に失敗した場合はエラー、クライアントの参照・行・
    /// メールアドレスのいずれかが無い場合は送信せずに `MissingClientEmail` を返す。
    pub async fn execute(&self, booking: &Booking) -> Result<NotifyOutcome, NotifierError> {
        let client = match booking.client_id() {
            Some(client_id) => self.client_repo.find_by_id(client_id).await?,
            None => None,
        };

        let Some(client_email) = client.as_ref().and_then(|c| c.email()) else {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::BOOKING,
                event.entity_id = %booking.id(),
                event.result = event::result::SKIPPED,
                client_id = ?booking.client_id(),
                "クライアントのメールアドレスが無いため予約確認メールを送信しない"
            );
            return Ok(NotifyOutcome::MissingClientEmail);
        };

        let sitter_name = resolve_sitter_name(self.sitter_repo.as_ref(), booking.sitter_id()).await;

        let notification = BookingNotification::Confirmation {
            booking_id: *booking.id(),
            client_email: client_email.to_string(),
            client_name: client.as_ref().and_then(|c| c.full_name()).map(str::to_string),
            sitter_name,
            start_date: booking.start_date(),
            start_time: booking.start_time(),
            address: booking.address().to_string(),
        };

        self.notification_service.send(notification).await?;

        Ok(NotifyOutcome::Sent)
    }
}
