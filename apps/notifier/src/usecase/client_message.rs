//! # メッセージ通知ユースケース
//!
//! シッターからのメッセージが作成されたとき、受信者のクライアントに
//! 送信者名と本文をメールで知らせる。

use std::sync::Arc;

use sitterpro_domain::{message::Message, notification::BookingNotification};
use sitterpro_infra::repository::{ClientRepository, SitterProfileRepository};
use sitterpro_shared::{event_log::event, log_business_event};

use super::{NotifyOutcome, notification::NotificationService, resolve_sitter_name};
use crate::error::NotifierError;

/// メッセージ通知ユースケースの実装
pub struct ClientMessageUseCaseImpl {
    client_repo:          Arc<dyn ClientRepository>,
    sitter_repo:          Arc<dyn SitterProfileRepository>,
    notification_service: Arc<NotificationService>,
}

impl ClientMessageUseCaseImpl {
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

    /// メッセージ通知を送信する
    pub async fn execute(&self, message: &Message) -> Result<NotifyOutcome, NotifierError> {
        let receiver = match message.receiver_id() {
            Some(receiver_id) => self.client_repo.find_by_id(receiver_id).await?,
            None => None,
        };

        let Some(recipient_email) = receiver.as_ref().and_then(|c| c.email()) else {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::MESSAGE,
                event.entity_id = %message.id(),
                event.result = event::result::SKIPPED,
                receiver_id = ?message.receiver_id(),
                "受信者のメールアドレスが無いためメッセージ通知を送信しない"
            );
            return Ok(NotifyOutcome::MissingClientEmail);
        };

        let sender_name = resolve_sitter_name(self.sitter_repo.as_ref(), message.sender_id()).await;

        let notification = BookingNotification::ClientMessage {
            message_id: *message.id(),
            recipient_email: recipient_email.to_string(),
            sender_name,
            content: message.content().to_string(),
        };

        self.notification_service.send(notification).await?;

        Ok(NotifyOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sitterpro_domain::{
        client::{Client, ClientId},
        message::{MessageId, NewMessage},
        sitter::{SitterId, SitterProfile},
    };
    use sitterpro_infra::mock::{
        MockClientRepository,
        MockNotificationSender,
        MockSitterProfileRepository,
    };

    use super::*;
    use crate::usecase::notification::TemplateRenderer;

    fn setup() -> (
        MockClientRepository,
        MockSitterProfileRepository,
        MockNotificationSender,
        ClientMessageUseCaseImpl,
    ) {
        let client_repo = MockClientRepository::new();
        let sitter_repo = MockSitterProfileRepository::new();
        let sender = MockNotificationSender::new();
        let notification_service = Arc::new(NotificationService::new(
            Arc::new(sender.clone()),
            TemplateRenderer::new().unwrap(),
        ));
        let usecase = ClientMessageUseCaseImpl::new(
            Arc::new(client_repo.clone()),
            Arc::new(sitter_repo.clone()),
            notification_service,
        );
        (client_repo, sitter_repo, sender, usecase)
    }

    fn make_message(
        sender_id: Option<SitterId>,
        receiver_id: Option<ClientId>,
        content: &str,
    ) -> Message {
        Message::new(NewMessage {
            id: MessageId::new(),
            sender_id,
            receiver_id,
            content: content.to_string(),
        })
    }

    #[tokio::test]
    async fn test_受信者に送信者名と本文を送る() {
        // Given
        let (client_repo, sitter_repo, sender, usecase) = setup();
        let client_id = ClientId::new();
        let sitter_id = SitterId::new();
        client_repo.add_client(Client::from_db(
            client_id,
            Some("sara@example.com".to_string()),
            Some("Sara Ahmed".to_string()),
        ));
        sitter_repo.add_sitter(SitterProfile::from_db(
            sitter_id,
            None,
            Some("Ayesha Khan".to_string()),
        ));

        // When
        let outcome = usecase
            .execute(&make_message(Some(sitter_id), Some(client_id), "Reached the gate"))
            .await
            .unwrap();

        // Then
        assert_eq!(outcome, NotifyOutcome::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "sara@example.com");
        assert_eq!(sent[0].subject, "New Message from Ayesha Khan 💬");
        assert_eq!(sent[0].from_name, "Sitter Pro Message");
        assert!(sent[0].text_body.contains("Reached the gate"));
    }

    #[tokio::test]
    async fn test_受信者のメールアドレスが無ければ送信しない() {
        let (client_repo, _sitter_repo, sender, usecase) = setup();
        let client_id = ClientId::new();
        client_repo.add_client(Client::from_db(client_id, None, Some("Sara".to_string())));

        let outcome = usecase
            .execute(&make_message(Some(SitterId::new()), Some(client_id), "Hello"))
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::MissingClientEmail);
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_送信者不明ならプレースホルダー名で送る() {
        let (client_repo, _sitter_repo, sender, usecase) = setup();
        let client_id = ClientId::new();
        client_repo.add_client(Client::from_db(
            client_id,
            Some("sara@example.com".to_string()),
            None,
        ));

        usecase
            .execute(&make_message(Some(SitterId::new()), Some(client_id), "Hello"))
            .await
            .unwrap();

        assert_eq!(sender.sent_emails()[0].subject, "New Message from Sitter 💬");
    }

    #[tokio::test]
    async fn test_受信者検索の失敗はエラーになる() {
        let (client_repo, _sitter_repo, sender, usecase) = setup();
        client_repo.fail_lookups();

        let result = usecase
            .execute(&make_message(Some(SitterId::new()), Some(ClientId::new()), "Hello"))
            .await;

        assert!(matches!(result, Err(NotifierError::Database(_))));
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_受信者の参照が無ければ検索せずに送信しない() {
        let (client_repo, _sitter_repo, sender, usecase) = setup();
        client_repo.fail_lookups();

        let outcome = usecase
            .execute(&make_message(Some(SitterId::new()), None, "Hello"))
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::MissingClientEmail);
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_送信者の参照が無ければプレースホルダー名で送る() {
        let (client_repo, sitter_repo, sender, usecase) = setup();
        let client_id = ClientId::new();
        client_repo.add_client(Client::from_db(
            client_id,
            Some("sara@example.com".to_string()),
            None,
        ));
        sitter_repo.fail_lookups();

        let outcome = usecase
            .execute(&make_message(None, Some(client_id), "Running late"))
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::Sent);
        assert_eq!(sender.sent_emails()[0].subject, "New Message from Sitter 💬");
    }
}
