//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//!
//! - 認証情報あり: STARTTLS リレー（デフォルトは `smtp.gmail.com:587`）
//! - 認証情報なし: 平文接続（Mailpit などローカル SMTP 向け）

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use sitterpro_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// SMTP 接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host:         String,
    pub port:         u16,
    pub username:     Option<String>,
    pub password:     Option<String>,
    /// 送信元メールアドレス（表示名は `EmailMessage::from_name`）
    pub from_address: String,
}

/// SMTP 通知送信
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: Address,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成する
    ///
    /// 送信元アドレスが不正な場合や TLS 設定に失敗した場合は
    /// `NotificationError::SendFailed` を返す。接続自体は送信時まで行わない。
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let from_address: Address = settings
            .from_address
            .parse()
            .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;

        let transport = match (settings.username, settings.password) {
            (Some(username), Some(password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| NotificationError::SendFailed(format!("SMTP 設定失敗: {e}")))?
                    .port(settings.port)
                    .credentials(Credentials::new(username, password))
                    .build()
            }
            // builder_dangerous: TLS なしで接続
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .port(settings.port)
                .build(),
        };

        Ok(Self {
            transport,
            from_address,
        })
    }
}

/// `EmailMessage` から lettre のメッセージを組み立てる
fn build_message(from_address: &Address, email: &EmailMessage) -> Result<Message, NotificationError> {
    let from = Mailbox::new(Some(email.from_name.clone()), from_address.clone());
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(&email.subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html_body.clone()),
                ),
        )
        .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(&self.from_address, email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
