//! # テスト用モック
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! sitterpro-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use sitterpro_domain::{
    booking::{BookingId, BookingWithContacts},
    client::{Client, ClientId},
    notification::{EmailMessage, NotificationError},
    sitter::{SitterId, SitterProfile},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{BookingRepository, ClientRepository, SitterProfileRepository},
};

/// モックが返す DB エラー
fn database_error() -> InfraError {
    sqlx::Error::PoolTimedOut.into()
}

// ===== MockClientRepository =====

#[derive(Clone, Default)]
pub struct MockClientRepository {
    clients: Arc<Mutex<Vec<Client>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&self, client: Client) {
        self.clients.lock().unwrap().push(client);
    }

    /// 以降の検索を DB エラーにする
    pub fn fail_lookups(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl ClientRepository for MockClientRepository {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, InfraError> {
        if *self.failing.lock().unwrap() {
            return Err(database_error());
        }

        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }
}

// ===== MockSitterProfileRepository =====

#[derive(Clone, Default)]
pub struct MockSitterProfileRepository {
    sitters: Arc<Mutex<Vec<SitterProfile>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockSitterProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sitter(&self, sitter: SitterProfile) {
        self.sitters.lock().unwrap().push(sitter);
    }

    pub fn fail_lookups(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl SitterProfileRepository for MockSitterProfileRepository {
    async fn find_by_id(&self, id: &SitterId) -> Result<Option<SitterProfile>, InfraError> {
        if *self.failing.lock().unwrap() {
            return Err(database_error());
        }

        Ok(self
            .sitters
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned())
    }
}

// ===== MockBookingRepository =====

/// 予約のインメモリ実装
///
/// `mark_reminders_sent` の呼び出しごとの ID 一覧を記録する。
#[derive(Clone, Default)]
pub struct MockBookingRepository {
    bookings:     Arc<Mutex<Vec<BookingWithContacts>>>,
    mark_calls:   Arc<Mutex<Vec<Vec<BookingId>>>>,
    failing_find: Arc<Mutex<bool>>,
    failing_mark: Arc<Mutex<bool>>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_booking(&self, booking: BookingWithContacts) {
        self.bookings.lock().unwrap().push(booking);
    }

    /// `mark_reminders_sent` に渡された ID 一覧（呼び出し順）
    pub fn mark_calls(&self) -> Vec<Vec<BookingId>> {
        self.mark_calls.lock().unwrap().clone()
    }

    pub fn is_reminder_sent(&self, id: &BookingId) -> bool {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.booking.id() == id && b.booking.reminder_sent())
    }

    pub fn fail_fetch(&self) {
        *self.failing_find.lock().unwrap() = true;
    }

    pub fn fail_update(&self) {
        *self.failing_mark.lock().unwrap() = true;
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_pending_reminders(
        &self,
        from_date: NaiveDate,
    ) -> Result<Vec<BookingWithContacts>, InfraError> {
        if *self.failing_find.lock().unwrap() {
            return Err(database_error());
        }

        let mut pending: Vec<BookingWithContacts> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| !b.booking.reminder_sent() && b.booking.start_date() >= from_date)
            .cloned()
            .collect();
        pending.sort_by_key(|b| b.booking.starts_at());

        Ok(pending)
    }

    async fn mark_reminders_sent(&self, ids: &[BookingId]) -> Result<u64, InfraError> {
        self.mark_calls.lock().unwrap().push(ids.to_vec());

        if *self.failing_mark.lock().unwrap() {
            return Err(database_error());
        }

        let mut bookings = self.bookings.lock().unwrap();
        let mut flipped = 0;
        for entry in bookings.iter_mut() {
            if ids.contains(entry.booking.id()) && !entry.booking.reminder_sent() {
                entry.booking = entry.booking.clone().with_reminder_sent();
                flipped += 1;
            }
        }

        Ok(flipped)
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
///
/// `fail_for` で指定した宛先への送信だけを失敗させられる。
/// 失敗した送信は記録しない。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:               Arc<Mutex<Vec<EmailMessage>>>,
    failing_recipients: Arc<Mutex<Vec<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_for(&self, recipient: impl Into<String>) {
        self.failing_recipients
            .lock()
            .unwrap()
            .push(recipient.into());
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .iter()
            .any(|r| r == &email.to)
        {
            return Err(NotificationError::SendFailed(format!(
                "SMTP 送信失敗: {} に接続できません",
                email.to
            )));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use sitterpro_domain::{
        booking::{Booking, NewBooking},
        contact::ContactInfo,
    };

    use super::*;

    fn pending(start_date: NaiveDate, hour: u32) -> BookingWithContacts {
        BookingWithContacts {
            booking: Booking::new(NewBooking {
                id:            BookingId::new(),
                client_id:     Some(ClientId::new()),
                sitter_id:     Some(SitterId::new()),
                start_date,
                start_time:    NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                address:       "DHA Phase 5, Karachi".to_string(),
                reminder_sent: false,
            }),
            client:  ContactInfo::default(),
            sitter:  ContactInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_mark_reminders_sentは未送信の行だけを数える() {
        let repo = MockBookingRepository::new();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let booking = pending(today, 14);
        let id = *booking.booking.id();
        repo.add_booking(booking);

        assert_eq!(repo.mark_reminders_sent(&[id]).await.unwrap(), 1);
        assert_eq!(repo.mark_reminders_sent(&[id]).await.unwrap(), 0);
        assert!(repo.is_reminder_sent(&id));
        assert_eq!(repo.mark_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_find_pending_remindersは過去日と送信済みを除外する() {
        let repo = MockBookingRepository::new();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        let later = pending(today, 16);
        let earlier = pending(today, 9);
        let later_id = *later.booking.id();
        let earlier_id = *earlier.booking.id();
        repo.add_booking(later);
        repo.add_booking(earlier);
        repo.add_booking(pending(yesterday, 23));

        let found = repo.find_pending_reminders(today).await.unwrap();

        let ids: Vec<BookingId> = found.iter().map(|b| *b.booking.id()).collect();
        assert_eq!(ids, vec![earlier_id, later_id]);
    }

    #[tokio::test]
    async fn test_mock_notification_senderは指定した宛先だけ失敗する() {
        let sender = MockNotificationSender::new();
        sender.fail_for("down@example.com");
        let email = |to: &str| EmailMessage {
            to:        to.to_string(),
            from_name: "Sitter Pro App".to_string(),
            subject:   "subject".to_string(),
            html_body: String::new(),
            text_body: String::new(),
        };

        assert!(sender.send_email(&email("down@example.com")).await.is_err());
        assert!(sender.send_email(&email("up@example.com")).await.is_ok());
        assert_eq!(sender.sent_emails().len(), 1);
    }
}
