//! # リマインダーユースケース
//!
//! 未送信リマインダーを持つ予約を走査し、開始まで `(30 分, 90 分]` の予約について
//! クライアントとシッターにメールを送り、まとめて送信済みにする。
//!
//! ## 処理の流れ
//!
//! 1. `reminder_sent = false` かつ開始日が UTC・ローカルの早い方の暦日以降の予約を取得
//! 2. 予約ごとに固定オフセットで換算した現在時刻との差分を計算し、ウィンドウ判定
//! 3. 対象予約のクライアント・シッターのうちメールアドレスがある方へ送信
//! 4. 対象予約の ID を 1 回の UPDATE で送信済みにする（対象 0 件なら UPDATE しない）
//!
//! 送信に失敗した時点でループを止める。それまでに送信を終えた予約は
//! 送信済みにしてからエラーを返し、失敗した予約は次回の実行で再送される。

use std::sync::Arc;

use sitterpro_domain::{
    booking::{BookingId, BookingWithContacts},
    clock::Clock,
    notification::BookingNotification,
    reminder::{ReminderPolicy, as_fractional_minutes},
};
use sitterpro_infra::repository::BookingRepository;
use sitterpro_shared::{event_log::event, log_business_event};

use super::notification::NotificationService;
use crate::error::NotifierError;

/// 1 回の実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderRunSummary {
    /// リマインダーを送った予約の件数（メールの通数ではない）
    pub sent:   usize,
    /// UPDATE で実際に送信済みへ変わった行数
    pub marked: u64,
}

/// リマインダーユースケースの実装
pub struct ReminderUseCaseImpl {
    booking_repo:         Arc<dyn BookingRepository>,
    notification_service: Arc<NotificationService>,
    clock:                Arc<dyn Clock>,
    policy:               ReminderPolicy,
}

impl ReminderUseCaseImpl {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        notification_service: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
        policy: ReminderPolicy,
    ) -> Self {
        Self {
            booking_repo,
            notification_service,
            clock,
            policy,
        }
    }

    /// リマインダーを 1 回分処理する
    pub async fn run(&self) -> Result<ReminderRunSummary, NotifierError> {
        let now = self.clock.now();
        let pending = self
            .booking_repo
            .find_pending_reminders(self.policy.fetch_from(now))
            .await?;

        tracing::debug!(
            candidates = pending.len(),
            local_now = %self.policy.local_now(now),
            "リマインダー候補を取得"
        );

        let mut dispatched: Vec<BookingId> = Vec::new();
        let mut failure = None;

        for entry in &pending {
            let until_start = self.policy.time_until_start(&entry.booking, now);
            let due = self.policy.window().contains(until_start);

            tracing::debug!(
                booking_id = %entry.booking.id(),
                starts_at = %entry.booking.starts_at(),
                diff_minutes = as_fractional_minutes(until_start),
                due,
                "リマインダー判定"
            );

            if !due {
                continue;
            }

            if let Err(e) = self.dispatch(entry).await {
                failure = Some(e);
                break;
            }
            dispatched.push(*entry.booking.id());
        }

        let marked = self.mark_dispatched(&dispatched).await?;

        if let Some(e) = failure {
            return Err(e);
        }

        Ok(ReminderRunSummary {
            sent: dispatched.len(),
            marked,
        })
    }

    /// 1 件の予約についてクライアント・シッターへ送信する
    async fn dispatch(&self, entry: &BookingWithContacts) -> Result<(), NotifierError> {
        let booking = &entry.booking;
        let recipients: Vec<&str> = [entry.client.email(), entry.sitter.email()]
            .into_iter()
            .flatten()
            .collect();

        if recipients.is_empty() {
            log_business_event!(
                event.category = event::category::REMINDER,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::BOOKING,
                event.entity_id = %booking.id(),
                event.result = event::result::SKIPPED,
                "宛先が無いためリマインダーを送信しない"
            );
            return Ok(());
        }

        for recipient in recipients {
            let notification = BookingNotification::Reminder {
                booking_id:      *booking.id(),
                recipient_email: recipient.to_string(),
                start_date:      booking.start_date(),
                start_time:      booking.start_time(),
                address:         booking.address().to_string(),
            };
            self.notification_service.send(notification).await?;
        }

        Ok(())
    }

    /// 送信済みの予約を 1 回の UPDATE でまとめて記録する
    async fn mark_dispatched(&self, ids: &[BookingId]) -> Result<u64, NotifierError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let marked = self.booking_repo.mark_reminders_sent(ids).await?;

        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = event::action::REMINDER_BATCH_MARKED,
            event.entity_type = event::entity_type::BOOKING,
            event.result = event::result::SUCCESS,
            reminder.dispatched = ids.len(),
            reminder.marked = marked,
            "リマインダー送信済みフラグを更新"
        );

        // 並行実行で先に更新された予約は数に入らない
        if marked < ids.len() as u64 {
            tracing::warn!(
                dispatched = ids.len(),
                marked,
                "一部の予約は既に送信済みだった（並行実行の可能性）"
            );
        }

        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sitterpro_domain::{
        booking::{Booking, NewBooking},
        client::ClientId,
        clock::FixedClock,
        contact::ContactInfo,
        reminder::ReminderWindow,
        sitter::SitterId,
    };
    use sitterpro_infra::mock::{MockBookingRepository, MockNotificationSender};

    use super::*;
    use crate::usecase::notification::TemplateRenderer;

    /// 2024-05-01 09:00 UTC = 14:00 ローカル（+05:00）
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn contact(email: Option<&str>) -> ContactInfo {
        ContactInfo::new(email.map(str::to_string), None)
    }

    fn booking_at(
        start_date: NaiveDate,
        hour: u32,
        min: u32,
        client_email: Option<&str>,
        sitter_email: Option<&str>,
    ) -> BookingWithContacts {
        BookingWithContacts {
            booking: Booking::new(NewBooking {
                id: BookingId::new(),
                client_id: Some(ClientId::new()),
                sitter_id: Some(SitterId::new()),
                start_date,
                start_time: NaiveTime::from_hms_opt(hour, min, 0).unwrap(),
                address: "Gulberg III, Lahore".to_string(),
                reminder_sent: false,
            }),
            client:  contact(client_email),
            sitter:  contact(sitter_email),
        }
    }

    fn setup_with(
        now: DateTime<Utc>,
        policy: ReminderPolicy,
    ) -> (MockBookingRepository, MockNotificationSender, ReminderUseCaseImpl) {
        let repo = MockBookingRepository::new();
        let sender = MockNotificationSender::new();
        let notification_service = Arc::new(NotificationService::new(
            Arc::new(sender.clone()),
            TemplateRenderer::new().unwrap(),
        ));
        let usecase = ReminderUseCaseImpl::new(
            Arc::new(repo.clone()),
            notification_service,
            Arc::new(FixedClock::new(now)),
            policy,
        );
        (repo, sender, usecase)
    }

    fn setup_at(
        now: DateTime<Utc>,
    ) -> (MockBookingRepository, MockNotificationSender, ReminderUseCaseImpl) {
        setup_with(now, ReminderPolicy::default())
    }

    fn setup() -> (MockBookingRepository, MockNotificationSender, ReminderUseCaseImpl) {
        setup_at(now())
    }

    #[tokio::test]
    async fn test_61分後の予約はクライアントとシッターの両方に送る() {
        // Given
        let (repo, sender, usecase) = setup();
        let entry = booking_at(
            date(1),
            15,
            1,
            Some("sara@example.com"),
            Some("ayesha@example.com"),
        );
        let id = *entry.booking.id();
        repo.add_booking(entry);

        // When
        let summary = usecase.run().await.unwrap();

        // Then
        assert_eq!(summary, ReminderRunSummary { sent: 1, marked: 1 });
        let recipients: Vec<String> = sender.sent_emails().into_iter().map(|e| e.to).collect();
        assert_eq!(recipients, vec!["sara@example.com", "ayesha@example.com"]);
        assert!(repo.is_reminder_sent(&id));
    }

    #[rstest]
    #[case::already_started(13, 0, false)]
    #[case::exactly_30_minutes(14, 30, false)]
    #[case::within_31_minutes(14, 31, true)]
    #[case::exactly_90_minutes(15, 30, true)]
    #[case::beyond_95_minutes(15, 35, false)]
    #[tokio::test]
    async fn test_ウィンドウ境界の判定(#[case] hour: u32, #[case] min: u32, #[case] due: bool) {
        let (repo, sender, usecase) = setup();
        let entry = booking_at(date(1), hour, min, Some("sara@example.com"), None);
        let id = *entry.booking.id();
        repo.add_booking(entry);

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary.sent, usize::from(due));
        assert_eq!(sender.sent_emails().len(), usize::from(due));
        assert_eq!(repo.is_reminder_sent(&id), due);
    }

    #[tokio::test]
    async fn test_対象n件のidを1回のupdateでまとめて記録する() {
        let (repo, _sender, usecase) = setup();
        let first = booking_at(date(1), 14, 45, Some("a@example.com"), None);
        let second = booking_at(date(1), 15, 0, None, Some("b@example.com"));
        let third = booking_at(date(1), 15, 20, Some("c@example.com"), Some("d@example.com"));
        let outside = booking_at(date(1), 18, 0, Some("e@example.com"), None);
        let expected = vec![*first.booking.id(), *second.booking.id(), *third.booking.id()];
        for entry in [first, second, third, outside] {
            repo.add_booking(entry);
        }

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary.sent, 3);
        assert_eq!(repo.mark_calls(), vec![expected]);
    }

    #[tokio::test]
    async fn test_対象が0件ならupdateしない() {
        let (repo, sender, usecase) = setup();
        repo.add_booking(booking_at(date(2), 15, 0, Some("sara@example.com"), None));

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary, ReminderRunSummary { sent: 0, marked: 0 });
        assert!(repo.mark_calls().is_empty());
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_取得結果が空でもsent0を返す() {
        let (repo, _sender, usecase) = setup();

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary.sent, 0);
        assert!(repo.mark_calls().is_empty());
    }

    #[tokio::test]
    async fn test_直後の再実行では追加送信しない() {
        let (repo, sender, usecase) = setup();
        repo.add_booking(booking_at(date(1), 15, 0, Some("sara@example.com"), None));

        let first = usecase.run().await.unwrap();
        let second = usecase.run().await.unwrap();

        assert_eq!(first.sent, 1);
        assert_eq!(second.sent, 0);
        assert_eq!(sender.sent_emails().len(), 1);
        assert_eq!(repo.mark_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_宛先が無い対象予約も送信済みとして数える() {
        let (repo, sender, usecase) = setup();
        let entry = booking_at(date(1), 15, 0, None, None);
        let id = *entry.booking.id();
        repo.add_booking(entry);

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary.sent, 1);
        assert!(sender.sent_emails().is_empty());
        assert!(repo.is_reminder_sent(&id));
    }

    #[tokio::test]
    async fn test_ローカル日付が翌日になる時間帯も判定できる() {
        // 2024-05-01 20:00 UTC = 2024-05-02 01:00 ローカル
        let (repo, sender, usecase) = setup_at(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
        repo.add_booking(booking_at(date(2), 2, 0, Some("sara@example.com"), None));

        let summary = usecase.run().await.unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(sender.sent_emails().len(), 1);
    }

    #[tokio::test]
    async fn test_負のオフセットでローカル日付が前日でも対象予約を送る() {
        // Given: -05:00、2024-05-02 01:00 UTC = 2024-05-01 20:00 ローカル
        let policy =
            ReminderPolicy::new(FixedOffset::west_opt(5 * 3600).unwrap(), ReminderWindow::default());
        let (repo, sender, usecase) =
            setup_with(Utc.with_ymd_and_hms(2024, 5, 2, 1, 0, 0).unwrap(), policy);
        let entry = booking_at(date(1), 21, 0, Some("sara@example.com"), None);
        let id = *entry.booking.id();
        repo.add_booking(entry);

        // When
        let summary = usecase.run().await.unwrap();

        // Then: 残り 60 分の予約として送信・記録される
        assert_eq!(summary, ReminderRunSummary { sent: 1, marked: 1 });
        assert_eq!(sender.sent_emails().len(), 1);
        assert!(repo.is_reminder_sent(&id));
    }

    #[tokio::test]
    async fn test_送信失敗時はそれまでの予約だけ記録してエラーを返す() {
        // Given: 2 件目の予約のシッター宛て送信が失敗する
        let (repo, sender, usecase) = setup();
        let first = booking_at(date(1), 14, 45, Some("a@example.com"), None);
        let failing = booking_at(date(1), 15, 0, Some("b@example.com"), Some("down@example.com"));
        let later = booking_at(date(1), 15, 15, Some("c@example.com"), None);
        let first_id = *first.booking.id();
        let failing_id = *failing.booking.id();
        let later_id = *later.booking.id();
        for entry in [first, failing, later] {
            repo.add_booking(entry);
        }
        sender.fail_for("down@example.com");

        // When
        let result = usecase.run().await;

        // Then
        assert!(matches!(result, Err(NotifierError::Notification(_))));
        assert_eq!(repo.mark_calls(), vec![vec![first_id]]);
        assert!(repo.is_reminder_sent(&first_id));
        assert!(!repo.is_reminder_sent(&failing_id));
        assert!(!repo.is_reminder_sent(&later_id));
        let recipients: Vec<String> = sender.sent_emails().into_iter().map(|e| e.to).collect();
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_取得失敗はエラーで送信もupdateもしない() {
        let (repo, sender, usecase) = setup();
        repo.add_booking(booking_at(date(1), 15, 0, Some("sara@example.com"), None));
        repo.fail_fetch();

        let result = usecase.run().await;

        assert!(matches!(result, Err(NotifierError::Database(_))));
        assert!(sender.sent_emails().is_empty());
        assert!(repo.mark_calls().is_empty());
    }

    #[tokio::test]
    async fn test_update失敗はエラーになる() {
        let (repo, _sender, usecase) = setup();
        repo.add_booking(booking_at(date(1), 15, 0, Some("sara@example.com"), None));
        repo.fail_update();

        let result = usecase.run().await;

        assert!(matches!(result, Err(NotifierError::Database(_))));
        assert_eq!(repo.mark_calls().len(), 1);
    }
}
