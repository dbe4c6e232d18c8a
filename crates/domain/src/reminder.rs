//! # リマインダーポリシー
//!
//! 「開始の約 1 時間前」に一度だけリマインダーを送るための判定ロジック。
//!
//! ## 判定手順
//!
//! 1. 現在の UTC 時刻に固定オフセットを加えてローカル時刻に換算する
//!    （タイムゾーン DB は使わず、夏時間も考慮しない）
//! 2. 予約の開始日時（タイムゾーンなし）から換算後の現在時刻を引く
//! 3. 差分が送信ウィンドウ `(lower, upper]` に入っていれば送信対象
//!
//! 候補の取得は [`ReminderPolicy::fetch_from`] 以降の開始日に絞る。
//! UTC 暦日とローカル暦日の早い方を使うので、オフセットの符号によらず
//! ウィンドウに入る予約が取得条件で落ちることはない。
//!
//! デフォルトはオフセット +05:00、ウィンドウ `(30 分, 90 分]`。
//! 定期実行が 1 回丸ごと抜けると、ウィンドウを素通りする予約が出る。
//! 固定ウィンドウ方式の既知の制約として受け入れている。

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, Utc};

use crate::{DomainError, booking::Booking};

/// デフォルトの UTC オフセット（分）: +05:00
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 5 * 60;

/// デフォルトのウィンドウ下限（分、この値は含まない）
pub const DEFAULT_WINDOW_LOWER_MINUTES: i64 = 30;

/// デフォルトのウィンドウ上限（分、この値を含む）
pub const DEFAULT_WINDOW_UPPER_MINUTES: i64 = 90;

/// リマインダー送信ウィンドウ
///
/// 開始までの残り時間 `d` が `lower < d <= upper` を満たすとき送信対象とする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    lower_exclusive: TimeDelta,
    upper_inclusive: TimeDelta,
}

impl ReminderWindow {
    /// 分単位の下限・上限からウィンドウを作成する
    ///
    /// # エラー
    ///
    /// 下限が上限以上の場合、または値が表現可能な範囲を超える場合は
    /// `DomainError::Validation` を返す。
    pub fn from_minutes(lower_exclusive: i64, upper_inclusive: i64) -> Result<Self, DomainError> {
        if lower_exclusive >= upper_inclusive {
            return Err(DomainError::Validation(format!(
                "リマインダーウィンドウの下限（{lower_exclusive} 分）は上限（{upper_inclusive} 分）より小さい必要があります"
            )));
        }

        let to_delta = |minutes: i64| {
            TimeDelta::try_minutes(minutes).ok_or_else(|| {
                DomainError::Validation(format!("リマインダーウィンドウの値が大きすぎます: {minutes} 分"))
            })
        };

        Ok(Self {
            lower_exclusive: to_delta(lower_exclusive)?,
            upper_inclusive: to_delta(upper_inclusive)?,
        })
    }

    /// 残り時間がウィンドウ内かどうか
    pub fn contains(&self, until_start: TimeDelta) -> bool {
        until_start > self.lower_exclusive && until_start <= self.upper_inclusive
    }

    pub fn lower_exclusive(&self) -> TimeDelta {
        self.lower_exclusive
    }

    pub fn upper_inclusive(&self) -> TimeDelta {
        self.upper_inclusive
    }
}

impl Default for ReminderWindow {
    fn default() -> Self {
        Self {
            lower_exclusive: TimeDelta::minutes(DEFAULT_WINDOW_LOWER_MINUTES),
            upper_inclusive: TimeDelta::minutes(DEFAULT_WINDOW_UPPER_MINUTES),
        }
    }
}

/// リマインダーポリシー
///
/// 固定オフセットと送信ウィンドウの組。1 回の実行の間は不変。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    offset: FixedOffset,
    window: ReminderWindow,
}

impl ReminderPolicy {
    pub fn new(offset: FixedOffset, window: ReminderWindow) -> Self {
        Self { offset, window }
    }

    /// 分単位の UTC オフセットからポリシーを作成する
    ///
    /// # エラー
    ///
    /// オフセットが ±24 時間の範囲外なら `DomainError::Validation` を返す。
    pub fn with_offset_minutes(
        offset_minutes: i32,
        window: ReminderWindow,
    ) -> Result<Self, DomainError> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "UTC オフセットが範囲外です: {offset_minutes} 分"
                ))
            })?;

        Ok(Self::new(offset, window))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn window(&self) -> ReminderWindow {
        self.window
    }

    /// UTC 時刻を固定オフセットでローカル時刻に換算する
    pub fn local_now(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.offset).naive_local()
    }

    /// 候補取得の下限となる開始日
    ///
    /// UTC 暦日とローカル暦日のうち早い方。負のオフセットではローカル暦日が
    /// UTC より前日になるため、UTC 暦日だけで絞ると対象の予約を取りこぼす。
    pub fn fetch_from(&self, now: DateTime<Utc>) -> NaiveDate {
        now.date_naive().min(self.local_now(now).date())
    }

    /// 予約開始までの残り時間（符号付き、開始済みなら負）
    pub fn time_until_start(&self, booking: &Booking, now: DateTime<Utc>) -> TimeDelta {
        booking.starts_at() - self.local_now(now)
    }

    /// 今回の実行でリマインダーを送るべきか
    pub fn is_due(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        self.window.contains(self.time_until_start(booking, now))
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        // DEFAULT_UTC_OFFSET_MINUTES は常に ±24 時間の範囲内
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix());

        Self {
            offset,
            window: ReminderWindow::default(),
        }
    }
}

/// 残り時間を分（小数）で返す（ログ出力用）
pub fn as_fractional_minutes(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 60_000.0
}
