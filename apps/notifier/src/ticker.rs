//! # リマインダー定期実行
//!
//! `REMINDER_INTERVAL_SECS` が設定されている場合に、HTTP トリガーとは別に
//! プロセス内でリマインダーユースケースを一定間隔で実行する。
//!
//! 最初の実行は起動直後。前回の実行が間隔より長引いた場合は、
//! 取りこぼした分をまとめて実行せず次の間隔まで待つ。

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::Instrument;

use crate::usecase::ReminderUseCaseImpl;

/// 定期実行タスクを起動する
pub fn spawn_reminder_ticker(usecase: Arc<ReminderUseCaseImpl>, period: Duration) -> JoinHandle<()> {
    let span = tracing::info_span!("reminder_ticker", period_secs = period.as_secs());

    tokio::spawn(
        async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match usecase.run().await {
                    Ok(summary) => tracing::info!(
                        sent = summary.sent,
                        marked = summary.marked,
                        "定期リマインダー実行完了"
                    ),
                    Err(e) => tracing::error!(error = %e, "定期リマインダー実行に失敗"),
                }
            }
        }
        .instrument(span),
    )
}
