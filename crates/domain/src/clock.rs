//! # Clock（時刻プロバイダ）
//!
//! リマインダー判定で使う「現在時刻」を注入可能にするための抽象化。
//! ユースケースから `Utc::now()` を直接呼ばず、テストでは [`FixedClock`] を渡す。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    /// 現在の UTC 時刻
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返すテスト用実装
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
