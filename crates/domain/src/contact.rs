//! # 連絡先
//!
//! クライアントとシッターに共通する「メールアドレス + 表示名」を表現する。
//!
//! どちらのフィールドも DB 上は NULL を許容する。メールアドレスが空の場合は
//! 「連絡先なし」として扱い、通知をスキップする判断材料になる。

use serde::{Deserialize, Serialize};

/// 連絡先情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    email:     Option<String>,
    full_name: Option<String>,
}

impl ContactInfo {
    pub fn new(email: Option<String>, full_name: Option<String>) -> Self {
        Self { email, full_name }
    }

    /// 送信可能なメールアドレス
    ///
    /// NULL・空文字列・空白のみの場合は `None` を返す。
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// 表示名（空の場合は `None`）
    pub fn full_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
