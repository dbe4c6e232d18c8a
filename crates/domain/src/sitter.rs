//! # シッタープロフィール
//!
//! 予約を担当するシッター。DB 上は `user_profiles` テーブルに格納される。
//!
//! 確認メール・メッセージ通知ではシッター名の解決はベストエフォートで、
//! 見つからない場合はプレースホルダー名で送信を続行する。

use crate::contact::ContactInfo;

define_uuid_id! {
    /// シッター ID（`user_profiles.id`）
    pub struct SitterId;
}

/// シッタープロフィール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitterProfile {
    id:      SitterId,
    contact: ContactInfo,
}

impl SitterProfile {
    /// DB の行からシッタープロフィールを復元する
    pub fn from_db(id: SitterId, email: Option<String>, full_name: Option<String>) -> Self {
        Self {
            id,
            contact: ContactInfo::new(email, full_name),
        }
    }

    pub fn id(&self) -> &SitterId {
        &self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.contact.email()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.contact.full_name()
    }
}
