//! # クライアント
//!
//! 予約を行う利用者。通知の主な受信者であり、このサービスからは読み取り専用。

use crate::contact::ContactInfo;

define_uuid_id! {
    /// クライアント ID（`clients.id`）
    pub struct ClientId;
}

/// クライアント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id:      ClientId,
    contact: ContactInfo,
}

impl Client {
    /// DB の行からクライアントを復元する
    pub fn from_db(id: ClientId, email: Option<String>, full_name: Option<String>) -> Self {
        Self {
            id,
            contact: ContactInfo::new(email, full_name),
        }
    }

    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// 送信可能なメールアドレス（未登録なら `None`）
    pub fn email(&self) -> Option<&str> {
        self.contact.email()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.contact.full_name()
    }
}
