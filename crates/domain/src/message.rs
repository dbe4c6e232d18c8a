//! # チャットメッセージ
//!
//! シッターからクライアントへ送られたメッセージ（`communications` テーブル）。
//! 受信者は常にクライアント、送信者は常にシッターとしてモデル化する。
//! どちらの参照も Webhook の行では null になりうる。

use crate::{client::ClientId, sitter::SitterId};

define_uuid_id! {
    /// メッセージ ID（`communications.id`）
    pub struct MessageId;
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id:          MessageId,
    sender_id:   Option<SitterId>,
    receiver_id: Option<ClientId>,
    content:     String,
}

/// メッセージの生成パラメータ
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id:          MessageId,
    pub sender_id:   Option<SitterId>,
    pub receiver_id: Option<ClientId>,
    pub content:     String,
}

impl Message {
    pub fn new(params: NewMessage) -> Self {
        Self {
            id:          params.id,
            sender_id:   params.sender_id,
            receiver_id: params.receiver_id,
            content:     params.content,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn sender_id(&self) -> Option<&SitterId> {
        self.sender_id.as_ref()
    }

    pub fn receiver_id(&self) -> Option<&ClientId> {
        self.receiver_id.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
