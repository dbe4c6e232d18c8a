//! # Sitter Pro ドメイン層
//!
//! 予約通知サービスの中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: DB やメール送信には一切依存しない
//! - **エンティティ**: 予約（Booking）、クライアント（Client）、シッター（SitterProfile）、
//!   メッセージ（Message）
//! - **リマインダーポリシー**: 固定オフセットによるローカル時刻換算と送信ウィンドウ判定
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//!     ↘                ↑
//!       ───────────────
//! ```
//!
//! ## モジュール構成
//!
//! - [`booking`] - 予約エンティティ
//! - [`client`] - クライアント
//! - [`sitter`] - シッタープロフィール
//! - [`contact`] - 連絡先（メールアドレス + 表示名）
//! - [`message`] - チャットメッセージ
//! - [`reminder`] - リマインダー送信ウィンドウと固定オフセット
//! - [`notification`] - メール通知のドメイン型
//! - [`clock`] - 現在時刻プロバイダ
//! - [`error`] - ドメインエラー

#[macro_use]
mod macros;

pub mod booking;
pub mod client;
pub mod clock;
pub mod contact;
pub mod error;
pub mod message;
pub mod notification;
pub mod reminder;
pub mod sitter;

pub use error::DomainError;
