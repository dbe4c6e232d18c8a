//! # ユースケース層
//!
//! 通知ハンドラのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・送信実装・時刻を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラはペイロード解析とレスポンス変換のみを行う
//!
//! ## モジュール構成
//!
//! - `booking_confirmation`: 予約確認メール
//! - `client_message`: メッセージ通知メール
//! - `reminder`: 開始前リマインダーの一括送信
//! - `notification`: テンプレートレンダリングと送信

pub mod booking_confirmation;
pub mod client_message;
pub mod notification;
pub mod reminder;

pub use booking_confirmation::BookingConfirmationUseCaseImpl;
pub use client_message::ClientMessageUseCaseImpl;
pub use reminder::{ReminderRunSummary, ReminderUseCaseImpl};
use sitterpro_domain::sitter::SitterId;
use sitterpro_infra::repository::SitterProfileRepository;

/// 単発通知の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// メールを送信した
    Sent,
    /// クライアントまたはそのメールアドレスが見つからず送信しなかった
    MissingClientEmail,
}

/// シッターの表示名を解決する
///
/// 参照が無い場合・見つからない場合・検索に失敗した場合は `None` を返す。
/// 呼び出し側はプレースホルダーにフォールバックして送信を続ける。
pub(crate) async fn resolve_sitter_name(
    sitter_repo: &dyn SitterProfileRepository,
    sitter_id: Option<&SitterId>,
) -> Option<String> {
    let sitter_id = sitter_id?;
    match sitter_repo.find_by_id(sitter_id).await {
        Ok(sitter) => sitter.and_then(|s| s.full_name().map(str::to_string)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                sitter_id = %sitter_id,
                "シッター情報の取得に失敗したためプレースホルダー名を使用"
            );
            None
        }
    }
}
