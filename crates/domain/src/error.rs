//! # ドメイン層エラー定義
//!
//! ドメインモデルの生成時に検出されるルール違反を表現する。
//!
//! 通知送信に関するエラーは [`crate::notification::NotificationError`] に分離している。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 設定値やドメインオブジェクトの生成パラメータが不正な場合に使用する。
    ///
    /// # 例
    ///
    /// - リマインダーウィンドウの下限が上限以上
    /// - UTC オフセットが ±24 時間の範囲外
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
