//! # Notifier エラー定義
//!
//! 通知ハンドラで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! 呼び出し元（DB Webhook / cron）が見るのは成否だけなので、
//! どの種別も HTTP 500 と `{ "error": "<メッセージ>" }` に変換する。
//! 種別はログの `error.kind` で区別する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sitterpro_domain::notification::NotificationError;
use sitterpro_infra::InfraError;
use sitterpro_shared::{ErrorResponse, event_log::error as log_error};
use thiserror::Error;

/// Notifier で発生するエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Webhook ペイロードの解析に失敗
    #[error("不正なペイロード: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// メール送信・レンダリングの失敗
    #[error("{0}")]
    Notification(#[from] NotificationError),
}

impl NotifierError {
    fn category_and_kind(&self) -> (&'static str, &'static str) {
        match self {
            Self::InvalidPayload(_) => (
                log_error::category::REQUEST,
                log_error::kind::INVALID_PAYLOAD,
            ),
            Self::Database(_) => (
                log_error::category::INFRASTRUCTURE,
                log_error::kind::DATABASE,
            ),
            Self::Notification(_) => (
                log_error::category::EXTERNAL_SERVICE,
                log_error::kind::NOTIFICATION,
            ),
        }
    }
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let (category, kind) = self.category_and_kind();

        if let Self::Database(e) = &self {
            tracing::error!(
                error.category = category,
                error.kind = kind,
                span_trace = %e.span_trace(),
                "{}",
                self
            );
        } else {
            tracing::error!(error.category = category, error.kind = kind, "{}", self);
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}
