//! # リマインダーハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /send-reminders`, `POST /send-reminders` - 外部 cron からの定期呼び出し
//!
//! リクエストボディは読まない。

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use sitterpro_shared::SuccessResponse;

use crate::{error::NotifierError, usecase::ReminderUseCaseImpl};

/// リマインダーハンドラの共有状態
///
/// ユースケースは定期実行タスクとも共有する。
pub struct ReminderState {
    pub usecase: Arc<ReminderUseCaseImpl>,
}

/// GET|POST /send-reminders
///
/// 成功時は `{"success": true, "sent": <予約件数>}` を返す。
#[tracing::instrument(skip_all)]
pub async fn send_reminders(
    State(state): State<Arc<ReminderState>>,
) -> Result<impl IntoResponse, NotifierError> {
    let summary = state.usecase.run().await?;

    tracing::info!(
        sent = summary.sent,
        marked = summary.marked,
        "リマインダー実行完了"
    );

    Ok(Json(SuccessResponse::with_sent(summary.sent)))
}
