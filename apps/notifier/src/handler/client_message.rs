//! # メッセージ通知ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /send-client-message` - メッセージ INSERT の Webhook

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sitterpro_domain::message::Message;
use sitterpro_shared::SuccessResponse;

use super::webhook::{MessageRecord, parse_record};
use crate::{
    error::NotifierError,
    usecase::{ClientMessageUseCaseImpl, NotifyOutcome},
};

/// メッセージ通知ハンドラの共有状態
pub struct ClientMessageState {
    pub usecase: ClientMessageUseCaseImpl,
}

/// POST /send-client-message
///
/// 受信者のメールアドレスが無い場合はプレーンテキスト `No Email` を 200 で返す。
#[tracing::instrument(skip_all, fields(message_id = tracing::field::Empty))]
pub async fn send_client_message(
    State(state): State<Arc<ClientMessageState>>,
    body: Bytes,
) -> Result<Response, NotifierError> {
    let message = Message::from(parse_record::<MessageRecord>(&body)?);
    tracing::Span::current().record("message_id", tracing::field::display(message.id()));

    let response = match state.usecase.execute(&message).await? {
        NotifyOutcome::Sent => Json(SuccessResponse::ok()).into_response(),
        NotifyOutcome::MissingClientEmail => (StatusCode::OK, "No Email").into_response(),
    };

    Ok(response)
}
