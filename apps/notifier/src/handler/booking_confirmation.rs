//! # 予約確認ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /send-booking-confirmation` - 予約 INSERT の Webhook

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sitterpro_domain::booking::Booking;
use sitterpro_shared::SuccessResponse;

use super::webhook::{BookingRecord, parse_record};
use crate::{
    error::NotifierError,
    usecase::{BookingConfirmationUseCaseImpl, NotifyOutcome},
};

/// 予約確認ハンドラの共有状態
pub struct BookingConfirmationState {
    pub usecase: BookingConfirmationUseCaseImpl,
}

/// POST /send-booking-confirmation
///
/// ## レスポンス
///
/// - `200 OK` `{"success": true}`: 確認メールを送信した
/// - `200 OK` `No email found`（プレーンテキスト）: クライアントのメールアドレスが無い
/// - `500 Internal Server Error` `{"error": "..."}`: ペイロード不正・検索失敗・送信失敗
#[tracing::instrument(skip_all, fields(booking_id = tracing::field::Empty))]
pub async fn send_booking_confirmation(
    State(state): State<Arc<BookingConfirmationState>>,
    body: Bytes,
) -> Result<Response, NotifierError> {
    let booking = Booking::from(parse_record::<BookingRecord>(&body)?);
    tracing::Span::current().record("booking_id", tracing::field::display(booking.id()));

    let response = match state.usecase.execute(&booking).await? {
        NotifyOutcome::Sent => Json(SuccessResponse::ok()).into_response(),
        NotifyOutcome::MissingClientEmail => (StatusCode::OK, "No email found").into_response(),
    };

    Ok(response)
}
