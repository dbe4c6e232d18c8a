//! # Notifier アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use sitterpro_infra::repository::{ClientRepository, SitterProfileRepository};
use sitterpro_shared::observability::make_request_span;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        BookingConfirmationState,
        ClientMessageState,
        ReminderState,
        health_check,
        send_booking_confirmation,
        send_client_message,
        send_reminders,
    },
    usecase::{
        BookingConfirmationUseCaseImpl,
        ClientMessageUseCaseImpl,
        ReminderUseCaseImpl,
        notification::NotificationService,
    },
};

/// ルーターの構築に必要な依存
///
/// リマインダーユースケースは定期実行タスクと共有するため構築済みのものを受け取る。
pub struct AppDependencies {
    pub client_repo:          Arc<dyn ClientRepository>,
    pub sitter_repo:          Arc<dyn SitterProfileRepository>,
    pub notification_service: Arc<NotificationService>,
    pub reminder_usecase:     Arc<ReminderUseCaseImpl>,
}

/// State の組み立てとルーター定義を行う
pub fn build_app(deps: AppDependencies) -> Router {
    let confirmation_state = Arc::new(BookingConfirmationState {
        usecase: BookingConfirmationUseCaseImpl::new(
            deps.client_repo.clone(),
            deps.sitter_repo.clone(),
            deps.notification_service.clone(),
        ),
    });

    let message_state = Arc::new(ClientMessageState {
        usecase: ClientMessageUseCaseImpl::new(
            deps.client_repo,
            deps.sitter_repo,
            deps.notification_service,
        ),
    });

    let reminder_state = Arc::new(ReminderState {
        usecase: deps.reminder_usecase,
    });

    Router::new()
        .route("/health", get(health_check))
        // 予約 INSERT Webhook
        .route("/send-booking-confirmation", post(send_booking_confirmation))
        .with_state(confirmation_state)
        // メッセージ INSERT Webhook
        .route("/send-client-message", post(send_client_message))
        .with_state(message_state)
        // 外部 cron（GET / POST どちらでも受け付ける）
        .route("/send-reminders", get(send_reminders).post(send_reminders))
        .with_state(reminder_state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}
