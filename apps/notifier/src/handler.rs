//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、通知ロジックはユースケースに委譲
//! - Webhook ペイロードは extractor ではなくハンドラ内で解析し、
//!   解析失敗も他のエラーと同じ 500 レスポンスにする

pub mod booking_confirmation;
pub mod client_message;
pub mod health;
pub mod reminders;
pub mod webhook;

pub use booking_confirmation::{BookingConfirmationState, send_booking_confirmation};
pub use client_message::{ClientMessageState, send_client_message};
pub use health::health_check;
pub use reminders::{ReminderState, send_reminders};
