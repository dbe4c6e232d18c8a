//! # Sitter Pro 共有ユーティリティ
//!
//! 通知サービスと各クレートで共通に使うユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / notifier のいずれからも依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各アプリの責務）

pub mod api_response;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::SuccessResponse;
pub use error_response::ErrorResponse;
pub use health::HealthResponse;
