//! # 通知ユースケース
//!
//! 予約イベントに伴うメール通知の生成と送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - テンプレートレンダリング + 送信 + イベントログの統合サービス

pub mod service;
pub mod template_renderer;

pub use service::NotificationService;
pub use template_renderer::TemplateRenderer;
