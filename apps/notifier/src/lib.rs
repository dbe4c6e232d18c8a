//! # Sitter Pro Notifier ライブラリ
//!
//! 通知ハンドラ・ユースケース・ルーター構築を公開する。
//! `main.rs` と統合テストの両方から利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod ticker;
pub mod usecase;
