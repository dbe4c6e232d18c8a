//! # リポジトリ実装
//!
//! 通知サービスが参照・更新するテーブルへのアクセスを提供する。
//!
//! - **トレイトで抽象化**: ユースケースは `Arc<dyn XxxRepository>` 経由で利用し、
//!   テストではインメモリのモックに差し替える
//! - **実行時クエリ**: `sqlx::query_as` + `FromRow` の行型でマッピングする
//! - **書き込みは予約のリマインダーフラグのみ**

pub mod booking_repository;
pub mod client_repository;
pub mod sitter_profile_repository;

pub use booking_repository::{BookingRepository, PostgresBookingRepository};
pub use client_repository::{ClientRepository, PostgresClientRepository};
pub use sitter_profile_repository::{PostgresSitterProfileRepository, SitterProfileRepository};
