//! # Notifier 設定
//!
//! 環境変数から通知サービスの設定を読み込む。
//!
//! 読み取りは `from_lookup` に渡した関数経由で行うため、テストでは
//! プロセスの環境変数を書き換えずに任意の値を与えられる。

use std::{env, time::Duration};

use sitterpro_domain::{
    DomainError,
    reminder::{
        DEFAULT_UTC_OFFSET_MINUTES,
        DEFAULT_WINDOW_LOWER_MINUTES,
        DEFAULT_WINDOW_UPPER_MINUTES,
        ReminderPolicy,
        ReminderWindow,
    },
};
use sitterpro_infra::notification::SmtpSettings;
use thiserror::Error;

/// 送信元アドレスの最終フォールバック
const DEFAULT_FROM_ADDRESS: &str = "noreply@sitterpro.example.com";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("リマインダー設定が不正です: {0}")]
    Reminder(#[from] DomainError),
}

/// Notifier サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host:           String,
    /// ポート番号
    pub port:           u16,
    /// データベース接続 URL
    pub database_url:   String,
    /// 起動時にマイグレーションを適用するか
    pub run_migrations: bool,
    /// 通知設定
    pub notification:   NotificationConfig,
    /// リマインダー設定
    pub reminder:       ReminderConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    Smtp,
    Noop,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
///
/// `SMTP_USERNAME` と `SMTP_PASSWORD` は両方設定するか両方省略する。
/// 片方だけの場合は認証なしの平文接続に落ちないよう起動時にエラーにする。
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:       NotificationBackend,
    pub smtp_host:     String,
    pub smtp_port:     u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// 送信元メールアドレス
    pub from_address:  String,
}

/// リマインダー実行の設定
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    pub policy:   ReminderPolicy,
    /// 設定時のみプロセス内で定期実行する
    pub interval: Option<Duration>,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の読み取り関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host:           get("NOTIFIER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:           parse_or("NOTIFIER_PORT", get("NOTIFIER_PORT"), 3000)?,
            database_url:   get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            run_migrations: parse_bool("RUN_MIGRATIONS", get("RUN_MIGRATIONS"))?,
            notification:   NotificationConfig::from_lookup(&get)?,
            reminder:       ReminderConfig::from_lookup(&get)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match get("NOTIFICATION_BACKEND").as_deref() {
            None | Some("noop") => NotificationBackend::Noop,
            Some("smtp") => NotificationBackend::Smtp,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name:  "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let smtp_username = get("SMTP_USERNAME");
        let smtp_password = get("SMTP_PASSWORD");
        match (&smtp_username, &smtp_password) {
            (Some(_), None) => {
                return Err(ConfigError::Invalid {
                    name:  "SMTP_PASSWORD",
                    value: String::new(),
                });
            }
            (None, Some(_)) => {
                // パスワードは値をエラーメッセージに含めない
                return Err(ConfigError::Invalid {
                    name:  "SMTP_USERNAME",
                    value: String::new(),
                });
            }
            _ => {}
        }

        let from_address = get("NOTIFICATION_FROM_ADDRESS")
            .or_else(|| smtp_username.clone())
            .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());

        Ok(Self {
            backend,
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_port: parse_or("SMTP_PORT", get("SMTP_PORT"), 587)?,
            smtp_username,
            smtp_password,
            from_address,
        })
    }

    /// SMTP 送信実装に渡す設定
    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host:         self.smtp_host.clone(),
            port:         self.smtp_port,
            username:     self.smtp_username.clone(),
            password:     self.smtp_password.clone(),
            from_address: self.from_address.clone(),
        }
    }
}

impl ReminderConfig {
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let offset_minutes: i32 = parse_or(
            "REMINDER_UTC_OFFSET_MINUTES",
            get("REMINDER_UTC_OFFSET_MINUTES"),
            DEFAULT_UTC_OFFSET_MINUTES,
        )?;
        let lower: i64 = parse_or(
            "REMINDER_WINDOW_LOWER_MINUTES",
            get("REMINDER_WINDOW_LOWER_MINUTES"),
            DEFAULT_WINDOW_LOWER_MINUTES,
        )?;
        let upper: i64 = parse_or(
            "REMINDER_WINDOW_UPPER_MINUTES",
            get("REMINDER_WINDOW_UPPER_MINUTES"),
            DEFAULT_WINDOW_UPPER_MINUTES,
        )?;

        let window = ReminderWindow::from_minutes(lower, upper)?;
        let policy = ReminderPolicy::with_offset_minutes(offset_minutes, window)?;

        let interval = match get("REMINDER_INTERVAL_SECS") {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        name:  "REMINDER_INTERVAL_SECS",
                        value: raw,
                    });
                }
            },
        };

        Ok(Self { policy, interval })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(false),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            name,
            value: raw.clone().unwrap_or_default(),
        }),
    }
}
