//! # Sitter Pro Notifier サーバー
//!
//! 予約確認・メッセージ通知・開始前リマインダーのメールを送る HTTP サービス。
//!
//! ## 呼び出し元
//!
//! ```text
//! ┌──────────────┐  INSERT Webhook   ┌──────────────┐     ┌──────────────┐
//! │  PostgreSQL  │──────────────────→│   Notifier   │────→│     SMTP     │
//! └──────────────┘                   └──────────────┘     └──────────────┘
//!                                           ↑
//!                                    GET /send-reminders
//!                                           │
//!                                    ┌──────────────┐
//!                                    │  外部 cron   │
//!                                    └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFIER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `NOTIFIER_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `RUN_MIGRATIONS` | No | 起動時にマイグレーションを適用する（`true` / `false`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` または `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP サーバー（デフォルト: `smtp.gmail.com:587`） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 認証情報 |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//! | `REMINDER_UTC_OFFSET_MINUTES` | No | ローカル時刻のオフセット（デフォルト: `300`） |
//! | `REMINDER_WINDOW_LOWER_MINUTES` / `REMINDER_WINDOW_UPPER_MINUTES` | No | 送信ウィンドウ（デフォルト: `30` / `90`） |
//! | `REMINDER_INTERVAL_SECS` | No | 設定時のみプロセス内で定期実行 |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo run -p sitterpro-notifier
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use sitterpro_domain::clock::SystemClock;
use sitterpro_infra::{
    db,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{
        PostgresBookingRepository,
        PostgresClientRepository,
        PostgresSitterProfileRepository,
    },
};
use sitterpro_notifier::{
    app_builder::{AppDependencies, build_app},
    config::{NotificationBackend, NotifierConfig},
    ticker::spawn_reminder_ticker,
    usecase::{
        ReminderUseCaseImpl,
        notification::{NotificationService, TemplateRenderer},
    },
};
use sitterpro_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("notifier");
    init_tracing(tracing_config.clone());
    let _tracing_guard = tracing_config.app_span().entered();

    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Notifier サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続
    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    if config.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("マイグレーションの適用に失敗しました")?;
        tracing::info!("マイグレーションを適用しました");
    }

    // 通知送信の初期化
    let sender: Arc<dyn NotificationSender> = match config.notification.backend {
        NotificationBackend::Smtp => Arc::new(
            SmtpNotificationSender::new(config.notification.smtp_settings())
                .context("SMTP 送信の初期化に失敗しました")?,
        ),
        NotificationBackend::Noop => Arc::new(NoopNotificationSender),
    };
    tracing::info!(backend = ?config.notification.backend, "通知送信を初期化しました");

    let template_renderer =
        TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?;
    let notification_service = Arc::new(NotificationService::new(sender, template_renderer));

    // 依存コンポーネントの初期化
    let reminder_usecase = Arc::new(ReminderUseCaseImpl::new(
        Arc::new(PostgresBookingRepository::new(pool.clone())),
        notification_service.clone(),
        Arc::new(SystemClock),
        config.reminder.policy,
    ));

    if let Some(period) = config.reminder.interval {
        spawn_reminder_ticker(reminder_usecase.clone(), period);
        tracing::info!(period_secs = period.as_secs(), "リマインダーの定期実行を開始しました");
    }

    let app = build_app(AppDependencies {
        client_repo: Arc::new(PostgresClientRepository::new(pool.clone())),
        sitter_repo: Arc::new(PostgresSitterProfileRepository::new(pool)),
        notification_service,
        reminder_usecase,
    });

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notifier サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
