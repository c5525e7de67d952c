//! # send-mail
//!
//! 環境変数で設定されたバックエンドを使い、メールを 1 通送信する CLI。
//! 設定項目は [`maildispatch_mailer::config`] を参照。
//!
//! ## 実行例
//!
//! ```bash
//! MAIL_TYPE=smtp SMTP_SERVER=localhost SMTP_PORT=1025 \
//!   MAIL_DEFAULT_SEND_FROM=noreply@example.com \
//!   cargo run -p maildispatch-mailer -- --to user@example.com --subject テスト --html '<p>本文</p>'
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use maildispatch_domain::mail::MailMessage;
use maildispatch_mailer::{MailConfig, MailService};
use maildispatch_shared::observability::{TracingConfig, init_tracing};

#[derive(Debug, Parser)]
#[command(name = "send-mail", about = "設定されたバックエンドでメールを 1 通送信する")]
struct Cli {
    /// 宛先メールアドレス
    #[arg(long)]
    to: String,

    /// 件名
    #[arg(long)]
    subject: String,

    /// HTML 本文
    #[arg(long, required_unless_present = "html_file", conflicts_with = "html_file")]
    html: Option<String>,

    /// HTML 本文を読み込むファイル
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// 送信元メールアドレス（省略時は MAIL_DEFAULT_SEND_FROM）
    #[arg(long)]
    from: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&TracingConfig::from_env()).context("トレーシングの初期化に失敗しました")?;

    let config = MailConfig::from_env().context("メール設定の読み込みに失敗しました")?;
    let mut service = MailService::new();
    service
        .initialize(&config)
        .context("メールサービスの初期化に失敗しました")?;

    let html = match (cli.html, cli.html_file) {
        (Some(html), _) => html,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("HTML ファイルを読み込めません: {}", path.display()))?,
        (None, None) => anyhow::bail!("--html か --html-file のどちらかを指定してください"),
    };

    let mut message = MailMessage::new(cli.to, cli.subject, html);
    message.from = cli.from;

    service
        .send(message)
        .await
        .context("メールの送信に失敗しました")?;

    tracing::info!("送信が完了しました");
    Ok(())
}
