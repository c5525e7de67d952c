//! # メールトランスポート
//!
//! 解決済みメールを外部バックエンドへ配送するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait で配送方法を抽象化
//! - **2 つの実装**: Resend（ホスト型 API）、SMTP
//! - **設定値による切替**: どの実装を使うかは `MAIL_TYPE` で起動時に 1 度だけ決まる
//!   （選択ロジックは `maildispatch-mailer` の `MailService::initialize` に集約）

mod resend;
mod smtp;

use async_trait::async_trait;
use maildispatch_domain::mail::{ResolvedMail, TransportError};
pub use resend::{DEFAULT_RESEND_API_URL, ResendSettings, ResendTransport};
pub use smtp::{SmtpSettings, SmtpTlsMode, SmtpTransport};

/// メール配送トレイト
///
/// 起動後は複数の呼び出し元から同時に使われるため、`Send + Sync` を要求する。
/// 実装は呼び出しごとに独立しており、呼び出し間で可変状態を共有しない。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// 解決済みメールを 1 通配送する
    ///
    /// 失敗はリトライせず、そのまま [`TransportError`] として返す。
    async fn deliver(&self, mail: &ResolvedMail) -> Result<(), TransportError>;

    /// ログ出力用のバックエンド名
    fn backend_name(&self) -> &'static str;
}
