//! # maildispatch インフラ層
//!
//! 外部のメール配送バックエンドとの通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層の [`ResolvedMail`](maildispatch_domain::ResolvedMail) を
//! 受け取り、実際の配送手段（HTTP API、SMTP）に変換する。プロトコルの詳細は
//! `reqwest` と `lettre` に委ね、ここでは設定値の受け渡しとエラーの変換のみを行う。
//!
//! ## 依存関係
//!
//! ```text
//! mailer → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`mail_transport`] - 配送トレイトと Resend / SMTP 実装
//! - `mock` - テスト用モック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use maildispatch_infra::mail_transport::{MailTransport, ResendSettings, ResendTransport};
//!
//! let transport = ResendTransport::new(ResendSettings {
//!     api_key: "re_xxx".to_string(),
//!     api_url: None,
//! });
//! transport.deliver(&resolved_mail).await?;
//! ```

pub mod mail_transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use mail_transport::MailTransport;
