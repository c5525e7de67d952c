//! # maildispatch メーラー
//!
//! 設定に応じて配送バックエンド（Resend / SMTP）を 1 つ選び、
//! 単一の `send` 操作でメールを送信するサービスを提供する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use maildispatch_domain::mail::MailMessage;
//! use maildispatch_mailer::{config::MailConfig, service::MailService};
//!
//! // 起動時に 1 度だけ初期化する
//! let config = MailConfig::from_env()?;
//! let mut service = MailService::new();
//! service.initialize(&config)?;
//! let service = Arc::new(service);
//!
//! // 以降は共有して送信する
//! service
//!     .send(MailMessage::new("user@example.com", "ようこそ", "<p>登録ありがとうございます</p>"))
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::{MailConfig, MailConfigError, MailType};
pub use error::MailServiceError;
pub use service::MailService;
