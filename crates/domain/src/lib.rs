//! # maildispatch ドメイン層
//!
//! メール送信の中核となるドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! mailer → infra → domain
//! ```
//!
//! ドメイン層はトランスポート（HTTP、SMTP）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`mail`] - 送信依頼、解決済みメール、検証エラー、配送エラー
//!
//! ## 使用例
//!
//! ```rust
//! use maildispatch_domain::mail::{MailMessage, MailValidationError};
//!
//! let resolved = MailMessage::new("user@example.com", "件名", "<p>本文</p>")
//!     .resolve(Some("noreply@example.com"))
//!     .unwrap();
//! assert_eq!(resolved.from(), "noreply@example.com");
//!
//! let error = MailMessage::new("", "件名", "<p>本文</p>")
//!     .resolve(Some("noreply@example.com"))
//!     .unwrap_err();
//! assert_eq!(error, MailValidationError::MissingTo);
//! ```

pub mod mail;

pub use mail::{MailMessage, MailValidationError, ResolvedMail, TransportError};
