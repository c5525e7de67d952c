//! # メールサービスのエラー定義
//!
//! `MailService` の初期化と送信で発生するエラーを定義する。
//!
//! ## エラーの種類
//!
//! | エラー種別 | 発生箇所 | 対処 |
//! |-----------|---------|------|
//! | `Config` | `initialize` | 設定を修正して再起動する |
//! | `AlreadyInitialized` | `initialize` | 呼び出し順の不具合（初期化は 1 度だけ） |
//! | `NotInitialized` | `send` | 呼び出し順の不具合、またはメール送信が無効 |
//! | `Validation` | `send` | 入力を修正して再送する |
//! | `Transport` | `send` | バックエンドのエラー（解釈・リトライしない） |

use maildispatch_domain::mail::{MailValidationError, TransportError};
use thiserror::Error;

use crate::config::MailConfigError;

/// メールサービスで発生するエラー
#[derive(Debug, Error)]
pub enum MailServiceError {
    /// 設定の欠落・矛盾
    #[error(transparent)]
    Config(#[from] MailConfigError),

    /// 初期化済みのサービスを再度初期化しようとした
    #[error("mail client is already initialized")]
    AlreadyInitialized,

    /// トランスポートが構築されていない
    #[error("mail client is not initialized")]
    NotInitialized,

    /// 送信依頼の必須項目の欠落
    #[error(transparent)]
    Validation(#[from] MailValidationError),

    /// バックエンドでの配送失敗
    #[error(transparent)]
    Transport(#[from] TransportError),
}
