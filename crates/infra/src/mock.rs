//! # テスト用モックトランスポート
//!
//! サービステストで使用するインメモリのトランスポート。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! maildispatch-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use maildispatch_domain::mail::{ResolvedMail, TransportError};

use crate::mail_transport::MailTransport;

// ===== MockMailTransport =====

/// 配送されたメールを記録するモック
///
/// `clone()` したインスタンス同士で記録を共有するため、
/// サービスに渡した後もテスト側から配送内容を検査できる。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    delivered: Arc<Mutex<Vec<ResolvedMail>>>,
    failure:   Arc<Mutex<Option<String>>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の `deliver` を `TransportError::Smtp` で失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// 配送に成功したメールの一覧
    pub fn delivered(&self) -> Vec<ResolvedMail> {
        self.delivered.lock().unwrap().clone()
    }

    /// `deliver` が成功した回数
    pub fn delivered_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn deliver(&self, mail: &ResolvedMail) -> Result<(), TransportError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(TransportError::Smtp(message));
        }

        self.delivered.lock().unwrap().push(mail.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
