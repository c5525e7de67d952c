//! Resend 配送実装
//!
//! Resend の HTTP API（`POST /emails`）を使用してメールを送信する。
//! ベース URL は設定で差し替え可能（セルフホストのプロキシやテスト用スタブ向け）。

use std::time::Duration;

use async_trait::async_trait;
use maildispatch_domain::mail::{ResolvedMail, TransportError};
use serde::Serialize;

use super::MailTransport;

/// Resend API のデフォルトのベース URL
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resend 配送の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendSettings {
    /// API キー
    pub api_key: String,
    /// ベース URL の上書き（未設定で [`DEFAULT_RESEND_API_URL`]）
    pub api_url: Option<String>,
}

/// Resend 送信リクエスト
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      [&'a str; 1],
    subject: &'a str,
    html:    &'a str,
}

/// Resend 配送
///
/// `reqwest::Client` をラップする。クライアントは内部でコネクションプールを共有し、
/// 同時に呼び出しても安全。
pub struct ResendTransport {
    client:   reqwest::Client,
    endpoint: String,
    api_key:  String,
}

impl ResendTransport {
    /// 新しい Resend 配送インスタンスを作成
    ///
    /// ベース URL の上書きはこのインスタンスにのみ適用される。
    pub fn new(settings: ResendSettings) -> Self {
        let base_url = settings
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_RESEND_API_URL)
            .trim_end_matches('/');

        Self {
            client:   reqwest::Client::new(),
            endpoint: format!("{base_url}/emails"),
            api_key:  settings.api_key,
        }
    }

    /// 送信先エンドポイント
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn deliver(&self, mail: &ResolvedMail) -> Result<(), TransportError> {
        let request = SendEmailRequest {
            from:    mail.from(),
            to:      [mail.to()],
            subject: mail.subject(),
            html:    mail.html(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %self.endpoint, "Resend API でメールを送信しました");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn backend_name(&self) -> &'static str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResendTransport>();
    }

    #[rstest]
    #[case(None, "https://api.resend.com/emails")]
    #[case(Some("http://localhost:8025"), "http://localhost:8025/emails")]
    #[case(Some("http://localhost:8025/"), "http://localhost:8025/emails")]
    fn ベースurlの上書きがエンドポイントに反映される(
        #[case] api_url: Option<&str>,
        #[case] expected: &str,
    ) {
        let transport = ResendTransport::new(ResendSettings {
            api_key: "re_test".to_string(),
            api_url: api_url.map(str::to_string),
        });

        assert_eq!(transport.endpoint(), expected);
    }

    #[test]
    fn リクエストはtoを配列としてシリアライズする() {
        let request = SendEmailRequest {
            from:    "a@x.com",
            to:      ["b@x.com"],
            subject: "s",
            html:    "<p>",
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "a@x.com",
                "to": ["b@x.com"],
                "subject": "s",
                "html": "<p>",
            })
        );
    }
}
