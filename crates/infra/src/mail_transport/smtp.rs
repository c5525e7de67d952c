//! SMTP 配送実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! TLS は接続時から暗号化（implicit TLS）か、平文接続後の STARTTLS 昇格を選べる。

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    address::Envelope,
    message::{Mailbox, Message, SinglePart},
    transport::smtp::{
        self,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use maildispatch_domain::mail::{ResolvedMail, TransportError};

use super::MailTransport;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP の TLS 方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTlsMode {
    /// 暗号化しない
    None,
    /// 接続時から TLS（SMTPS）
    Implicit,
    /// 平文で接続し、STARTTLS で昇格する（昇格できなければ失敗）
    StartTls,
}

/// SMTP 配送の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    /// SMTP サーバーのホスト名
    pub server:       String,
    /// SMTP サーバーのポート番号
    pub port:         u16,
    /// 認証ユーザー名
    pub username:     Option<String>,
    /// 認証パスワード
    pub password:     Option<String>,
    /// エンベロープ送信元（未設定ならヘッダの From を使う）
    pub default_from: Option<String>,
    /// TLS 方式
    pub tls:          SmtpTlsMode,
}

/// SMTP 配送
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// 内部のコネクションプールは同時呼び出しに対して安全。
pub struct SmtpTransport {
    transport:     AsyncSmtpTransport<Tokio1Executor>,
    envelope_from: Option<String>,
}

impl SmtpTransport {
    /// 新しい SMTP 配送インスタンスを作成
    ///
    /// 接続はまだ行わない。TLS パラメータの構築に失敗した場合のみエラーを返す。
    pub fn new(settings: SmtpSettings) -> Result<Self, smtp::Error> {
        let tls = match settings.tls {
            SmtpTlsMode::None => Tls::None,
            SmtpTlsMode::Implicit => Tls::Wrapper(TlsParameters::new(settings.server.clone())?),
            SmtpTlsMode::StartTls => Tls::Required(TlsParameters::new(settings.server.clone())?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
            .port(settings.port)
            .tls(tls)
            .timeout(Some(CONNECT_TIMEOUT));

        // 片方だけの指定では認証しない
        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport:     builder.build(),
            envelope_from: settings.default_from.filter(|from| !from.is_empty()),
        })
    }

    fn build_message(&self, mail: &ResolvedMail) -> Result<Message, TransportError> {
        let from: Mailbox = parse_mailbox(mail.from())?;
        let to: Mailbox = parse_mailbox(mail.to())?;

        let envelope_from = match &self.envelope_from {
            Some(address) => address
                .parse::<Address>()
                .map_err(|e| TransportError::InvalidAddress(format!("{address}: {e}")))?,
            None => from.email.clone(),
        };
        let envelope = Envelope::new(Some(envelope_from), vec![to.email.clone()])
            .map_err(|e| TransportError::MessageBuild(e.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject())
            .envelope(envelope)
            .singlepart(SinglePart::html(mail.html().to_string()))
            .map_err(|e| TransportError::MessageBuild(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|e| TransportError::InvalidAddress(format!("{address}: {e}")))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn deliver(&self, mail: &ResolvedMail) -> Result<(), TransportError> {
        let message = self.build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;

        tracing::debug!(to = %mail.to(), "SMTP でメールを送信しました");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use maildispatch_domain::mail::MailMessage;

    use super::*;

    fn plain_settings(port: u16) -> SmtpSettings {
        SmtpSettings {
            server:       "127.0.0.1".to_string(),
            port,
            username:     None,
            password:     None,
            default_from: None,
            tls:          SmtpTlsMode::None,
        }
    }

    fn resolved(to: &str) -> ResolvedMail {
        MailMessage::new(to, "件名", "<p>本文</p>")
            .resolve(Some("noreply@example.com"))
            .unwrap()
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpTransport>();
    }

    #[test]
    fn エンベロープ送信元はdefault_fromを優先する() {
        let transport = SmtpTransport::new(SmtpSettings {
            default_from: Some("bounce@example.com".to_string()),
            ..plain_settings(1025)
        })
        .unwrap();

        let message = transport.build_message(&resolved("user@example.com")).unwrap();

        let envelope = message.envelope();
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("bounce@example.com")
        );
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "user@example.com");
    }

    #[test]
    fn default_fromがなければヘッダのfromをエンベロープに使う() {
        let transport = SmtpTransport::new(plain_settings(1025)).unwrap();

        let message = transport.build_message(&resolved("user@example.com")).unwrap();

        assert_eq!(
            message.envelope().from().map(ToString::to_string).as_deref(),
            Some("noreply@example.com")
        );
    }

    #[tokio::test]
    async fn 不正な宛先は接続前にinvalid_addressを返す() {
        let transport = SmtpTransport::new(plain_settings(1025)).unwrap();

        let result = transport.deliver(&resolved("not-an-address")).await;

        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn 接続できないサーバーへの送信はsmtpエラーを返す() {
        // ポート 1 は通常 LISTEN されていないため、接続は即座に拒否される
        let transport = SmtpTransport::new(plain_settings(1)).unwrap();

        let result = transport.deliver(&resolved("user@example.com")).await;

        assert!(matches!(result, Err(TransportError::Smtp(_))));
    }
}
