//! # メールサービス
//!
//! トランスポートの選択・構築と、送信依頼の検証 → 配送を統合するサービス。
//!
//! ## 設計方針
//!
//! - **初期化は 1 度だけ**: `initialize` は `&mut self` を取るため、初期化中に
//!   `send` が並行して走ることはない。初期化後は `Arc<MailService>` で共有する
//! - **選択ロジックの集約**: `MAIL_TYPE` による分岐は `initialize` にのみ存在し、
//!   `send` はトランスポートの種類を意識しない
//! - **部分的な構築を残さない**: 設定エラー時はトランスポートも既定の送信元も保持しない
//! - **1 回の送信につき 1 回の配送**: リトライ・キューイングは行わない

use std::sync::Arc;

use maildispatch_domain::mail::MailMessage;
use maildispatch_infra::mail_transport::{MailTransport, ResendTransport, SmtpTransport};

use crate::{
    config::{MailConfig, MailConfigError, TransportSettings},
    error::MailServiceError,
};

/// メールサービス
///
/// 起動時に 1 度だけ構築・初期化し、以降は参照を共有して使う。
#[derive(Default)]
pub struct MailService {
    transport:      Option<Arc<dyn MailTransport>>,
    default_sender: Option<String>,
}

impl MailService {
    /// 未初期化のサービスを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 構築済みのトランスポートを注入して、初期化済みのサービスを作成する
    pub fn with_transport(transport: Arc<dyn MailTransport>, default_sender: Option<String>) -> Self {
        Self {
            transport:      Some(transport),
            default_sender: default_sender.filter(|sender| !sender.is_empty()),
        }
    }

    /// トランスポートが構築済みかどうか
    pub fn is_initialized(&self) -> bool {
        self.transport.is_some()
    }

    /// 使用中のバックエンド名（未初期化なら `None`）
    pub fn backend_name(&self) -> Option<&'static str> {
        self.transport.as_ref().map(|transport| transport.backend_name())
    }

    /// 既定の送信元
    pub fn default_sender(&self) -> Option<&str> {
        self.default_sender.as_deref()
    }

    /// 設定に従ってトランスポートを選択・構築する
    ///
    /// - `MAIL_TYPE` が未設定なら警告を出して未初期化のまま `Ok(())` を返す
    /// - 初期化済みなら [`MailServiceError::AlreadyInitialized`]
    /// - 設定の欠落・矛盾は [`MailServiceError::Config`]。このとき状態は変わらない
    pub fn initialize(&mut self, config: &MailConfig) -> Result<(), MailServiceError> {
        if self.is_initialized() {
            return Err(MailServiceError::AlreadyInitialized);
        }

        let Some(settings) = config.transport_settings()? else {
            tracing::warn!("MAIL_TYPE is not set");
            return Ok(());
        };

        let mail_type = settings.mail_type();
        let transport = build_transport(settings)?;

        self.default_sender = config.default_sender().map(str::to_string);
        self.transport = Some(transport);

        tracing::info!(
            mail.backend = %mail_type,
            mail.default_sender = self.default_sender.as_deref().unwrap_or("-"),
            "メールトランスポートを初期化しました"
        );
        Ok(())
    }

    /// メールを 1 通送信する
    ///
    /// 検査順序: 初期化済みか → from → to → subject → html。
    /// 検査を通過した場合のみ配送を 1 回行い、配送エラーはそのまま返す。
    pub async fn send(&self, message: MailMessage) -> Result<(), MailServiceError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(MailServiceError::NotInitialized)?;

        let mail = message.resolve(self.default_sender.as_deref())?;

        if let Err(e) = transport.deliver(&mail).await {
            tracing::warn!(
                mail.backend = transport.backend_name(),
                mail.to = %mail.to(),
                error = %e,
                "メール送信に失敗しました"
            );
            return Err(e.into());
        }

        tracing::info!(
            mail.backend = transport.backend_name(),
            mail.to = %mail.to(),
            "メールを送信しました"
        );
        Ok(())
    }
}

/// 検証済みの設定からトランスポートを構築する
fn build_transport(settings: TransportSettings) -> Result<Arc<dyn MailTransport>, MailConfigError> {
    let transport: Arc<dyn MailTransport> = match settings {
        TransportSettings::Resend(resend) => Arc::new(ResendTransport::new(resend)),
        TransportSettings::Smtp(smtp) => Arc::new(
            SmtpTransport::new(smtp).map_err(|e| MailConfigError::SmtpSetup(e.to_string()))?,
        ),
    };
    Ok(transport)
}
