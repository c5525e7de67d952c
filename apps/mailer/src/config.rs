//! # メール設定
//!
//! 環境変数からメール送信の設定を読み込み、トランスポートの構築に必要な
//! 型付きの設定（[`TransportSettings`]）へ検証・変換する。
//!
//! ## 環境変数
//!
//! | 変数名 | 説明 |
//! |--------|------|
//! | `MAIL_TYPE` | `resend` / `smtp`。未設定または空ならメール送信は無効 |
//! | `MAIL_DEFAULT_SEND_FROM` | 既定の送信元（全バックエンド共通） |
//! | `RESEND_API_KEY` | Resend の API キー（`resend` で必須） |
//! | `RESEND_API_URL` | Resend のベース URL の上書き |
//! | `SMTP_SERVER` / `SMTP_PORT` | SMTP サーバー（`smtp` で必須） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | SMTP 認証情報 |
//! | `SMTP_USE_TLS` | TLS を使用する |
//! | `SMTP_OPPORTUNISTIC_TLS` | STARTTLS で昇格する（`SMTP_USE_TLS` が必要） |
//!
//! 空文字の値は未設定として扱う。

use std::env;

use maildispatch_infra::mail_transport::{ResendSettings, SmtpSettings, SmtpTlsMode};
use strum::{Display, EnumString};
use thiserror::Error;

/// メール設定のエラー
///
/// 初期化時にのみ発生する。リトライしても解消しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailConfigError {
    /// `resend` で API キーがない
    #[error("RESEND_API_KEY is not set")]
    MissingResendApiKey,

    /// `smtp` でサーバーまたはポートがない
    #[error("SMTP_SERVER and SMTP_PORT are required for smtp mail type")]
    MissingSmtpServer,

    /// TLS なしで STARTTLS 昇格が指定された
    #[error("SMTP_OPPORTUNISTIC_TLS is not supported without enabling SMTP_USE_TLS")]
    OpportunisticTlsWithoutTls,

    /// 未対応の `MAIL_TYPE`
    #[error("Unsupported mail type {0}")]
    UnsupportedMailType(String),

    /// 値を解釈できない（ポート番号、真偽値）
    #[error("{key} の値が不正です: {value:?}")]
    InvalidValue {
        /// 環境変数名
        key:   &'static str,
        /// 設定されていた値
        value: String,
    },

    /// SMTP トランスポートの構築に失敗（TLS パラメータなど）
    #[error("SMTP トランスポートの初期化に失敗: {0}")]
    SmtpSetup(String),
}

/// メール送信バックエンドの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MailType {
    /// Resend（ホスト型 API）
    Resend,
    /// SMTP
    Smtp,
}

/// 検証済みのトランスポート設定
///
/// どのバックエンドを使うかと、その構築に必要な値の組み合わせを表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSettings {
    Resend(ResendSettings),
    Smtp(SmtpSettings),
}

impl TransportSettings {
    pub fn mail_type(&self) -> MailType {
        match self {
            Self::Resend(_) => MailType::Resend,
            Self::Smtp(_) => MailType::Smtp,
        }
    }
}

/// メール送信の設定
///
/// 環境変数の値をそのまま保持するスナップショット。
/// 値の組み合わせの検証は [`MailConfig::transport_settings`] でまとめて行う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    /// バックエンド種別（`MAIL_TYPE`）
    pub mail_type:              Option<String>,
    /// 既定の送信元（`MAIL_DEFAULT_SEND_FROM`）
    pub default_send_from:      Option<String>,
    /// Resend の API キー
    pub resend_api_key:         Option<String>,
    /// Resend のベース URL の上書き
    pub resend_api_url:         Option<String>,
    /// SMTP サーバーのホスト名
    pub smtp_server:            Option<String>,
    /// SMTP サーバーのポート番号
    pub smtp_port:              Option<u16>,
    /// SMTP 認証ユーザー名
    pub smtp_username:          Option<String>,
    /// SMTP 認証パスワード
    pub smtp_password:          Option<String>,
    /// TLS を使用する
    pub smtp_use_tls:           bool,
    /// STARTTLS で昇格する
    pub smtp_opportunistic_tls: bool,
}

impl MailConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, MailConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// `lookup` は変数名を受け取り、値があれば返す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MailConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let smtp_port = get("SMTP_PORT")
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| MailConfigError::InvalidValue {
                        key: "SMTP_PORT",
                        value,
                    })
            })
            .transpose()?;

        Ok(Self {
            mail_type: get("MAIL_TYPE"),
            default_send_from: get("MAIL_DEFAULT_SEND_FROM"),
            resend_api_key: get("RESEND_API_KEY"),
            resend_api_url: get("RESEND_API_URL"),
            smtp_server: get("SMTP_SERVER"),
            smtp_port,
            smtp_username: get("SMTP_USERNAME"),
            smtp_password: get("SMTP_PASSWORD"),
            smtp_use_tls: parse_flag("SMTP_USE_TLS", get("SMTP_USE_TLS"))?,
            smtp_opportunistic_tls: parse_flag(
                "SMTP_OPPORTUNISTIC_TLS",
                get("SMTP_OPPORTUNISTIC_TLS"),
            )?,
        })
    }

    /// 既定の送信元（空文字は未設定扱い）
    pub fn default_sender(&self) -> Option<&str> {
        non_empty(self.default_send_from.as_deref())
    }

    /// 設定を検証し、構築すべきトランスポートの設定を返す
    ///
    /// `MAIL_TYPE` が未設定なら `Ok(None)`（メール送信は無効）。
    pub fn transport_settings(&self) -> Result<Option<TransportSettings>, MailConfigError> {
        let Some(tag) = non_empty(self.mail_type.as_deref()) else {
            return Ok(None);
        };
        let mail_type: MailType = tag
            .parse()
            .map_err(|_| MailConfigError::UnsupportedMailType(tag.to_string()))?;

        let settings = match mail_type {
            MailType::Resend => TransportSettings::Resend(self.resend_settings()?),
            MailType::Smtp => TransportSettings::Smtp(self.smtp_settings()?),
        };
        Ok(Some(settings))
    }

    fn resend_settings(&self) -> Result<ResendSettings, MailConfigError> {
        let api_key = non_empty(self.resend_api_key.as_deref())
            .ok_or(MailConfigError::MissingResendApiKey)?;

        Ok(ResendSettings {
            api_key: api_key.to_string(),
            api_url: non_empty(self.resend_api_url.as_deref()).map(str::to_string),
        })
    }

    fn smtp_settings(&self) -> Result<SmtpSettings, MailConfigError> {
        let (Some(server), Some(port)) = (non_empty(self.smtp_server.as_deref()), self.smtp_port)
        else {
            return Err(MailConfigError::MissingSmtpServer);
        };

        let tls = match (self.smtp_use_tls, self.smtp_opportunistic_tls) {
            (false, true) => return Err(MailConfigError::OpportunisticTlsWithoutTls),
            (false, false) => SmtpTlsMode::None,
            (true, false) => SmtpTlsMode::Implicit,
            (true, true) => SmtpTlsMode::StartTls,
        };

        Ok(SmtpSettings {
            server: server.to_string(),
            port,
            username: non_empty(self.smtp_username.as_deref()).map(str::to_string),
            password: non_empty(self.smtp_password.as_deref()).map(str::to_string),
            default_from: self.default_sender().map(str::to_string),
            tls,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 真偽値の環境変数を解釈する（未設定は false）
fn parse_flag(key: &'static str, value: Option<String>) -> Result<bool, MailConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(MailConfigError::InvalidValue { key, value }),
    }
}
