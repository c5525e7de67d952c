//! # メール
//!
//! 送信メールのドメインモデルと、送信前検証（Validator）を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`MailMessage`] | 送信依頼 | 呼び出し元が組み立てる未検証のメール |
//! | [`ResolvedMail`] | 解決済みメール | 送信元を補完し、必須項目を検証したメール |
//! | [`MailValidationError`] | 検証エラー | 必須項目の欠落 |
//! | [`TransportError`] | 配送エラー | バックエンド（Resend / SMTP）での送信失敗 |
//!
//! ## 設計方針
//!
//! - **検証順序の固定**: from → to → subject → html の順に検査し、最初の欠落を返す
//! - **型による保証**: [`ResolvedMail`] は [`MailMessage::resolve`] でのみ生成され、
//!   4 項目すべてが空でないことを型で表す

use thiserror::Error;

/// 送信依頼
///
/// `send` の入力。`from` が未指定の場合は既定の送信元で補完される。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MailMessage {
    /// 宛先メールアドレス
    pub to:      String,
    /// 件名
    pub subject: String,
    /// HTML 本文
    pub html:    String,
    /// 送信元メールアドレス（未指定時は既定の送信元）
    pub from:    Option<String>,
}

impl MailMessage {
    /// 送信元を指定しない送信依頼を作成する
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to:      to.into(),
            subject: subject.into(),
            html:    html.into(),
            from:    None,
        }
    }

    /// 送信元を指定する
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// 送信元を補完し、必須項目を検証する
    ///
    /// 検査順序は from → to → subject → html で固定。
    /// 複数の項目が欠落している場合も、この順序で最初の欠落を返す。
    ///
    /// # 引数
    ///
    /// - `default_sender`: `from` が空または未指定の場合に使う送信元
    pub fn resolve(self, default_sender: Option<&str>) -> Result<ResolvedMail, MailValidationError> {
        let from = self
            .from
            .filter(|from| !from.is_empty())
            .or_else(|| {
                default_sender
                    .filter(|sender| !sender.is_empty())
                    .map(str::to_string)
            })
            .ok_or(MailValidationError::MissingFrom)?;

        if self.to.is_empty() {
            return Err(MailValidationError::MissingTo);
        }
        if self.subject.is_empty() {
            return Err(MailValidationError::MissingSubject);
        }
        if self.html.is_empty() {
            return Err(MailValidationError::MissingHtml);
        }

        Ok(ResolvedMail {
            from,
            to: self.to,
            subject: self.subject,
            html: self.html,
        })
    }
}

/// 解決済みメール
///
/// 送信元の補完と必須項目の検証を通過したメール。
/// トランスポートにはこの型のみが渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMail {
    from:    String,
    to:      String,
    subject: String,
    html:    String,
}

impl ResolvedMail {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// 送信依頼の検証エラー
///
/// 呼び出し元が入力を修正すれば再送できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailValidationError {
    /// 送信元が指定されておらず、既定の送信元もない
    #[error("mail from is not set")]
    MissingFrom,

    /// 宛先が空
    #[error("mail to is not set")]
    MissingTo,

    /// 件名が空
    #[error("mail subject is not set")]
    MissingSubject,

    /// HTML 本文が空
    #[error("mail html is not set")]
    MissingHtml,
}

/// 配送エラー
///
/// バックエンドで発生した失敗をそのまま呼び出し元に伝える。
/// リトライや抑制は行わない。
#[derive(Debug, Error)]
pub enum TransportError {
    /// 接続失敗、タイムアウトなどのネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// Resend API が成功以外のステータスを返した
    #[error("メール API がエラーを返しました（status={status}）: {body}")]
    Api {
        /// HTTP ステータスコード
        status: u16,
        /// レスポンス本文
        body:   String,
    },

    /// メールアドレスとして解釈できない
    #[error("メールアドレスが不正です: {0}")]
    InvalidAddress(String),

    /// メッセージの組み立てに失敗
    #[error("メッセージ構築失敗: {0}")]
    MessageBuild(String),

    /// SMTP の接続・認証・プロトコルエラー
    #[error("SMTP 送信失敗: {0}")]
    Smtp(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn valid_message() -> MailMessage {
        MailMessage::new("b@x.com", "s", "<p>")
    }

    #[test]
    fn test_fromが未指定なら既定の送信元で補完する() {
        let resolved = valid_message().resolve(Some("a@x.com")).unwrap();

        assert_eq!(resolved.from(), "a@x.com");
        assert_eq!(resolved.to(), "b@x.com");
        assert_eq!(resolved.subject(), "s");
        assert_eq!(resolved.html(), "<p>");
    }

    #[test]
    fn test_指定されたfromは既定の送信元より優先される() {
        let resolved = valid_message()
            .with_from("c@x.com")
            .resolve(Some("a@x.com"))
            .unwrap();

        assert_eq!(resolved.from(), "c@x.com");
    }

    #[test]
    fn test_空文字のfromは未指定として扱う() {
        let resolved = valid_message()
            .with_from("")
            .resolve(Some("a@x.com"))
            .unwrap();

        assert_eq!(resolved.from(), "a@x.com");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_送信元が解決できなければmissing_from(#[case] default_sender: Option<&str>) {
        let result = valid_message().resolve(default_sender);

        assert_eq!(result, Err(MailValidationError::MissingFrom));
    }

    #[rstest]
    #[case(MailMessage::new("", "s", "<p>"), MailValidationError::MissingTo)]
    #[case(MailMessage::new("b@x.com", "", "<p>"), MailValidationError::MissingSubject)]
    #[case(MailMessage::new("b@x.com", "s", ""), MailValidationError::MissingHtml)]
    fn test_必須項目の欠落を検出する(
        #[case] message: MailMessage,
        #[case] expected: MailValidationError,
    ) {
        assert_eq!(message.resolve(Some("a@x.com")), Err(expected));
    }

    #[rstest]
    #[case(MailMessage::new("", "", ""), MailValidationError::MissingTo)]
    #[case(MailMessage::new("b@x.com", "", ""), MailValidationError::MissingSubject)]
    fn test_複数欠落時は検査順で最初のエラーを返す(
        #[case] message: MailMessage,
        #[case] expected: MailValidationError,
    ) {
        assert_eq!(message.resolve(Some("a@x.com")), Err(expected));
    }

    #[test]
    fn test_全項目欠落時はmissing_fromが最優先() {
        assert_eq!(
            MailMessage::default().resolve(None),
            Err(MailValidationError::MissingFrom)
        );
    }

    #[test]
    fn test_検証エラーのメッセージ() {
        assert_eq!(MailValidationError::MissingFrom.to_string(), "mail from is not set");
        assert_eq!(MailValidationError::MissingTo.to_string(), "mail to is not set");
        assert_eq!(
            MailValidationError::MissingSubject.to_string(),
            "mail subject is not set"
        );
        assert_eq!(MailValidationError::MissingHtml.to_string(), "mail html is not set");
    }
}
