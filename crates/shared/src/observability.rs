//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! メール送信を組み込むホストアプリケーション（`send-mail` バイナリを含む）で
//! 共通のログ初期化ロジックを集約する。
//!
//! | 環境変数 | 説明 |
//! |---------|------|
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字を区別しない。デフォルト: `pretty`） |
//! | `RUST_LOG` | ログレベルのフィルタ（デフォルト: `info,maildispatch=debug`） |

use strum::EnumString;
use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,maildispatch=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogFormat {
    /// JSON 形式（ログ収集基盤向け）
    Json,
    /// 人間が読みやすい形式（開発・CLI 向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 設定値からログ形式を決める
    ///
    /// 未設定は [`Pretty`](LogFormat::Pretty)。不正な値も `Pretty` にフォールバックし、
    /// subscriber 初期化前のため stderr に警告を出す。
    pub fn from_setting(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::default();
        };
        value.parse().unwrap_or_else(|_| {
            eprintln!("WARNING: unknown LOG_FORMAT={value:?}, falling back to pretty");
            Self::Pretty
        })
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        Self::from_setting(std::env::var("LOG_FORMAT").ok().as_deref())
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ログ出力形式
    pub log_format:     LogFormat,
    /// `RUST_LOG` 未設定時に使うフィルタ
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(log_format: LogFormat) -> Self {
        Self {
            log_format,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env() -> Self {
        Self::new(LogFormat::from_env())
    }

    /// `RUST_LOG` 未設定時のフィルタを差し替える
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// トレーシングを初期化する
///
/// グローバル subscriber が既に設定されている場合はエラーを返す
/// （テストなどで複数回呼ばれても panic しない）。
pub fn init_tracing(
    config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_filter.as_str().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("json"), LogFormat::Json)]
    #[case(Some("JSON"), LogFormat::Json)]
    #[case(Some(" pretty "), LogFormat::Pretty)]
    #[case(Some("unknown"), LogFormat::Pretty)]
    #[case(Some(""), LogFormat::Pretty)]
    #[case(None, LogFormat::Pretty)]
    fn test_from_settingでログ形式を決める(
        #[case] value: Option<&str>,
        #[case] expected: LogFormat,
    ) {
        assert_eq!(LogFormat::from_setting(value), expected);
    }

    #[test]
    fn test_newはデフォルトフィルタを設定する() {
        let config = TracingConfig::new(LogFormat::Json);

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_with_default_filterでフィルタを差し替える() {
        let config = TracingConfig::new(LogFormat::Pretty).with_default_filter("warn");

        assert_eq!(config.default_filter, "warn");
    }
}
