//! # maildispatch 共有ユーティリティ
//!
//! ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のクレート（domain, infra, mailer）のどこからでも利用できる
//! - メール送信のロジックを含まない純粋なユーティリティのみを配置

pub mod observability;

pub use observability::{LogFormat, TracingConfig, init_tracing};
