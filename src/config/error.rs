//! Config store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the interval setting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform reports no per-user configuration directory.
    #[error("ユーザー設定ディレクトリが見つかりません")]
    NoConfigDir,

    /// The settings file exists but could not be read.
    #[error("設定ファイルの読み込みに失敗しました: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not a valid interval record.
    #[error("設定ファイルの解析に失敗しました: {0}")]
    Parse(#[from] serde_json::Error),

    /// The stored interval is zero, negative, or too large.
    #[error("無効なインターバル値です: {0}")]
    InvalidValue(i64),

    /// The settings file could not be written.
    #[error("設定ファイルの書き込みに失敗しました: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
