//! エラー型定義

use std::path::PathBuf;
use thiserror::Error;

/// 検出エンジン共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 辞書・キーワードリストなどのリソース読み込み失敗（構築時に致命的）
    #[error("Resource error: {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    /// 特徴量スキーマの不整合（学習時と推論時の並び順ずれ）
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Tagger error: {0}")]
    Tagger(String),
}

impl Error {
    /// パス付きのリソースエラーを生成
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Resource {
            path: path.into(),
            source,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
