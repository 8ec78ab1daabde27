use thiserror::Error;

#[derive(Error, Debug)]
pub enum PpiFilterError {
    /// 検出エンジンのエラー
    #[error(transparent)]
    Engine(#[from] ppi_filter_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    /// 入力JSONLの行が文書として読めない
    #[error("不正な入力行: {0}")]
    InvalidLine(String),

    #[error("形態素解析エラー: {0}")]
    Tagger(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PpiFilterError>;
