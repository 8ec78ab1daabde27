//! ppi-filter
//!
//! 検出エンジン（`ppi_filter_common`）をMeCabコマンドとJSONL一括処理に接続するCLI。

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod tagger;
