//! 形態素解析器
//!
//! 検出エンジンの `Tagger` 契約を外部コマンドで実装する。

mod mecab;

pub use mecab::MecabCommandTagger;
