//! 特徴量スキーマ
//!
//! 特徴量ベクトルの並び（ブロック構成と各列の名前）を一元管理する。
//! 学習時の特徴量生成と推論時の特徴量生成は同じスキーマから導出し、
//! スキーマはモデルと一緒に保存する。

use super::ngram::NgramVocabulary;
use crate::error::{Error, Result};
use crate::keyword_db::KeywordDatabase;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// キーワードブロックの値の種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    /// 部分文字列の出現回数
    #[default]
    Frequency,
    /// 部分文字列の有無（0/1）
    Presence,
    /// 形態素としての有無（0/1）
    MorphemePresence,
}

/// ブロック名
pub const BLOCK_KEYWORDS: &str = "keywords";
pub const BLOCK_FULLNAME_COUNT: &str = "fullname_count";
pub const BLOCK_SECRET_DEGREE: &str = "secret_degree";
pub const BLOCK_NGRAM_COUNT: &str = "ngram_count";

/// 姓・名カウントブロックの列
const NAME_COUNT_COLUMNS: [&str; 2] = ["surname_count", "given_name_count"];
/// 共起ブロックの列
const COOCCURRENCE_COLUMNS: [&str; 4] = ["partial_count", "full_count", "partial_pct", "full_pct"];

/// 特徴量ブロック
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBlock {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

/// 特徴量スキーマ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// キーワードブロックの並び（KeywordDatabase の初出順）
    pub keywords: Vec<String>,
    #[serde(default)]
    pub keyword_mode: KeywordMode,
    pub ngram: NgramVocabulary,
}

impl FeatureSchema {
    /// キーワードDBと語彙からスキーマを作成
    pub fn new(db: &KeywordDatabase, keyword_mode: KeywordMode, ngram: NgramVocabulary) -> Self {
        Self {
            keywords: db.all_keywords().to_vec(),
            keyword_mode,
            ngram,
        }
    }

    /// ブロック構成（ベクトル上の並び順）
    pub fn blocks(&self) -> [FeatureBlock; 4] {
        let widths = [
            (BLOCK_KEYWORDS, self.keywords.len()),
            (BLOCK_FULLNAME_COUNT, NAME_COUNT_COLUMNS.len()),
            (BLOCK_SECRET_DEGREE, COOCCURRENCE_COLUMNS.len()),
            (BLOCK_NGRAM_COUNT, self.ngram.len()),
        ];

        let mut offset = 0;
        widths.map(|(name, width)| {
            let block = FeatureBlock { name, offset, width };
            offset += width;
            block
        })
    }

    /// ベクトル幅
    pub fn width(&self) -> usize {
        self.keywords.len() + NAME_COUNT_COLUMNS.len() + COOCCURRENCE_COLUMNS.len() + self.ngram.len()
    }

    /// 列名（ベクトルと同じ並び）
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        names.extend(self.keywords.iter().map(|k| format!("keyword:{}", k)));
        names.extend(NAME_COUNT_COLUMNS.iter().map(|c| c.to_string()));
        names.extend(COOCCURRENCE_COLUMNS.iter().map(|c| c.to_string()));
        names.extend(self.ngram.terms().iter().map(|t| format!("ngram:{}", t)));
        names
    }

    /// スキーマの指紋（列名と値の種類のSHA-256）
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}\n", self.keyword_mode).as_bytes());
        hasher.update(format!("{}..={}\n", self.ngram.min_n, self.ngram.max_n).as_bytes());
        for name in self.feature_names() {
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    /// キーワードDBの並びがスキーマと一致するか検証
    pub fn ensure_compatible(&self, db: &KeywordDatabase) -> Result<()> {
        let current = db.all_keywords();
        if current.len() != self.keywords.len() {
            return Err(Error::Schema(format!(
                "キーワード数が一致しません（スキーマ: {}, DB: {}）",
                self.keywords.len(),
                current.len()
            )));
        }

        if let Some(pos) = current.iter().zip(&self.keywords).position(|(a, b)| a != b) {
            return Err(Error::Schema(format!(
                "{}番目のキーワードが一致しません（スキーマ: {}, DB: {}）",
                pos, self.keywords[pos], current[pos]
            )));
        }

        Ok(())
    }
}
