//! 特徴量生成モジュール
//!
//! 分類器に渡す固定長ベクトルを組み立てる。
//!
//! ## ベクトル構成
//! 1. キーワードブロック（キーワードDBの初出順）
//! 2. 姓・名の出現数 `[surname_count, given_name_count]`
//! 3. 共起ブロック `[partial_count, full_count, partial_pct, full_pct]`
//! 4. Nグラムブロック（保存済み語彙の列順）

pub mod ngram;
pub mod schema;

pub use ngram::NgramVocabulary;
pub use schema::{FeatureBlock, FeatureSchema, KeywordMode};

use crate::error::Result;
use crate::keyword_db::KeywordDatabase;
use crate::name_dict::NameDictionary;
use crate::ngword::{self, TagCategoryMap};
use crate::sentence;
use crate::token::{content_tokens, wakati, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// 特徴量ベクトル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ブロック部分を取り出す
    pub fn block(&self, block: &FeatureBlock) -> &[f64] {
        &self.0[block.offset..block.offset + block.width]
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// 特徴量ベクトルの組み立て
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    schema: Arc<FeatureSchema>,
    keywords: Arc<KeywordDatabase>,
    names: Arc<NameDictionary>,
    tag_map: Arc<TagCategoryMap>,
}

impl FeatureAssembler {
    /// スキーマとキーワードDBの並びが一致しなければエラー
    pub fn new(
        schema: Arc<FeatureSchema>,
        keywords: Arc<KeywordDatabase>,
        names: Arc<NameDictionary>,
        tag_map: Arc<TagCategoryMap>,
    ) -> Result<Self> {
        schema.ensure_compatible(&keywords)?;
        Ok(Self {
            schema,
            keywords,
            names,
            tag_map,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// 1文書分の特徴量ベクトルを生成
    ///
    /// `tokens` は `text` をタガーに通した結果。Nグラムと形態素キーワードに使う。
    pub fn assemble(&self, text: &str, tokens: &[Token]) -> FeatureVector {
        let mut values = Vec::with_capacity(self.schema.width());

        values.extend(self.keyword_block(text, tokens));

        let (surname_count, given_count) = self.names.count_occurrences(text);
        values.push(surname_count as f64);
        values.push(given_count as f64);

        values.extend(sentence::score(text, &self.names, &self.keywords).as_features());

        values.extend(self.schema.ngram.transform(&wakati(tokens)));

        debug_assert_eq!(values.len(), self.schema.width());
        FeatureVector(values)
    }

    fn keyword_block(&self, text: &str, tokens: &[Token]) -> Vec<f64> {
        match self.schema.keyword_mode {
            KeywordMode::Frequency => ngword::count_per_keyword(text, &self.keywords)
                .into_iter()
                .map(|(_, count)| count as f64)
                .collect(),
            KeywordMode::Presence => ngword::count_per_keyword(text, &self.keywords)
                .into_iter()
                .map(|(_, count)| if count > 0 { 1.0 } else { 0.0 })
                .collect(),
            KeywordMode::MorphemePresence => {
                // ユーザ辞書タグ一致の形態素 + 既定辞書の見出しとしての形態素
                let mut matched: HashSet<&str> =
                    ngword::all_tagged_words(tokens, &self.tag_map).into_iter().collect();
                matched.extend(content_tokens(tokens).map(|t| t.surface.as_str()));

                self.schema
                    .keywords
                    .iter()
                    .map(|k| if matched.contains(k.as_str()) { 1.0 } else { 0.0 })
                    .collect()
            }
        }
    }
}
