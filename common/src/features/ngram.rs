//! 形態素Nグラムのカウントベクトル
//!
//! 分かち書き済み文字列（`"私 は 山田 です"`）から単語Nグラムを数える。
//! 1文字の語も対象にするため、トークンは `\b\w+\b` で切り出す。
//! 語彙は学習時に一度だけ構築し、モデルと一緒に保存したものを推論時に読み込む。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Nグラム語彙
///
/// 読み込み時に `validate` を通るものだけを受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNgramVocabulary")]
pub struct NgramVocabulary {
    pub min_n: usize,
    pub max_n: usize,
    /// 語 → 列番号（語の辞書順に採番）
    vocabulary: BTreeMap<String, usize>,
}

/// 検証前の保存形式
#[derive(Deserialize)]
struct RawNgramVocabulary {
    min_n: usize,
    max_n: usize,
    vocabulary: BTreeMap<String, usize>,
}

impl TryFrom<RawNgramVocabulary> for NgramVocabulary {
    type Error = Error;

    fn try_from(raw: RawNgramVocabulary) -> Result<Self> {
        let vocab = Self {
            min_n: raw.min_n,
            max_n: raw.max_n,
            vocabulary: raw.vocabulary,
        };
        vocab.validate()?;
        Ok(vocab)
    }
}

impl Default for NgramVocabulary {
    fn default() -> Self {
        Self::new(1, 3)
    }
}

impl NgramVocabulary {
    /// 空の語彙
    pub fn new(min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        Self {
            min_n,
            max_n: max_n.max(min_n),
            vocabulary: BTreeMap::new(),
        }
    }

    /// 分かち書き文字列をNグラム列に変換
    pub fn analyze(&self, wakati: &str) -> Vec<String> {
        lazy_static::lazy_static! {
            static ref WORD_RE: Regex = Regex::new(r"\b\w+\b").unwrap();
        }

        let lowered = wakati.to_lowercase();
        let words: Vec<&str> = WORD_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut grams = Vec::new();
        for n in self.min_n..=self.max_n {
            if n > words.len() {
                break;
            }
            for window in words.windows(n) {
                grams.push(window.join(" "));
            }
        }
        grams
    }

    /// 文書群から語彙を構築
    pub fn fit<'a>(mut self, documents: impl IntoIterator<Item = &'a str>) -> Self {
        let mut terms = BTreeSet::new();
        for doc in documents {
            terms.extend(self.analyze(doc));
        }

        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();
        self
    }

    /// 語彙に基づくカウントベクトル（未知語は無視）
    pub fn transform(&self, wakati: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for gram in self.analyze(wakati) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                counts[idx] += 1.0;
            }
        }
        counts
    }

    /// 列番号順の語
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<(&str, usize)> = self
            .vocabulary
            .iter()
            .map(|(t, &i)| (t.as_str(), i))
            .collect();
        terms.sort_by_key(|&(_, i)| i);
        terms.into_iter().map(|(t, _)| t).collect()
    }

    /// `1 <= min_n <= max_n` かつ列番号が `0..len` を重複・欠番なく覆うこと
    pub fn validate(&self) -> Result<()> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(Error::Classifier(format!(
                "Nグラム範囲が不正です（min_n: {}, max_n: {}）",
                self.min_n, self.max_n
            )));
        }

        let len = self.vocabulary.len();
        let mut seen = vec![false; len];
        for (term, &idx) in &self.vocabulary {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(Error::Classifier(format!(
                        "Nグラム語彙の列番号が重複しています（{}: {}）",
                        term, idx
                    )))
                }
                None => {
                    return Err(Error::Classifier(format!(
                        "Nグラム語彙の列番号が範囲外です（{}: {}, 語彙数: {}）",
                        term, idx, len
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}
