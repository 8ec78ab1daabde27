//! 文単位の共起スコア
//!
//! テキストを句点・感嘆符・疑問符で文に分割し、
//! 人名（姓・名の辞書に部分一致）と NG キーワードが同じ文に含まれる数を数える。

use crate::keyword_db::KeywordDatabase;
use crate::name_dict::NameDictionary;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 共起カウント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrenceScore {
    /// (姓 or 名) と NG キーワードを含む文の数
    pub partial_count: usize,
    /// (姓 and 名) と NG キーワードを含む文の数
    pub full_count: usize,
    /// 分割後の文の数（空文を除く）
    pub sentence_count: usize,
}

impl CooccurrenceScore {
    pub fn partial_pct(&self) -> f64 {
        percentage(self.partial_count, self.sentence_count)
    }

    pub fn full_pct(&self) -> f64 {
        percentage(self.full_count, self.sentence_count)
    }

    /// 特徴量ブロック `[partial, full, partial_pct, full_pct]`
    pub fn as_features(&self) -> [f64; 4] {
        [
            self.partial_count as f64,
            self.full_count as f64,
            self.partial_pct(),
            self.full_pct(),
        ]
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// 文に分割（前後の空白を除去し、空の文は捨てる）
pub fn split_sentences(text: &str) -> Vec<&str> {
    lazy_static::lazy_static! {
        static ref SENTENCE_END_RE: Regex = Regex::new(r"[。！!？?]\n?").unwrap();
    }

    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 文中の人名の有無
///
/// Returns: `(人名を含むか, 姓で一致したか)`
fn contains_name(sentence: &str, names: &NameDictionary) -> (bool, bool) {
    if names.contains_surname_in(sentence) {
        return (true, true);
    }
    if names.contains_given_name_in(sentence) {
        return (true, false);
    }
    (false, false)
}

fn contains_keyword(sentence: &str, db: &KeywordDatabase) -> bool {
    db.all_keywords().iter().any(|k| sentence.contains(k.as_str()))
}

/// 共起カウントを計算
pub fn score(text: &str, names: &NameDictionary, db: &KeywordDatabase) -> CooccurrenceScore {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return CooccurrenceScore::default();
    }

    let mut result = CooccurrenceScore {
        sentence_count: sentences.len(),
        ..Default::default()
    };

    for sentence in sentences {
        let (has_name, is_surname) = contains_name(sentence, names);
        if !has_name || !contains_keyword(sentence, db) {
            continue;
        }

        result.partial_count += 1;

        // 姓 + NG → 名も含むか
        if is_surname && names.contains_given_name_in(sentence) {
            result.full_count += 1;
        }
    }

    result
}
