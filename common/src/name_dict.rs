//! 人名辞書
//!
//! `よみ\t"表記":品詞` 形式のレコードから姓・名の辞書を構築する。
//! 品詞は `姓` または `名`。形式に合わない行は読み飛ばす。
//! 同じ表記が複数回出現した場合は後の読みで上書きする。

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// 姓・名の辞書
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    surnames: HashMap<String, String>,
    given_names: HashMap<String, String>,
}

impl NameDictionary {
    /// 人名リストファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
        let dict = Self::parse(&content);

        tracing::info!(
            path = %path.display(),
            surnames = dict.surnames.len(),
            given_names = dict.given_names.len(),
            "name_dict.loaded"
        );

        Ok(dict)
    }

    /// レコード文字列をパース
    pub fn parse(content: &str) -> Self {
        lazy_static::lazy_static! {
            static ref RECORD_RE: Regex = Regex::new(r#"^(\S+)\t"(.*?)":(\S+)"#).unwrap();
        }

        let mut dict = Self::default();

        for line in content.lines() {
            let Some(cap) = RECORD_RE.captures(line) else {
                tracing::debug!(line, "name_dict.skip_malformed");
                continue;
            };

            let (reading, word, pos) = (&cap[1], &cap[2], &cap[3]);
            if word.is_empty() {
                continue;
            }

            match pos {
                "姓" => {
                    dict.surnames.insert(word.to_string(), reading.to_string());
                }
                "名" => {
                    dict.given_names.insert(word.to_string(), reading.to_string());
                }
                _ => {}
            }
        }

        dict
    }

    /// 姓・名を直接指定して構築
    pub fn from_names<'a>(
        surnames: impl IntoIterator<Item = (&'a str, &'a str)>,
        given_names: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            surnames: surnames
                .into_iter()
                .map(|(w, r)| (w.to_string(), r.to_string()))
                .collect(),
            given_names: given_names
                .into_iter()
                .map(|(w, r)| (w.to_string(), r.to_string()))
                .collect(),
        }
    }

    pub fn surname_reading(&self, word: &str) -> Option<&str> {
        self.surnames.get(word).map(String::as_str)
    }

    pub fn given_name_reading(&self, word: &str) -> Option<&str> {
        self.given_names.get(word).map(String::as_str)
    }

    pub fn surnames(&self) -> impl Iterator<Item = &str> {
        self.surnames.keys().map(String::as_str)
    }

    pub fn given_names(&self) -> impl Iterator<Item = &str> {
        self.given_names.keys().map(String::as_str)
    }

    /// 文中にいずれかの姓が含まれるか
    pub fn contains_surname_in(&self, text: &str) -> bool {
        self.surnames().any(|w| text.contains(w))
    }

    /// 文中にいずれかの名が含まれるか
    pub fn contains_given_name_in(&self, text: &str) -> bool {
        self.given_names().any(|w| text.contains(w))
    }

    /// テキスト中の姓・名の出現回数（部分文字列の非重複カウント）
    ///
    /// Returns: `(姓の出現数, 名の出現数)`
    pub fn count_occurrences(&self, text: &str) -> (usize, usize) {
        let surname_count = self.surnames().map(|w| text.matches(w).count()).sum();
        let given_count = self.given_names().map(|w| text.matches(w).count()).sum();
        (surname_count, given_count)
    }

    pub fn is_empty(&self) -> bool {
        self.surnames.is_empty() && self.given_names.is_empty()
    }
}
