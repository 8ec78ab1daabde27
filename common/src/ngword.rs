//! NGワード照合
//!
//! 3つの独立した照合方式:
//! - ユーザ辞書タグ照合: 形態素の素性に付与された辞書タグで判定（先勝ち）
//! - 既定辞書の語集合照合: 表層形の集合とキーワードDBの積集合
//! - 部分文字列照合: 形態素を使わない単純な包含判定・出現回数

use crate::keyword_db::KeywordDatabase;
use crate::token::{content_tokens, Token};
use std::collections::{BTreeSet, HashMap};

/// ユーザ辞書タグ → NGカテゴリ
pub type TagCategoryMap = HashMap<String, String>;

/// 標準のユーザ辞書タグ対応表
pub fn default_tag_map() -> TagCategoryMap {
    [
        ("medical_202410", "userd-med"),
        ("criminal_202410", "userd-criminal"),
        ("religion_202412", "userd-religion"),
        ("religion_believer_noun_202412", "userd-religion_believer_noun"),
        ("religion_tuushou_202412", "userd-religion_tuushou"),
        ("race_ethnic_generation_202412", "userd-race_ethnic_generation"),
    ]
    .into_iter()
    .map(|(tag, category)| (tag.to_string(), category.to_string()))
    .collect()
}

/// ユーザ辞書タグ照合の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMatch {
    pub found: bool,
    pub category: Option<String>,
}

/// 語集合照合の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordsetMatch {
    pub found: bool,
    pub word: Option<String>,
    pub category: Option<String>,
}

/// ユーザ辞書タグで照合（最初に一致したトークンで即時return）
pub fn by_tag(tokens: &[Token], tag_map: &TagCategoryMap) -> TagMatch {
    content_tokens(tokens)
        .find_map(|t| t.user_dic_tag().and_then(|tag| tag_map.get(tag)))
        .map(|category| TagMatch {
            found: true,
            category: Some(category.clone()),
        })
        .unwrap_or_default()
}

/// ユーザ辞書タグに一致した表層形をすべて取得
pub fn all_tagged_words<'a>(tokens: &'a [Token], tag_map: &TagCategoryMap) -> Vec<&'a str> {
    content_tokens(tokens)
        .filter(|t| t.user_dic_tag().is_some_and(|tag| tag_map.contains_key(tag)))
        .map(|t| t.surface.as_str())
        .collect()
}

/// 表層形の集合とキーワードDBの積集合で照合
///
/// 複数のキーワードが一致した場合は辞書順で最小のものを報告する。
/// どのキーワードが報告されるかに意味を持たせないこと。
pub fn by_wordset(tokens: &[Token], db: &KeywordDatabase) -> WordsetMatch {
    let surfaces: BTreeSet<&str> = content_tokens(tokens)
        .map(|t| t.surface.as_str())
        .collect();

    surfaces
        .into_iter()
        .find_map(|s| db.lookup(s).map(|category| (s, category)))
        .map(|(word, category)| WordsetMatch {
            found: true,
            word: Some(word.to_string()),
            category: Some(category.to_string()),
        })
        .unwrap_or_default()
}

/// 部分文字列で照合
pub fn by_substring(text: &str, db: &KeywordDatabase) -> bool {
    db.all_keywords().iter().any(|k| text.contains(k.as_str()))
}

/// キーワードごとの出現回数（DBの並び順）
pub fn count_per_keyword<'a>(text: &str, db: &'a KeywordDatabase) -> Vec<(&'a str, usize)> {
    db.all_keywords()
        .iter()
        .map(|k| (k.as_str(), text.matches(k.as_str()).count()))
        .collect()
}
