//! NGキーワードDB
//!
//! カテゴリ別のキーワードリスト（1行1語）を読み込み、
//! キーワード → カテゴリの表を構築する。
//! 重複したキーワードは最初に定義したリストのカテゴリを保持する。

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// キーワード → カテゴリの表（挿入順を保持）
#[derive(Debug, Clone, Default)]
pub struct KeywordDatabase {
    /// 初出順のキーワード
    keywords: Vec<String>,
    /// キーワード → `keywords` 内の位置
    index: HashMap<String, usize>,
    /// `keywords` と同じ並びのカテゴリ
    categories: Vec<String>,
}

impl KeywordDatabase {
    /// キーワードリストファイル群から構築
    ///
    /// カテゴリ名はファイル名の最初の `.` より前の部分。
    /// 1つでも読めないファイルがあればエラー（部分的な読み込みはしない）。
    pub fn build<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut lists = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let content =
                std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
            lists.push((category_from_path(path), content));
        }

        let db = Self::from_lists(
            lists
                .iter()
                .map(|(category, content)| (category.as_str(), content.lines())),
        );

        tracing::info!(
            files = paths.len(),
            keywords = db.len(),
            "keyword_db.built"
        );

        Ok(db)
    }

    /// メモリ上のリストから構築
    pub fn from_lists<'a, I, W>(lists: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, W)>,
        W: IntoIterator<Item = &'a str>,
    {
        let mut db = Self::default();

        for (category, words) in lists {
            for word in words {
                db.insert(word.trim(), category);
            }
        }

        db
    }

    /// 先勝ちで追加（既存キーは上書きしない）
    fn insert(&mut self, word: &str, category: &str) {
        if word.is_empty() {
            return;
        }

        if let Some(&pos) = self.index.get(word) {
            tracing::warn!(
                keyword = word,
                kept = %self.categories[pos],
                dropped = category,
                "keyword_db.duplicate"
            );
            return;
        }

        self.index.insert(word.to_string(), self.keywords.len());
        self.keywords.push(word.to_string());
        self.categories.push(category.to_string());
    }

    /// キーワードのカテゴリを取得
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.index
            .get(word)
            .map(|&pos| self.categories[pos].as_str())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// 全キーワード（初出順）
    ///
    /// 特徴量ベクトルのキーワードブロックの並びはこの順序で固定される。
    pub fn all_keywords(&self) -> &[String] {
        &self.keywords
    }

    /// (キーワード, カテゴリ) を初出順に列挙
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords
            .iter()
            .zip(self.categories.iter())
            .map(|(k, c)| (k.as_str(), c.as_str()))
    }

    /// カテゴリ一覧（初出順・重複なし）
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for category in &self.categories {
            if !seen.contains(&category.as_str()) {
                seen.push(category.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// ファイルパスからカテゴリ名を導出
///
/// `/app/data/db/medical_history_ja_202410.txt` → `medical_history_ja_202410`
pub fn category_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}
