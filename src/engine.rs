//! 検出エンジンの組み立て
//!
//! 設定からキーワードDB・人名辞書・分類器を一度だけ読み込み、
//! ワーカーごとの検出器を払い出す。

use crate::config::Config;
use crate::error::Result;
use ppi_filter_common::{
    Classifier, DecisionMode, KeywordDatabase, NaiveBayesModel, NameDictionary, PpiDetector,
    TagCategoryMap,
};
use std::sync::Arc;

/// 読み込み済みの共有リソース
#[derive(Clone)]
pub struct Engine {
    keywords: Arc<KeywordDatabase>,
    names: Arc<NameDictionary>,
    tag_map: Arc<TagCategoryMap>,
    classifier: Arc<dyn Classifier>,
    mode: DecisionMode,
}

impl Engine {
    /// 設定のリソースを読み込む（欠けていれば即エラー）
    pub fn load(config: &Config) -> Result<Self> {
        config.validate()?;

        let keywords = KeywordDatabase::build(&config.keyword_files)?;
        let names = NameDictionary::load(&config.name_dict_path)?;
        let classifier = NaiveBayesModel::load(&config.model_path)?;

        Self::from_parts(
            keywords,
            names,
            config.tag_map.clone(),
            Arc::new(classifier),
            config.decision_mode,
        )
    }

    /// 構築済みの部品から作成（スキーマ不一致はここで検出）
    pub fn from_parts(
        keywords: KeywordDatabase,
        names: NameDictionary,
        tag_map: TagCategoryMap,
        classifier: Arc<dyn Classifier>,
        mode: DecisionMode,
    ) -> Result<Self> {
        let engine = Self {
            keywords: Arc::new(keywords),
            names: Arc::new(names),
            tag_map: Arc::new(tag_map),
            classifier,
            mode,
        };
        engine.detector()?;

        tracing::info!(
            keywords = engine.keywords.len(),
            categories = engine.keywords.categories().len(),
            mode = mode.as_str(),
            "engine.ready"
        );

        Ok(engine)
    }

    pub fn with_mode(mut self, mode: DecisionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    pub fn keywords(&self) -> &KeywordDatabase {
        &self.keywords
    }

    /// ワーカー用の検出器
    pub fn detector(&self) -> Result<PpiDetector> {
        let detector = PpiDetector::new(
            self.keywords.clone(),
            self.names.clone(),
            self.tag_map.clone(),
            self.classifier.clone(),
            self.mode,
        )?;
        Ok(detector)
    }
}
