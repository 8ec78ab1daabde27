//! 判定の統合
//!
//! ## 処理フロー
//! 1. ルールゲート: フルネーム検出 AND (ユーザ辞書タグ一致 OR キーワードDB一致)
//! 2. ゲートを通過した文書のみ特徴量を組み立てて分類器で最終判定
//!
//! ゲートが偽の文書では分類器を呼ばない。

use crate::classifier::Classifier;
use crate::error::Result;
use crate::features::{FeatureAssembler, FeatureVector};
use crate::fullname;
use crate::keyword_db::KeywordDatabase;
use crate::name_dict::NameDictionary;
use crate::ngword::{self, TagCategoryMap, TagMatch, WordsetMatch};
use crate::token::{Tagger, Token};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// 文書メタデータのキー
pub const META_FULLNAMES: &str = "detect_fullnames";
pub const META_NG_MATCH: &str = "ng_match";
pub const META_CLASSIFIER: &str = "is_PPI_by_classifier";

/// 判定モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    /// ルールゲート → 分類器
    #[default]
    RuleAndClassifier,
    /// ルールゲートのみで判定
    RuleOnly,
    /// 全文書を分類器で判定
    ClassifierOnly,
}

impl DecisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionMode::RuleAndClassifier => "rule_and_classifier",
            DecisionMode::RuleOnly => "rule_only",
            DecisionMode::ClassifierOnly => "classifier_only",
        }
    }
}

impl std::str::FromStr for DecisionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rule_and_classifier" => Ok(DecisionMode::RuleAndClassifier),
            "rule_only" => Ok(DecisionMode::RuleOnly),
            "classifier_only" => Ok(DecisionMode::ClassifierOnly),
            other => Err(format!("不明な判定モード: {}", other)),
        }
    }
}

/// 1文書の判定結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_rejected: bool,
    pub full_names: Vec<String>,
    /// 発火した戦略のカテゴリ（タグ一致 → キーワードDB一致の順）
    pub matched_categories: Vec<String>,
    /// 分類器を呼んだ場合のみ
    pub classifier_verdict: Option<bool>,
}

impl DetectionResult {
    /// ルールゲートが真だったか（カテゴリはゲート通過時のみ記録される）
    pub fn gate_triggered(&self) -> bool {
        !self.matched_categories.is_empty()
    }

    /// パイプラインが文書に付与するメタデータ
    ///
    /// ゲートが偽の文書の `ng_match` は null。
    pub fn metadata(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert(META_FULLNAMES.into(), json!(self.full_names));
        let ng_match = if self.gate_triggered() {
            json!(self.matched_categories)
        } else {
            Value::Null
        };
        meta.insert(META_NG_MATCH.into(), ng_match);
        meta.insert(
            META_CLASSIFIER.into(),
            json!(u8::from(self.classifier_verdict == Some(true))),
        );
        meta
    }
}

/// ステージ1（ルールゲート）の結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleGate {
    pub full_names: Vec<String>,
    pub tag_match: TagMatch,
    pub wordset_match: WordsetMatch,
}

impl RuleGate {
    /// トークン列を評価
    pub fn evaluate(tokens: &[Token], keywords: &KeywordDatabase, tag_map: &TagCategoryMap) -> Self {
        Self {
            full_names: fullname::detect_fullnames(tokens),
            tag_match: ngword::by_tag(tokens, tag_map),
            wordset_match: ngword::by_wordset(tokens, keywords),
        }
    }

    pub fn has_full_name(&self) -> bool {
        !self.full_names.is_empty()
    }

    pub fn has_ng_word(&self) -> bool {
        self.tag_match.found || self.wordset_match.found
    }

    /// 除外候補か
    pub fn is_candidate(&self) -> bool {
        self.has_full_name() && self.has_ng_word()
    }

    /// ゲートが真の場合のみ、発火した戦略のカテゴリを返す
    pub fn matched_categories(&self) -> Vec<String> {
        if !self.is_candidate() {
            return Vec::new();
        }
        self.tag_match
            .category
            .iter()
            .chain(self.wordset_match.category.iter())
            .cloned()
            .collect()
    }
}

/// 要配慮個人情報の検出器
///
/// 辞書・分類器は `Arc` で共有する。タガーは呼び出し側のワーカーが所有する。
pub struct PpiDetector {
    keywords: Arc<KeywordDatabase>,
    tag_map: Arc<TagCategoryMap>,
    assembler: FeatureAssembler,
    classifier: Arc<dyn Classifier>,
    mode: DecisionMode,
}

impl PpiDetector {
    /// 分類器のスキーマとキーワードDBが一致しなければ構築失敗
    pub fn new(
        keywords: Arc<KeywordDatabase>,
        names: Arc<NameDictionary>,
        tag_map: Arc<TagCategoryMap>,
        classifier: Arc<dyn Classifier>,
        mode: DecisionMode,
    ) -> Result<Self> {
        let schema = Arc::new(classifier.schema().clone());
        let assembler = FeatureAssembler::new(schema, keywords.clone(), names, tag_map.clone())?;

        Ok(Self {
            keywords,
            tag_map,
            assembler,
            classifier,
            mode,
        })
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    /// 形態素解析（失敗時は空のトークン列）
    pub fn tokenize<T: Tagger + ?Sized>(&self, text: &str, tagger: &mut T) -> Vec<Token> {
        match tagger.tag(text) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, chars = text.chars().count(), "tagger.failed");
                Vec::new()
            }
        }
    }

    /// 1文書を判定
    pub fn detect<T: Tagger + ?Sized>(&self, text: &str, tagger: &mut T) -> Result<DetectionResult> {
        let tokens = self.tokenize(text, tagger);
        self.detect_tokens(text, &tokens)
    }

    /// 解析済みトークン列で判定
    pub fn detect_tokens(&self, text: &str, tokens: &[Token]) -> Result<DetectionResult> {
        let gate = RuleGate::evaluate(tokens, &self.keywords, &self.tag_map);

        let run_classifier = match self.mode {
            DecisionMode::RuleAndClassifier => gate.is_candidate(),
            DecisionMode::RuleOnly => false,
            DecisionMode::ClassifierOnly => true,
        };

        let classifier_verdict = if run_classifier {
            Some(self.classify(text, tokens)?)
        } else {
            None
        };

        let is_rejected = match self.mode {
            DecisionMode::RuleOnly => gate.is_candidate(),
            _ => classifier_verdict == Some(true),
        };

        tracing::debug!(
            mode = self.mode.as_str(),
            gate = gate.is_candidate(),
            ?classifier_verdict,
            is_rejected,
            "ppi.detected"
        );

        Ok(DetectionResult {
            is_rejected,
            matched_categories: gate.matched_categories(),
            full_names: gate.full_names,
            classifier_verdict,
        })
    }

    /// 特徴量ベクトルを生成
    pub fn features<T: Tagger + ?Sized>(&self, text: &str, tagger: &mut T) -> FeatureVector {
        let tokens = self.tokenize(text, tagger);
        self.assembler.assemble(text, &tokens)
    }

    fn classify(&self, text: &str, tokens: &[Token]) -> Result<bool> {
        let vector = self.assembler.assemble(text, tokens);
        let labels = self.classifier.predict(std::slice::from_ref(&vector))?;
        Ok(labels.first() == Some(&1))
    }
}
