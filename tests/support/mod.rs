//! 結合テスト用の部品
//!
//! - `LexiconTagger`: 固定語彙の最長一致で形態素列を返すタガー
//! - `CountingClassifier`: 呼び出し回数を数える固定ラベルの分類器
//! - `FailingClassifier`: 常にエラーを返す分類器
//! - `write_resources`: 一時フォルダにキーワードリスト・人名リスト・モデルを書き出す

#![allow(dead_code)]

use ppi_filter::config::Config;
use ppi_filter_common::{
    Classifier, Error, FeatureSchema, FeatureVector, KeywordDatabase, KeywordMode, NaiveBayesBundle,
    NameDictionary, NgramVocabulary, Result, Tagger, Token,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

const SURNAME: &[&str] = &["名詞", "固有名詞", "人名", "姓"];
const GIVEN_NAME: &[&str] = &["名詞", "固有名詞", "人名", "名"];
const PLACE: &[&str] = &["名詞", "固有名詞", "地域", "一般"];
const NOUN: &[&str] = &["名詞", "一般"];
const UNKNOWN: &[&str] = &["記号", "一般"];

/// 固定語彙のタガー
pub struct LexiconTagger {
    entries: Vec<(String, Vec<String>)>,
    pub calls: usize,
}

impl LexiconTagger {
    pub fn new() -> Self {
        let mut tagger = Self {
            entries: Vec::new(),
            calls: 0,
        };
        for surname in ["山田", "中村", "佐藤"] {
            tagger.add(surname, SURNAME);
        }
        for given in ["太郎", "花子", "健太"] {
            tagger.add(given, GIVEN_NAME);
        }
        tagger.add("東京", PLACE);
        for noun in ["がん", "統合失調症", "逮捕", "入院", "今日", "晴れ", "治療法"] {
            tagger.add(noun, NOUN);
        }
        tagger
    }

    /// 語を追加
    pub fn add(&mut self, surface: &str, features: &[&str]) {
        self.entries.push((
            surface.to_string(),
            features.iter().map(|f| f.to_string()).collect(),
        ));
        // 最長一致のため長い語を先に
        self.entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if c.is_whitespace() {
                rest = &rest[c.len_utf8()..];
                continue;
            }

            match self.entries.iter().find(|(surface, _)| rest.starts_with(surface.as_str())) {
                Some((surface, features)) => {
                    tokens.push(Token {
                        surface: surface.clone(),
                        features: features.clone(),
                    });
                    rest = &rest[surface.len()..];
                }
                None => {
                    tokens.push(Token::new(c.to_string(), UNKNOWN));
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        tokens.push(Token::new("", &["BOS/EOS"]));
        tokens
    }
}

impl Tagger for LexiconTagger {
    fn tag(&mut self, text: &str) -> Result<Vec<Token>> {
        self.calls += 1;
        Ok(self.tokenize(text))
    }
}

/// 呼び出し回数を数える分類器
pub struct CountingClassifier {
    schema: FeatureSchema,
    label: u8,
    calls: AtomicUsize,
}

impl CountingClassifier {
    pub fn new(keywords: &KeywordDatabase, label: u8) -> Self {
        Self {
            schema: FeatureSchema::new(keywords, KeywordMode::Frequency, NgramVocabulary::default()),
            label,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for CountingClassifier {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(vectors.iter().all(|v| v.len() == self.schema.width()));
        Ok(vec![self.label; vectors.len()])
    }
}

/// 常に失敗する分類器
pub struct FailingClassifier {
    schema: FeatureSchema,
}

impl FailingClassifier {
    pub fn new(keywords: &KeywordDatabase) -> Self {
        Self {
            schema: FeatureSchema::new(keywords, KeywordMode::Frequency, NgramVocabulary::default()),
        }
    }
}

impl Classifier for FailingClassifier {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, _vectors: &[FeatureVector]) -> Result<Vec<u8>> {
        Err(Error::Classifier("推論に失敗しました".into()))
    }
}

pub const MEDICAL_FILE: &str = "medical_history_ja_202410.txt";
pub const CRIMINAL_FILE: &str = "criminal_history_ja_202410.txt";

pub fn keyword_db() -> KeywordDatabase {
    KeywordDatabase::from_lists([
        ("medical_history_ja_202410", vec!["がん", "統合失調症"]),
        ("criminal_history_ja_202410", vec!["逮捕"]),
    ])
}

pub fn names() -> NameDictionary {
    NameDictionary::from_names(
        [("山田", "やまだ"), ("中村", "なかむら"), ("佐藤", "さとう")],
        [("太郎", "たろう"), ("花子", "はなこ"), ("健太", "けんた")],
    )
}

/// キーワードが出現するとクラス1に寄るモデル
pub fn keyword_model(keywords: &KeywordDatabase) -> NaiveBayesBundle {
    let schema = FeatureSchema::new(keywords, KeywordMode::Frequency, NgramVocabulary::default());
    let width = schema.width();
    let n_keywords = keywords.len();

    let row = |keyword_weight: f64| -> Vec<f64> {
        (0..width)
            .map(|i| if i < n_keywords { keyword_weight } else { -1.0 })
            .collect()
    };

    NaiveBayesBundle {
        fingerprint: schema.fingerprint(),
        schema,
        classes: vec![0, 1],
        class_log_prior: vec![(0.5f64).ln(), (0.5f64).ln()],
        feature_log_prob: vec![row(-5.0), row(-0.1)],
    }
}

/// 一時フォルダにリソース一式を書き出して設定を返す
pub fn write_resources(dir: &Path) -> Config {
    let medical = dir.join(MEDICAL_FILE);
    let criminal = dir.join(CRIMINAL_FILE);
    std::fs::write(&medical, "がん\n統合失調症\n").expect("Failed to write keywords");
    std::fs::write(&criminal, "逮捕\n").expect("Failed to write keywords");

    let name_dict = dir.join("person_names.txt");
    std::fs::write(
        &name_dict,
        "やまだ\t\"山田\":姓\nなかむら\t\"中村\":姓\nさとう\t\"佐藤\":姓\n\
         たろう\t\"太郎\":名\nはなこ\t\"花子\":名\nけんた\t\"健太\":名\n",
    )
    .expect("Failed to write name dict");

    let model_path = dir.join("nb_pipeline.json");
    let model = keyword_model(&keyword_db());
    std::fs::write(&model_path, serde_json::to_string(&model).expect("Failed to serialize model"))
        .expect("Failed to write model");

    Config {
        keyword_files: vec![medical, criminal],
        name_dict_path: name_dict,
        model_path,
        mecab_user_dics: Vec::new(),
        ..Config::default_config()
    }
}
