//! PPI Filter Common Library
//!
//! 要配慮個人情報（人名 + 病歴・犯罪歴・信条・人種などの語の共起）を
//! 検出するエンジン。形態素解析器と分類器は外部から与える。

pub mod classifier;
pub mod error;
pub mod features;
pub mod fullname;
pub mod fusion;
pub mod keyword_db;
pub mod name_dict;
pub mod ngword;
pub mod sentence;
pub mod token;

pub use classifier::{Classifier, NaiveBayesBundle, NaiveBayesModel};
pub use error::{Error, Result};
pub use features::{FeatureAssembler, FeatureSchema, FeatureVector, KeywordMode, NgramVocabulary};
pub use fullname::{detect_fullnames, NamePair};
pub use fusion::{DecisionMode, DetectionResult, PpiDetector, RuleGate};
pub use keyword_db::KeywordDatabase;
pub use name_dict::NameDictionary;
pub use ngword::{default_tag_map, TagCategoryMap};
pub use sentence::CooccurrenceScore;
pub use token::{parse_mecab_output, Tagger, Token};
