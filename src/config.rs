use crate::error::{PpiFilterError, Result};
use ppi_filter_common::{default_tag_map, DecisionMode, TagCategoryMap};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定のキーワードリスト（読み込み順 = 特徴量の並び）
const DEFAULT_KEYWORD_FILES: &[&str] = &[
    "data/db/medical_history_ja_202410.txt",
    "data/db/criminal_history_ja_202410.txt",
    "data/db/religion_ja_202412.txt",
    "data/db/religion_believer_noun_ja_202412.txt",
    "data/db/religion_tuushou_unique_ja_202412.txt",
    "data/db/race_ethnic_generation_ja_202412.txt",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// NGキーワードリスト
    pub keyword_files: Vec<PathBuf>,
    /// 人名リソース（`reading\t"word":姓|名`）
    pub name_dict_path: PathBuf,
    /// 分類器モデル（JSON）
    pub model_path: PathBuf,
    /// mecab実行ファイル
    pub mecab_command: String,
    /// mecabユーザ辞書（`-u` に渡す）
    #[serde(default)]
    pub mecab_user_dics: Vec<PathBuf>,
    /// ユーザ辞書タグ → カテゴリ
    #[serde(default = "default_tag_map")]
    pub tag_map: TagCategoryMap,
    #[serde(default)]
    pub decision_mode: DecisionMode,
}

impl Config {
    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PpiFilterError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ppi-filter").join("config.json"))
    }

    pub fn default_config() -> Self {
        Self {
            keyword_files: DEFAULT_KEYWORD_FILES.iter().map(PathBuf::from).collect(),
            name_dict_path: PathBuf::from("data/db/person_names.txt"),
            model_path: PathBuf::from("models/nb_pipeline.json"),
            mecab_command: "mecab".into(),
            mecab_user_dics: vec![
                PathBuf::from("data/mecab/ipa_jinmei_v3.dic"),
                PathBuf::from("data/mecab/ipadic_combined_ng_words.dic"),
            ],
            tag_map: default_tag_map(),
            decision_mode: DecisionMode::default(),
        }
    }

    /// 読み込み前の検証（存在しないリソースは起動時に失敗させる）
    pub fn validate(&self) -> Result<()> {
        if self.keyword_files.is_empty() {
            return Err(PpiFilterError::Config(
                "キーワードリストが設定されていません".into(),
            ));
        }
        if self.mecab_command.trim().is_empty() {
            return Err(PpiFilterError::Config("mecabコマンドが設定されていません".into()));
        }

        let required = self
            .keyword_files
            .iter()
            .chain(std::iter::once(&self.name_dict_path))
            .chain(std::iter::once(&self.model_path))
            .chain(self.mecab_user_dics.iter());

        for path in required {
            if !path.is_file() {
                return Err(PpiFilterError::FileNotFound(path.display().to_string()));
            }
        }
        Ok(())
    }
}
