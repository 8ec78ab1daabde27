//! PPI判定分類器
//!
//! 分類器は学習済みモデルとして外部から与えられる。
//! ここでは推論の契約（`Classifier`）と、JSONで書き出した
//! 多項ナイーブベイズモデルの推論実装を提供する。

use crate::error::{Error, Result};
use crate::features::{FeatureSchema, FeatureVector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 分類器の契約
///
/// 学習時と同じスキーマで組み立てたベクトルのみを受け付ける。
pub trait Classifier: Send + Sync {
    /// 学習時の特徴量スキーマ
    fn schema(&self) -> &FeatureSchema;

    /// 各ベクトルのラベル（0/1）を返す
    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<u8>>;
}

/// 多項ナイーブベイズのモデルファイル
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesBundle {
    pub schema: FeatureSchema,
    /// 学習時に記録したスキーマ指紋
    pub fingerprint: String,
    pub classes: Vec<u8>,
    pub class_log_prior: Vec<f64>,
    /// クラスごとの特徴量対数確率（クラス数 × 特徴量幅）
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// 多項ナイーブベイズ（推論のみ）
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    bundle: NaiveBayesBundle,
}

impl NaiveBayesModel {
    /// モデルファイルを読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
        let model = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            width = model.bundle.schema.width(),
            fingerprint = %model.bundle.fingerprint,
            "classifier.loaded"
        );

        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: NaiveBayesBundle = serde_json::from_str(json)?;
        Self::from_bundle(bundle)
    }

    /// 形状と指紋を検証して構築
    pub fn from_bundle(bundle: NaiveBayesBundle) -> Result<Self> {
        let n_classes = bundle.classes.len();
        if n_classes == 0 {
            return Err(Error::Classifier("クラスが定義されていません".into()));
        }
        if bundle.class_log_prior.len() != n_classes || bundle.feature_log_prob.len() != n_classes {
            return Err(Error::Classifier(format!(
                "クラス数が一致しません（classes: {}, prior: {}, feature_log_prob: {}）",
                n_classes,
                bundle.class_log_prior.len(),
                bundle.feature_log_prob.len()
            )));
        }

        bundle.schema.ngram.validate()?;

        let width = bundle.schema.width();
        if let Some(row) = bundle.feature_log_prob.iter().find(|row| row.len() != width) {
            return Err(Error::Classifier(format!(
                "特徴量幅が一致しません（スキーマ: {}, モデル: {}）",
                width,
                row.len()
            )));
        }

        let expected = bundle.schema.fingerprint();
        if bundle.fingerprint != expected {
            return Err(Error::Schema(format!(
                "スキーマ指紋が一致しません（モデル: {}, 再計算: {}）",
                bundle.fingerprint, expected
            )));
        }

        Ok(Self { bundle })
    }

    pub fn bundle(&self) -> &NaiveBayesBundle {
        &self.bundle
    }

    /// クラスごとの同時対数尤度
    fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        self.bundle
            .class_log_prior
            .iter()
            .zip(&self.bundle.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior + x.iter().zip(log_prob).map(|(v, p)| v * p).sum::<f64>()
            })
            .collect()
    }
}

impl Classifier for NaiveBayesModel {
    fn schema(&self) -> &FeatureSchema {
        &self.bundle.schema
    }

    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<u8>> {
        let width = self.bundle.schema.width();

        vectors
            .iter()
            .map(|vector| {
                if vector.len() != width {
                    return Err(Error::Schema(format!(
                        "ベクトル幅が一致しません（モデル: {}, 入力: {}）",
                        width,
                        vector.len()
                    )));
                }

                let jll = self.joint_log_likelihood(vector.as_slice());
                let best = jll
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                Ok(self.bundle.classes[best])
            })
            .collect()
    }
}
