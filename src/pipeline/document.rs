//! JSONL 1行分の文書
//!
//! 判定対象キー以外のキー・値は extras として保持し、出力時にそのまま戻す。

use crate::error::{PpiFilterError, Result};
use ppi_filter_common::DetectionResult;
use serde_json::{Map, Value};

/// 出力に付与する判定情報のキー
pub const KEY_IS_REJECTED: &str = "filter_is_rejected";
pub const KEY_REASON: &str = "filter_reason";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub extras: Map<String, Value>,
}

impl Document {
    /// JSON 1行を読み込む
    ///
    /// 判定対象キーが文字列でない場合はJSON表現を本文とする。
    pub fn parse(line: &str, filter_key: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        let Value::Object(mut extras) = value else {
            return Err(PpiFilterError::InvalidLine(format!(
                "JSONオブジェクトではありません: {}",
                preview(line)
            )));
        };

        let text = match extras.remove(filter_key) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => {
                return Err(PpiFilterError::InvalidLine(format!(
                    "キー '{}' がありません: {}",
                    filter_key,
                    preview(line)
                )))
            }
        };

        Ok(Self { text, extras })
    }

    /// 出力用JSON 1行
    ///
    /// - `reason`: 判定情報を付与する場合の除外理由（通過時は null）
    /// - `add_ppi_info`: 検出した人名・カテゴリ・分類器判定を付与
    pub fn to_output_line(
        &self,
        filter_key: &str,
        result: &DetectionResult,
        reason: Option<&str>,
        add_ppi_info: bool,
    ) -> Result<String> {
        let mut data = Map::new();
        data.insert(filter_key.to_string(), Value::String(self.text.clone()));
        data.extend(self.extras.clone());

        if let Some(reason) = reason {
            data.insert(KEY_IS_REJECTED.into(), Value::Bool(result.is_rejected));
            let reason = if result.is_rejected {
                Value::String(reason.to_string())
            } else {
                Value::Null
            };
            data.insert(KEY_REASON.into(), reason);
        }

        if add_ppi_info {
            data.extend(result.metadata());
        }

        Ok(serde_json::to_string(&Value::Object(data))?)
    }
}

fn preview(line: &str) -> String {
    line.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_extras() {
        let doc = Document::parse(r#"{"text": "山田太郎はがん", "id": 3, "url": "http://example.com"}"#, "text").unwrap();
        assert_eq!(doc.text, "山田太郎はがん");
        assert_eq!(doc.extras.len(), 2);
        assert_eq!(doc.extras["id"], json!(3));
    }

    #[test]
    fn test_parse_custom_key_and_non_string() {
        let doc = Document::parse(r#"{"body": 123}"#, "body").unwrap();
        assert_eq!(doc.text, "123");
    }

    #[test]
    fn test_parse_invalid_lines() {
        assert!(matches!(Document::parse("{not json", "text"), Err(PpiFilterError::JsonParse(_))));
        assert!(matches!(Document::parse(r#"{"body": "x"}"#, "text"), Err(PpiFilterError::InvalidLine(_))));
        assert!(matches!(Document::parse(r#"["text"]"#, "text"), Err(PpiFilterError::InvalidLine(_))));
    }

    #[test]
    fn test_output_line_plain() {
        let doc = Document::parse(r#"{"text": "今日は晴れ", "id": 1}"#, "text").unwrap();
        let line = doc
            .to_output_line("text", &DetectionResult::default(), None, false)
            .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value, json!({"text": "今日は晴れ", "id": 1}));
    }

    #[test]
    fn test_output_line_with_reason_and_ppi_info() {
        let doc = Document::parse(r#"{"text": "山田太郎はがん"}"#, "text").unwrap();
        let result = DetectionResult {
            is_rejected: true,
            full_names: vec!["山田太郎".into()],
            matched_categories: vec!["userd-med".into()],
            classifier_verdict: Some(true),
        };
        let line = doc
            .to_output_line("text", &result, Some("rule_and_classifier"), true)
            .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value[KEY_IS_REJECTED], json!(true));
        assert_eq!(value[KEY_REASON], json!("rule_and_classifier"));
        assert_eq!(value["detect_fullnames"], json!(["山田太郎"]));
        assert_eq!(value["ng_match"], json!(["userd-med"]));
        assert_eq!(value["is_PPI_by_classifier"], json!(1));
    }

    #[test]
    fn test_passed_document_has_null_reason() {
        let doc = Document::parse(r#"{"text": "今日は晴れ"}"#, "text").unwrap();
        let line = doc
            .to_output_line("text", &DetectionResult::default(), Some("rule_only"), false)
            .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value[KEY_IS_REJECTED], json!(false));
        assert_eq!(value[KEY_REASON], Value::Null);
    }
}
