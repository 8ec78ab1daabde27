//! 形態素トークンとタガー契約
//!
//! 外部の形態素解析器（MeCab等）から受け取るトークン列の型。
//! 素性（features）のインデックス配置は辞書スキーマで固定されている:
//! - 1: 品詞細分類1（固有名詞など）
//! - 2: 品詞細分類2（人名・地域など）
//! - 3: 品詞細分類3（姓・名など）
//! - 9: ユーザ辞書タグ（ユーザ辞書の見出しに一致した場合のみ）

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 品詞細分類1の位置
pub const POS_SUB1_IDX: usize = 1;
/// 品詞細分類2の位置
pub const POS_SUB2_IDX: usize = 2;
/// 品詞細分類3の位置
pub const POS_SUB3_IDX: usize = 3;
/// ユーザ辞書タグの位置（IPA辞書スキーマ）
pub const USER_DIC_TAG_IDX: usize = 9;

/// 形態素1つ分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 表層形
    pub surface: String,
    /// 素性（品詞, 品詞細分類1, ...）
    pub features: Vec<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>, features: &[&str]) -> Self {
        Self {
            surface: surface.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// 表層形が空のトークン（BOS/EOSなどの制御用）か
    pub fn is_control(&self) -> bool {
        self.surface.is_empty()
    }

    /// 素性を取得（範囲外は None）
    pub fn feature(&self, idx: usize) -> Option<&str> {
        self.features.get(idx).map(String::as_str)
    }

    /// ユーザ辞書タグ
    pub fn user_dic_tag(&self) -> Option<&str> {
        self.feature(USER_DIC_TAG_IDX)
    }
}

/// 形態素解析器の契約
///
/// 内部状態の並行利用は保証されないため `&mut self` を取る。
/// ワーカーごとに1つのハンドルを所有すること。
pub trait Tagger {
    fn tag(&mut self, text: &str) -> Result<Vec<Token>>;
}

/// 制御トークンを除いたトークン列
pub fn content_tokens(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|t| !t.is_control())
}

/// 分かち書き（表層形を空白区切りで連結）
pub fn wakati(tokens: &[Token]) -> String {
    content_tokens(tokens)
        .map(|t| t.surface.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// MeCabのテキスト出力をトークン列に変換
///
/// `表層形\t素性1,素性2,...` 形式の行を読み取る。
/// `EOS` 行は表層形が空の制御トークンとして残す。
pub fn parse_mecab_output(output: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        if line == "EOS" {
            tokens.push(Token {
                surface: String::new(),
                features: vec!["BOS/EOS".to_string()],
            });
            continue;
        }

        match line.split_once('\t') {
            Some((surface, feature)) => tokens.push(Token {
                surface: surface.to_string(),
                features: feature.split(',').map(str::to_string).collect(),
            }),
            None => {
                tracing::debug!(line, "mecab.unparsable_line");
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mecab_output() {
        let output = "山田\t名詞,固有名詞,人名,姓,*,*,山田,ヤマダ,ヤマダ\n\
                      太郎\t名詞,固有名詞,人名,名,*,*,太郎,タロウ,タロウ\n\
                      EOS\n";
        let tokens = parse_mecab_output(output);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].surface, "山田");
        assert_eq!(tokens[0].feature(POS_SUB3_IDX), Some("姓"));
        assert!(tokens[2].is_control());
    }

    #[test]
    fn test_user_dic_tag() {
        let token = Token::new(
            "統合失調症",
            &["名詞", "一般", "*", "*", "*", "*", "*", "*", "*", "medical_202410"],
        );
        assert_eq!(token.user_dic_tag(), Some("medical_202410"));

        let plain = Token::new("病院", &["名詞", "一般", "*", "*"]);
        assert_eq!(plain.user_dic_tag(), None);
    }

    #[test]
    fn test_wakati_skips_control_tokens() {
        let tokens = vec![
            Token::new("", &["BOS/EOS"]),
            Token::new("私", &["名詞", "代名詞"]),
            Token::new("は", &["助詞", "係助詞"]),
            Token::new("", &["BOS/EOS"]),
        ];
        assert_eq!(wakati(&tokens), "私 は");
    }
}
