//! フルネーム検出
//!
//! 形態素列で「姓（または地名）」の直後に「名」が続く組を抽出する。
//!
//! 地名も姓の候補として扱う。姓として辞書登録されていない苗字が
//! 地名として解析されるケースを拾うためで、精度より再現率を優先している。

use crate::token::{Token, POS_SUB1_IDX, POS_SUB2_IDX, POS_SUB3_IDX};

/// 姓と名の組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePair<'a> {
    pub surname: &'a Token,
    pub given_name: &'a Token,
}

impl NamePair<'_> {
    /// 表層形を連結したフルネーム
    pub fn full_name(&self) -> String {
        format!("{}{}", self.surname.surface, self.given_name.surface)
    }
}

/// 検出中の状態（保留できる姓候補は高々1つ）
#[derive(Debug, Clone, Copy)]
enum NameState<'a> {
    Idle,
    PendingSurname(&'a Token),
}

/// (名詞,固有名詞,地域)
pub fn is_place_name(token: &Token) -> bool {
    token.feature(POS_SUB1_IDX) == Some("固有名詞") && token.feature(POS_SUB2_IDX) == Some("地域")
}

/// (名詞,固有名詞,人名,姓)
pub fn is_surname(token: &Token) -> bool {
    token.feature(POS_SUB2_IDX) == Some("人名") && token.feature(POS_SUB3_IDX) == Some("姓")
}

/// (名詞,固有名詞,人名,名)
pub fn is_given_name(token: &Token) -> bool {
    token.feature(POS_SUB2_IDX) == Some("人名") && token.feature(POS_SUB3_IDX) == Some("名")
}

/// 姓候補か（姓 または 地名）
pub fn is_surname_candidate(token: &Token) -> bool {
    is_surname(token) || is_place_name(token)
}

/// 姓・名の組を文書順に抽出
///
/// - 姓候補が来たら保留中の候補を上書きする
/// - 保留中に名が来たら組を出力する
/// - 保留中にそれ以外（記号を含む）が来たら保留を破棄する
/// - 末尾に残った保留は捨てる
///
/// 同じ名前が複数回出現すればその回数だけ出力する。
pub fn detect(tokens: &[Token]) -> Vec<NamePair<'_>> {
    let mut pairs = Vec::new();
    let mut state = NameState::Idle;

    for token in tokens.iter().filter(|t| !t.is_control()) {
        if is_surname_candidate(token) {
            state = NameState::PendingSurname(token);
            continue;
        }

        if let NameState::PendingSurname(surname) = state {
            if is_given_name(token) {
                pairs.push(NamePair {
                    surname,
                    given_name: token,
                });
            }
            state = NameState::Idle;
        }
    }

    pairs
}

/// フルネーム文字列のリストを取得
pub fn detect_fullnames(tokens: &[Token]) -> Vec<String> {
    detect(tokens).iter().map(NamePair::full_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surname(s: &str) -> Token {
        Token::new(s, &["名詞", "固有名詞", "人名", "姓"])
    }

    fn given(s: &str) -> Token {
        Token::new(s, &["名詞", "固有名詞", "人名", "名"])
    }

    fn place(s: &str) -> Token {
        Token::new(s, &["名詞", "固有名詞", "地域", "一般"])
    }

    fn word(s: &str) -> Token {
        Token::new(s, &["名詞", "一般", "*", "*"])
    }

    fn control() -> Token {
        Token::new("", &["BOS/EOS"])
    }

    #[test]
    fn test_adjacent_pair() {
        let tokens = vec![surname("山田"), given("太郎")];
        assert_eq!(detect_fullnames(&tokens), vec!["山田太郎"]);
    }

    #[test]
    fn test_intervening_token_voids_pending() {
        let tokens = vec![surname("山田"), word("、"), given("太郎")];
        assert!(detect(&tokens).is_empty());
    }

    #[test]
    fn test_latest_candidate_overwrites() {
        let tokens = vec![surname("山田"), surname("佐藤"), given("太郎")];
        let pairs = detect(&tokens);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].surname.surface, "佐藤");
    }

    #[test]
    fn test_place_name_is_surname_candidate() {
        let tokens = vec![place("千葉"), given("花子")];
        assert_eq!(detect_fullnames(&tokens), vec!["千葉花子"]);
    }

    #[test]
    fn test_control_tokens_are_skipped() {
        let tokens = vec![control(), surname("山田"), control(), given("太郎"), control()];
        assert_eq!(detect_fullnames(&tokens), vec!["山田太郎"]);
    }

    #[test]
    fn test_no_surname_tokens() {
        let tokens = vec![given("太郎"), word("は"), given("花子")];
        assert!(detect(&tokens).is_empty());
    }

    #[test]
    fn test_trailing_pending_is_discarded() {
        let tokens = vec![word("私"), surname("山田")];
        assert!(detect(&tokens).is_empty());
    }

    #[test]
    fn test_repeated_names_are_not_deduplicated() {
        let tokens = vec![
            surname("山田"),
            given("太郎"),
            word("と"),
            surname("山田"),
            given("太郎"),
        ];
        assert_eq!(detect_fullnames(&tokens), vec!["山田太郎", "山田太郎"]);
    }

    #[test]
    fn test_given_name_after_pair_needs_new_surname() {
        let tokens = vec![surname("山田"), given("太郎"), given("次郎")];
        assert_eq!(detect_fullnames(&tokens), vec!["山田太郎"]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(detect(&[]).is_empty());
    }
}
