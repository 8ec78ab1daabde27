//! MeCabコマンド連携
//!
//! 文書ごとに `mecab -u <dic1>,<dic2>` を起動し、標準入力に本文を渡して
//! 標準出力（`surface\tf0,f1,...` 形式）をトークン列に変換する。

use crate::config::Config;
use crate::error::{PpiFilterError, Result};
use ppi_filter_common::{parse_mecab_output, Error as EngineError, Tagger, Token};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// MeCabコマンドを呼び出すタガー
///
/// ワーカーごとに1つ所有する。
#[derive(Debug, Clone)]
pub struct MecabCommandTagger {
    command: String,
    user_dics: Vec<PathBuf>,
}

impl MecabCommandTagger {
    pub fn new(command: impl Into<String>, user_dics: Vec<PathBuf>) -> Self {
        Self {
            command: command.into(),
            user_dics,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mecab_command.clone(), config.mecab_user_dics.clone())
    }

    /// コマンド引数（ユーザ辞書はカンマ区切りで1つの `-u` に渡す）
    pub fn args(&self) -> Vec<String> {
        if self.user_dics.is_empty() {
            return Vec::new();
        }

        let dics = self
            .user_dics
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",");
        vec!["-u".to_string(), dics]
    }

    /// 起動確認（バージョン文字列を返す）
    pub fn probe(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("-v")
            .output()
            .map_err(|e| PpiFilterError::Tagger(format!("{} を実行できません: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(PpiFilterError::Tagger(format!(
                "{} -v failed (code {:?})",
                self.command,
                output.status.code()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&self, text: &str) -> std::result::Result<String, String> {
        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("MeCab実行エラー: {}", e))?;

        // 出力側のパイプが詰まらないよう書き込みは別スレッド
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| "MeCabの標準入力を取得できません".to_string())?;
        let input = format!("{}\n", text);
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| format!("MeCab出力の読み込みエラー: {}", e))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(format!("MeCabへの入力エラー: {}", e)),
            Err(_) => return Err("MeCabへの入力スレッドが異常終了しました".to_string()),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "MeCab failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Tagger for MecabCommandTagger {
    fn tag(&mut self, text: &str) -> ppi_filter_common::Result<Vec<Token>> {
        let stdout = self.run(text).map_err(EngineError::Tagger)?;
        Ok(parse_mecab_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_join_user_dics() {
        let tagger = MecabCommandTagger::new(
            "mecab",
            vec![PathBuf::from("/dic/jinmei.dic"), PathBuf::from("/dic/ng.dic")],
        );
        assert_eq!(tagger.args(), vec!["-u", "/dic/jinmei.dic,/dic/ng.dic"]);
    }

    #[test]
    fn test_args_without_user_dics() {
        let tagger = MecabCommandTagger::new("mecab", Vec::new());
        assert!(tagger.args().is_empty());
    }

    #[test]
    fn test_missing_command_is_tagger_error() {
        let mut tagger = MecabCommandTagger::new("/nonexistent/mecab", Vec::new());
        assert!(matches!(tagger.tag("山田太郎"), Err(EngineError::Tagger(_))));
        assert!(matches!(tagger.probe(), Err(PpiFilterError::Tagger(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_tag_parses_command_output() {
        // mecabの代わりに固定出力を返すスクリプト
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-mecab");
        std::fs::write(
            &script,
            "#!/bin/sh\ncat > /dev/null\nprintf '山田\\t名詞,固有名詞,人名,姓,*,*,山田,ヤマダ,ヤマダ\\nEOS\\n'\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let mut tagger = MecabCommandTagger::new(script.display().to_string(), Vec::new());
        let tokens = tagger.tag("山田").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].surface, "山田");
        assert_eq!(tokens[0].feature(3), Some("姓"));
        assert!(tokens[1].is_control());
    }
}
