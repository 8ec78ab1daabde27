use serde::{Deserialize, Serialize};

/// 1ファイル分の処理統計（`stat_<file>` に出力）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    pub file_name: String,
    pub started_at: String,
    pub elapsed_ms: u64,
    /// 有効な文書数
    pub total: usize,
    pub passed: usize,
    pub rejected: usize,
    /// JSONとして読めなかった行
    pub invalid: usize,
    /// ルールゲートを通過した文書数
    pub gate_triggered: usize,
    /// 分類器を呼んだ文書数
    pub classifier_calls: usize,
}

impl FileStats {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            started_at: chrono::Local::now().to_rfc3339(),
            ..Default::default()
        }
    }

    pub fn reject_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.rejected as f64 / self.total as f64 * 100.0
    }
}

/// 全ファイルの合計
pub fn summarize(stats: &[FileStats]) -> FileStats {
    stats.iter().fold(FileStats::default(), |mut acc, s| {
        acc.elapsed_ms += s.elapsed_ms;
        acc.total += s.total;
        acc.passed += s.passed;
        acc.rejected += s.rejected;
        acc.invalid += s.invalid;
        acc.gate_triggered += s.gate_triggered;
        acc.classifier_calls += s.classifier_calls;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_rate() {
        let stats = FileStats {
            total: 4,
            rejected: 1,
            ..Default::default()
        };
        assert!((stats.reject_rate() - 25.0).abs() < 1e-9);
        assert_eq!(FileStats::default().reject_rate(), 0.0);
    }

    #[test]
    fn test_summarize() {
        let a = FileStats { total: 3, passed: 2, rejected: 1, ..FileStats::new("a.jsonl") };
        let b = FileStats { total: 2, passed: 2, invalid: 1, ..FileStats::new("b.jsonl") };
        let sum = summarize(&[a, b]);
        assert_eq!(sum.total, 5);
        assert_eq!(sum.passed, 4);
        assert_eq!(sum.rejected, 1);
        assert_eq!(sum.invalid, 1);
    }
}
