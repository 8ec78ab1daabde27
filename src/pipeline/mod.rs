//! JSONL一括フィルタ
//!
//! 入力フォルダのファイルごとに以下を出力する:
//! - `passed_<file>`: 通過した文書
//! - `rejected_<file>`: 除外した文書（`skip_rejected` 時は出力しない）
//! - `stat_<file>`: 処理統計
//!
//! ファイル単位で rayon のワーカーに割り当て、各ワーカーが
//! 自分のタガーと検出器を持つ。

mod document;
mod stats;

pub use document::{Document, KEY_IS_REJECTED, KEY_REASON};
pub use stats::{summarize, FileStats};

use crate::engine::Engine;
use crate::error::{PpiFilterError, Result};
use crate::scanner::InputFile;
use indicatif::{ProgressBar, ProgressStyle};
use ppi_filter_common::{PpiDetector, Tagger};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// フィルタ設定
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// 判定対象のキー
    pub filter_key: String,
    pub skip_rejected: bool,
    /// `filter_is_rejected` / `filter_reason` を出力に付与
    pub dump_reason: bool,
    /// 検出した人名・カテゴリ・分類器判定を出力に付与
    pub add_ppi_info: bool,
    pub n_workers: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            filter_key: "text".into(),
            skip_rejected: false,
            dump_reason: false,
            add_ppi_info: false,
            n_workers: 1,
        }
    }
}

/// 出力ファイルのパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub passed: PathBuf,
    pub rejected: PathBuf,
    pub stat: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, file_name: &str) -> Self {
        Self {
            passed: output_dir.join(format!("passed_{}", file_name)),
            rejected: output_dir.join(format!("rejected_{}", file_name)),
            stat: output_dir.join(format!("stat_{}", file_name)),
        }
    }
}

/// 1ファイルを処理
///
/// 途中で失敗した場合は書きかけの `passed_` / `rejected_` を削除してエラーを返す。
pub fn process_file<T: Tagger + ?Sized>(
    input: &InputFile,
    output_dir: &Path,
    detector: &PpiDetector,
    tagger: &mut T,
    options: &FilterOptions,
) -> Result<FileStats> {
    let start = Instant::now();
    let paths = OutputPaths::new(output_dir, &input.file_name);

    std::fs::create_dir_all(output_dir)?;

    let mut stats = match filter_lines(input, &paths, detector, tagger, options) {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!(file = %input.file_name, error = %e, "pipeline.file_failed");
            let written = [Some(&paths.passed), (!options.skip_rejected).then_some(&paths.rejected)];
            for path in written.into_iter().flatten() {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %path.display(), error = %remove_err, "pipeline.cleanup_failed");
                    }
                }
            }
            return Err(e);
        }
    };

    stats.elapsed_ms = start.elapsed().as_millis() as u64;
    std::fs::write(&paths.stat, serde_json::to_string(&stats)? + "\n")?;

    tracing::info!(
        file = %input.file_name,
        total = stats.total,
        passed = stats.passed,
        rejected = stats.rejected,
        invalid = stats.invalid,
        elapsed_ms = stats.elapsed_ms,
        "pipeline.file_done"
    );

    Ok(stats)
}

/// 各行を判定して通過・除外ファイルに書き出す
fn filter_lines<T: Tagger + ?Sized>(
    input: &InputFile,
    paths: &OutputPaths,
    detector: &PpiDetector,
    tagger: &mut T,
    options: &FilterOptions,
) -> Result<FileStats> {
    let mut stats = FileStats::new(&input.file_name);

    let reader = BufReader::new(File::open(&input.path)?);
    let mut passed_writer = BufWriter::new(File::create(&paths.passed)?);
    let mut rejected_writer = if options.skip_rejected {
        None
    } else {
        Some(BufWriter::new(File::create(&paths.rejected)?))
    };

    let reason = options.dump_reason.then(|| detector.mode().as_str());

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let doc = match Document::parse(&line, &options.filter_key) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(file = %input.file_name, line = line_no + 1, error = %e, "pipeline.invalid_line");
                stats.invalid += 1;
                continue;
            }
        };

        let result = detector.detect(&doc.text, &mut *tagger)?;
        stats.total += 1;
        if result.gate_triggered() {
            stats.gate_triggered += 1;
        }
        if result.classifier_verdict.is_some() {
            stats.classifier_calls += 1;
        }

        let output = doc.to_output_line(&options.filter_key, &result, reason, options.add_ppi_info)?;

        if result.is_rejected {
            stats.rejected += 1;
            if let Some(writer) = rejected_writer.as_mut() {
                writeln!(writer, "{}", output)?;
            }
        } else {
            stats.passed += 1;
            writeln!(passed_writer, "{}", output)?;
        }
    }

    passed_writer.flush()?;
    if let Some(writer) = rejected_writer.as_mut() {
        writer.flush()?;
    }

    Ok(stats)
}

/// 全ファイルを並列処理
///
/// `make_tagger` はワーカーごとのタガーを生成する。
pub fn run_filter<F, T>(
    files: &[InputFile],
    output_dir: &Path,
    engine: &Engine,
    make_tagger: F,
    options: &FilterOptions,
    show_progress: bool,
) -> Result<Vec<FileStats>>
where
    F: Fn() -> T + Sync,
    T: Tagger,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.n_workers.max(1))
        .build()
        .map_err(|e| PpiFilterError::Config(format!("ワーカーを起動できません: {}", e)))?;

    let progress = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    tracing::info!(files = files.len(), n_workers = options.n_workers, "pipeline.start");

    let results = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let detector = engine.detector()?;
                let mut tagger = make_tagger();
                let stats = process_file(input, output_dir, &detector, &mut tagger, options);
                progress.inc(1);
                stats
            })
            .collect::<Result<Vec<_>>>()
    });

    progress.finish_and_clear();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new(Path::new("/out"), "data.jsonl");
        assert_eq!(paths.passed, PathBuf::from("/out/passed_data.jsonl"));
        assert_eq!(paths.rejected, PathBuf::from("/out/rejected_data.jsonl"));
        assert_eq!(paths.stat, PathBuf::from("/out/stat_data.jsonl"));
    }

    #[test]
    fn test_default_options() {
        let options = FilterOptions::default();
        assert_eq!(options.filter_key, "text");
        assert_eq!(options.n_workers, 1);
        assert!(!options.skip_rejected);
    }
}
